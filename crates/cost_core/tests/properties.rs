//! Property-based tests for the costing engine.
//!
//! Generates arbitrary (often hostile) form records and checks the invariants
//! that must hold for every input.

use cost_core::test_fixtures::{approx_eq, worker};
use cost_core::*;
use proptest::prelude::*;
use serde_json::{Map, Value};

// ===========================================================================
// Generators
// ===========================================================================

const NUMERIC_FIELDS: &[&str] = &[
    "purchasePrice",
    "quantity",
    "waste",
    "glazingPercent",
    "vatPercent",
    "boxCost",
    "bagCost",
    "distance",
    "fuelCost",
    "tolls",
    "parkingCost",
    "driverSalary",
    "electricityCost",
    "equipmentCost",
    "insuranceCost",
    "rentCost",
    "communicationCost",
    "otherCosts",
    "competitor1",
    "competitor2",
    "profitMargin",
    "minimumMargin",
    "seasonalMultiplier",
];

/// Anything a loosely typed form layer might put in a field.
fn arb_field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => (-1.0e6..1.0e6f64).prop_map(Value::from),
        1 => (-1.0e6..1.0e6f64).prop_map(|n| Value::from(n.to_string())),
        1 => Just(Value::Null),
        1 => any::<bool>().prop_map(Value::from),
        1 => "[a-z ]{0,6}".prop_map(Value::from),
        1 => Just(Value::Array(vec![])),
    ]
}

fn arb_list_entry(fields: &'static [&'static str]) -> impl Strategy<Value = Value> {
    proptest::collection::vec(arb_field_value(), fields.len()).prop_map(move |values| {
        let map: Map<String, Value> = fields
            .iter()
            .map(|k| (*k).to_string())
            .zip(values)
            .collect();
        Value::Object(map)
    })
}

fn arb_raw_form() -> impl Strategy<Value = Value> {
    (
        proptest::collection::vec(proptest::option::of(arb_field_value()), NUMERIC_FIELDS.len()),
        proptest::collection::vec(arb_list_entry(&["hourlyRate", "hours"]), 0..4),
        proptest::collection::vec(arb_list_entry(&["wastePercentage", "addedWeight"]), 0..5),
    )
        .prop_map(|(values, workers, phases)| {
            let mut map: Map<String, Value> = NUMERIC_FIELDS
                .iter()
                .zip(values)
                .filter_map(|(key, value)| value.map(|v| ((*key).to_string(), v)))
                .collect();
            map.insert("workers".to_string(), Value::Array(workers));
            map.insert("processingPhases".to_string(), Value::Array(phases));
            Value::Object(map)
        })
}

/// A well-formed form where every cost category is strictly positive.
fn arb_positive_form() -> impl Strategy<Value = FormData> {
    (
        (0.5..50.0f64, 1.0..5_000.0f64, 0.0..60.0f64, 0.0..30.0f64),
        (1.0..40.0f64, 0.5..12.0f64, 0.1..50.0f64, 1.0..500.0f64),
        (0.0..40.0f64, 0.5..2.0f64, 0.1..100.0f64),
    )
        .prop_map(
            |(
                (purchase_price, quantity, waste, vat_percent),
                (hourly_rate, hours, box_cost, distance),
                (profit_margin, seasonal_multiplier, other_costs),
            )| FormData {
                purchase_price,
                quantity,
                waste,
                vat_percent,
                workers: vec![worker(hourly_rate, hours)],
                box_cost,
                distance,
                fuel_cost: 0.2,
                other_costs,
                profit_margin,
                seasonal_multiplier,
                ..FormData::default()
            },
        )
}

fn assert_all_finite(r: &CalculationResults) -> Result<(), TestCaseError> {
    let json = serde_json::to_string(r).map_err(|e| TestCaseError::fail(e.to_string()))?;
    // serde_json writes non-finite floats as null.
    prop_assert!(!json.contains("null"), "non-finite field in {json}");
    Ok(())
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn totality(raw in arb_raw_form()) {
        let r = calculate(&raw);
        assert_all_finite(&r)?;
    }

    #[test]
    fn weight_floor(raw in arb_raw_form()) {
        let r = calculate(&raw);
        prop_assert!(r.final_processed_weight >= 0.1);
    }

    #[test]
    fn cost_identity_is_exact(raw in arb_raw_form()) {
        let r = calculate(&raw);
        let summed = r.purchase_cost + r.labor_cost + r.packaging_cost
            + r.transport_cost + r.additional_costs;
        prop_assert_eq!(r.total_cost.to_bits(), summed.to_bits());
    }

    #[test]
    fn breakdown_only_lists_positive_amounts(raw in arb_raw_form()) {
        let r = calculate(&raw);
        for entry in &r.cost_breakdown {
            prop_assert!(entry.amount > 0.0);
        }
    }

    #[test]
    fn breakdown_is_complete_when_all_positive(form in arb_positive_form()) {
        let r = calculate_form(&form, &PricingConstants::default());
        prop_assert_eq!(r.cost_breakdown.len(), 5);
        let amounts: f64 = r.cost_breakdown.iter().map(|e| e.amount).sum();
        prop_assert!((amounts - r.total_cost).abs() <= r.total_cost * 1e-12);
    }

    #[test]
    fn margin_is_monotonic(form in arb_positive_form(), bump in 0.5..50.0f64) {
        let constants = PricingConstants::default();
        let low = calculate_form(&form, &constants);
        let higher = FormData { profit_margin: form.profit_margin + bump, ..form };
        let high = calculate_form(&higher, &constants);
        prop_assert!(high.selling_price_per_kg > low.selling_price_per_kg);
    }

    #[test]
    fn market_position_thresholds(form in arb_positive_form()) {
        let constants = PricingConstants::default();
        let price = calculate_form(&form, &constants).selling_price_per_kg;

        let cheap = FormData { competitor1: price + 0.51, competitor2: price, ..form.clone() };
        prop_assert_eq!(
            calculate_form(&cheap, &constants).competitor_analysis.market_position,
            MarketPosition::Cheap
        );

        let expensive = FormData { competitor1: price - 0.51, competitor2: price, ..form.clone() };
        prop_assert_eq!(
            calculate_form(&expensive, &constants).competitor_analysis.market_position,
            MarketPosition::Expensive
        );

        let close = FormData { competitor1: price + 0.4, competitor2: price - 0.4, ..form };
        prop_assert_eq!(
            calculate_form(&close, &constants).competitor_analysis.market_position,
            MarketPosition::Competitive
        );
    }

    #[test]
    fn break_even_agrees_with_cost_floor(form in arb_positive_form()) {
        let r = calculate_form(&form, &PricingConstants::default());
        let cost_per_kg = r.selling_price_per_kg - r.profit_per_kg;
        prop_assert!(approx_eq(
            r.profit_analysis.break_even_price,
            r.adjusted_cost / r.final_processed_weight
        ));
        prop_assert!((cost_per_kg - r.profit_analysis.break_even_price).abs()
            <= r.profit_analysis.break_even_price * 1e-9);
    }

    #[test]
    fn idempotent(raw in arb_raw_form()) {
        let first = serde_json::to_string(&calculate(&raw)).unwrap();
        let second = serde_json::to_string(&calculate(&raw)).unwrap();
        prop_assert_eq!(first, second);
    }
}
