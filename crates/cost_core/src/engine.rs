use serde_json::Value;

use crate::analysis::{analyze_competitors, analyze_profit};
use crate::costs::{aggregate_costs, CostTotals};
use crate::pricing::{cost_breakdown, price, Pricing};
use crate::sanitize::sanitize;
use crate::weight::{process_weight, WeightFlow};
use crate::{
    CalculationResults, CompetitorAnalysis, CostBreakdownEntry, FormData, PricingConstants,
    ProfitAnalysis,
};

/// Run the full costing pipeline on an untrusted input record.
///
/// Order of operations:
/// 1. Sanitize the input into a complete `FormData`.
/// 2. Run the weight flow to get the net processed weight.
/// 3. Aggregate the direct cost categories.
/// 4. Price: VAT, seasonal multiplier, margin, per-kg conversion.
/// 5. Competitor comparison and profit reference prices.
///
/// Total over all inputs; the result never contains NaN or infinity.
pub fn calculate(raw: &Value) -> CalculationResults {
    calculate_with(raw, &PricingConstants::default())
}

/// [`calculate`] with caller-supplied constants.
pub fn calculate_with(raw: &Value, constants: &PricingConstants) -> CalculationResults {
    run_pipeline(&sanitize(raw), constants)
}

/// Typed entry point. The form is normalized first, so hand-built records
/// with NaN or empty collections are handled exactly like sanitized JSON.
pub fn calculate_form(form: &FormData, constants: &PricingConstants) -> CalculationResults {
    run_pipeline(&form.clone().normalized(), constants)
}

fn run_pipeline(form: &FormData, constants: &PricingConstants) -> CalculationResults {
    let weight = guard_weight_flow(process_weight(form, constants), constants);
    let costs = guard_costs(aggregate_costs(form));
    let pricing = guard_pricing(price(form, &costs, &weight));
    let breakdown = cost_breakdown(&costs);
    let competitors = analyze_competitors(form, pricing.selling_price_per_kg, constants);
    let profit = analyze_profit(form, &pricing, &weight, constants);

    CalculationResults {
        purchase_cost: costs.purchase_cost,
        labor_cost: costs.labor_cost,
        packaging_cost: costs.packaging_cost,
        transport_cost: costs.transport_cost,
        additional_costs: costs.additional_costs,
        total_cost: costs.total_cost,
        vat_amount: pricing.vat_amount,
        total_cost_with_vat: pricing.total_cost_with_vat,
        adjusted_cost: pricing.adjusted_cost,
        selling_price_total: pricing.selling_price_total,
        selling_price_per_kg: pricing.selling_price_per_kg,
        profit_per_kg: pricing.profit_per_kg,
        profit_margin: pricing.applied_margin,
        final_processed_weight: weight.final_processed_weight,
        total_waste_percentage: weight.total_waste_percentage,
        cost_breakdown: breakdown
            .into_iter()
            .map(|entry| CostBreakdownEntry {
                percentage: guard(entry.percentage),
                ..entry
            })
            .collect(),
        competitor_analysis: CompetitorAnalysis {
            competitor1_diff: guard(competitors.competitor1_diff),
            competitor2_diff: guard(competitors.competitor2_diff),
            ..competitors
        },
        profit_analysis: ProfitAnalysis {
            break_even_price: guard(profit.break_even_price),
            margin_at_current_price: guard(profit.margin_at_current_price),
            recommended_margin: guard(profit.recommended_margin),
            recommended_selling_price: guard(profit.recommended_selling_price),
        },
    }
}

/// Overflow from extreme but finite inputs is reported as 0.
fn guard(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn guard_weight_flow(weight: WeightFlow, constants: &PricingConstants) -> WeightFlow {
    WeightFlow {
        final_processed_weight: if weight.final_processed_weight.is_finite() {
            weight.final_processed_weight
        } else {
            constants.weight_floor_kg
        },
        total_waste_percentage: guard(weight.total_waste_percentage),
    }
}

/// Categories are guarded one by one and the total is re-summed from the
/// guarded values. If that sum still overflows, every category reads 0.
fn guard_costs(costs: CostTotals) -> CostTotals {
    let purchase_cost = guard(costs.purchase_cost);
    let labor_cost = guard(costs.labor_cost);
    let packaging_cost = guard(costs.packaging_cost);
    let transport_cost = guard(costs.transport_cost);
    let additional_costs = guard(costs.additional_costs);
    let total_cost =
        purchase_cost + labor_cost + packaging_cost + transport_cost + additional_costs;
    if !total_cost.is_finite() {
        return CostTotals::default();
    }
    CostTotals {
        purchase_cost,
        labor_cost,
        packaging_cost,
        transport_cost,
        additional_costs,
        total_cost,
    }
}

fn guard_pricing(pricing: Pricing) -> Pricing {
    Pricing {
        vat_amount: guard(pricing.vat_amount),
        total_cost_with_vat: guard(pricing.total_cost_with_vat),
        adjusted_cost: guard(pricing.adjusted_cost),
        applied_margin: guard(pricing.applied_margin),
        selling_price_total: guard(pricing.selling_price_total),
        selling_price_per_kg: guard(pricing.selling_price_per_kg),
        profit_per_kg: guard(pricing.profit_per_kg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarketPosition;
    use serde_json::json;

    #[test]
    fn test_empty_input_produces_zeroed_result() {
        let results = calculate(&json!({}));
        assert!(results.total_cost.abs() < f64::EPSILON);
        assert!(results.selling_price_per_kg.abs() < f64::EPSILON);
        assert!((results.final_processed_weight - 0.1).abs() < f64::EPSILON);
        assert!(results.cost_breakdown.is_empty());
        assert_eq!(
            results.competitor_analysis.market_position,
            MarketPosition::Competitive
        );
        assert!((results.profit_analysis.recommended_margin - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overflow_is_guarded() {
        let results = calculate(&json!({
            "purchasePrice": 1e308,
            "quantity": 1e308,
            "vatPercent": 24,
        }));
        assert!(results.purchase_cost.abs() < f64::EPSILON);
        assert!(results.selling_price_per_kg.is_finite());
        assert!(results.final_processed_weight.is_finite());
        let json = serde_json::to_value(&results).unwrap();
        assert!(!json.to_string().contains("null"));
    }

    #[test]
    fn test_overflowing_category_keeps_breakdown_consistent() {
        let results = calculate(&json!({
            "purchasePrice": 1e308,
            "quantity": 10,
            "boxCost": 5,
        }));
        let summed = results.purchase_cost
            + results.labor_cost
            + results.packaging_cost
            + results.transport_cost
            + results.additional_costs;
        assert_eq!(results.total_cost.to_bits(), summed.to_bits());
        assert!((results.total_cost - 5.0).abs() < f64::EPSILON);

        assert_eq!(results.cost_breakdown.len(), 1);
        let entry = &results.cost_breakdown[0];
        assert_eq!(entry.category, crate::CostCategory::Packaging);
        assert!(entry.amount > 0.0);
        assert!((entry.percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_total_zeroes_every_category() {
        let results = calculate(&json!({
            "purchasePrice": 1e308,
            "quantity": 1,
            "driverSalary": 1e308,
        }));
        assert!(results.total_cost.abs() < f64::EPSILON);
        assert!(results.purchase_cost.abs() < f64::EPSILON);
        assert!(results.transport_cost.abs() < f64::EPSILON);
        assert!(results.cost_breakdown.is_empty());
    }

    #[test]
    fn test_typed_entry_matches_json_entry() {
        let raw = json!({
            "purchasePrice": 6,
            "quantity": 40,
            "waste": 5,
            "vatPercent": 13,
            "profitMargin": 30,
        });
        let constants = PricingConstants::default();
        let from_json = calculate_with(&raw, &constants);
        let from_form = calculate_form(&sanitize(&raw), &constants);
        assert_eq!(from_json, from_form);
    }

    #[test]
    fn test_custom_constants_change_thresholds() {
        let raw = json!({
            "purchasePrice": 10,
            "quantity": 10,
            "competitor1": 11.0,
            "competitor2": 10.5,
        });
        let default_position = calculate(&raw).competitor_analysis.market_position;
        assert_eq!(default_position, MarketPosition::Cheap);

        let wide = PricingConstants {
            market_threshold_per_kg: 2.0,
            ..PricingConstants::default()
        };
        let results = calculate_with(&raw, &wide);
        assert_eq!(
            results.competitor_analysis.market_position,
            MarketPosition::Competitive
        );
    }
}
