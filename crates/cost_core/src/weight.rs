//! Weight flow through processing phases.

use serde::Serialize;

use crate::{FormData, PricingConstants, ProcessingPhase};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightFlow {
    /// Net weight in kg, never below the configured floor.
    pub final_processed_weight: f64,
    /// Simple sum of positive phase waste. Not compounded, may exceed 100.
    pub total_waste_percentage: f64,
}

/// Run the starting quantity through every active processing phase in order.
///
/// When no phase has any effect (including the sanitizer's synthetic no-op
/// phase) a single fallback step applies `waste` then `glazingPercent`.
pub fn process_weight(form: &FormData, constants: &PricingConstants) -> WeightFlow {
    let floor = constants.weight_floor_kg;
    let initial = form.quantity.max(floor);

    if form.processing_phases.iter().all(ProcessingPhase::is_noop) {
        return fallback_step(form, initial, constants);
    }

    let mut weight = initial;
    let mut total_waste_percentage = 0.0;
    for phase in form.processing_phases.iter().filter(|p| !p.is_noop()) {
        weight = apply_phase(weight, phase.waste_percentage, phase.added_weight).max(floor);
        if phase.waste_percentage > 0.0 {
            total_waste_percentage += phase.waste_percentage;
        }
    }

    WeightFlow {
        final_processed_weight: weight,
        total_waste_percentage,
    }
}

fn fallback_step(form: &FormData, initial: f64, constants: &PricingConstants) -> WeightFlow {
    let floor = constants.weight_floor_kg;
    let waste = form.waste.min(constants.max_fallback_waste_percent);
    let after_waste = (initial * (1.0 - waste / 100.0)).max(floor);
    let after_glazing = (after_waste + after_waste * (form.glazing_percent / 100.0)).max(floor);
    WeightFlow {
        final_processed_weight: after_glazing,
        total_waste_percentage: waste.max(0.0),
    }
}

/// Waste first, then added weight relative to the post-waste weight.
fn apply_phase(weight: f64, waste_percentage: f64, added_weight: f64) -> f64 {
    let after_waste = weight * (1.0 - waste_percentage / 100.0);
    after_waste + after_waste * (added_weight / 100.0)
}
