//! Total cost → VAT-inclusive, seasonally adjusted, margin-priced per kg.

use serde::Serialize;

use crate::costs::CostTotals;
use crate::weight::WeightFlow;
use crate::{CostBreakdownEntry, CostCategory, FormData};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub vat_amount: f64,
    pub total_cost_with_vat: f64,
    pub adjusted_cost: f64,
    /// `max(profitMargin, 0)`; a negative margin never becomes a discount.
    pub applied_margin: f64,
    pub selling_price_total: f64,
    pub selling_price_per_kg: f64,
    pub profit_per_kg: f64,
}

pub fn price(form: &FormData, costs: &CostTotals, weight: &WeightFlow) -> Pricing {
    let net_weight = weight.final_processed_weight;
    let vat_amount = costs.total_cost * (form.vat_percent / 100.0);
    let total_cost_with_vat = costs.total_cost + vat_amount;
    let adjusted_cost = total_cost_with_vat * form.seasonal_multiplier;
    let applied_margin = form.profit_margin.max(0.0);
    let selling_price_total = adjusted_cost * (1.0 + applied_margin / 100.0);
    let selling_price_per_kg = selling_price_total / net_weight;
    let profit_per_kg = selling_price_per_kg - adjusted_cost / net_weight;

    Pricing {
        vat_amount,
        total_cost_with_vat,
        adjusted_cost,
        applied_margin,
        selling_price_total,
        selling_price_per_kg,
        profit_per_kg,
    }
}

/// Share of each positive category in the pre-VAT total. Zero-cost
/// categories are omitted rather than listed at 0%.
pub fn cost_breakdown(costs: &CostTotals) -> Vec<CostBreakdownEntry> {
    CostCategory::ALL
        .iter()
        .map(|&category| (category, costs.amount(category)))
        .filter(|&(_, amount)| amount > 0.0)
        .map(|(category, amount)| CostBreakdownEntry {
            category,
            label: category.label().to_string(),
            amount,
            percentage: if costs.total_cost == 0.0 {
                0.0
            } else {
                amount / costs.total_cost * 100.0
            },
        })
        .collect()
}
