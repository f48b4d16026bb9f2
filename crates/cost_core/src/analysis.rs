//! Competitor comparison and profitability reference prices.

use crate::pricing::Pricing;
use crate::weight::WeightFlow;
use crate::{CompetitorAnalysis, FormData, MarketPosition, PricingConstants, ProfitAnalysis};

/// Compare our per-kg price with both competitors.
///
/// An absent competitor price is 0 and still runs through the arithmetic;
/// callers decide whether to show the comparison.
pub fn analyze_competitors(
    form: &FormData,
    selling_price_per_kg: f64,
    constants: &PricingConstants,
) -> CompetitorAnalysis {
    let competitor1_diff = form.competitor1 - selling_price_per_kg;
    let competitor2_diff = form.competitor2 - selling_price_per_kg;
    CompetitorAnalysis {
        competitor1_diff,
        competitor2_diff,
        market_position: market_position(
            competitor1_diff,
            competitor2_diff,
            constants.market_threshold_per_kg,
        ),
    }
}

/// First match wins: `Cheap` is checked before `Expensive`, so one competitor
/// far above us outweighs another far below.
pub fn market_position(diff1: f64, diff2: f64, threshold: f64) -> MarketPosition {
    if diff1 > threshold || diff2 > threshold {
        MarketPosition::Cheap
    } else if diff1 < -threshold || diff2 < -threshold {
        MarketPosition::Expensive
    } else {
        MarketPosition::Competitive
    }
}

pub fn analyze_profit(
    form: &FormData,
    pricing: &Pricing,
    weight: &WeightFlow,
    constants: &PricingConstants,
) -> ProfitAnalysis {
    // Recomputed here rather than taken from `Pricing`; both must agree.
    let break_even_price = pricing.adjusted_cost / weight.final_processed_weight;
    let selling_price_per_kg = pricing.selling_price_per_kg;
    let margin_at_current_price = if selling_price_per_kg <= 0.0 {
        0.0
    } else {
        (selling_price_per_kg - break_even_price) / selling_price_per_kg * 100.0
    };
    let recommended_margin = form
        .minimum_margin
        .max(constants.recommended_margin_floor_percent);
    let recommended_selling_price = break_even_price * (1.0 + recommended_margin / 100.0);

    ProfitAnalysis {
        break_even_price,
        margin_at_current_price,
        recommended_margin,
        recommended_selling_price,
    }
}
