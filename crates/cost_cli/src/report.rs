//! Plain-text summary of one calculation.

use cost_core::{CalculationResults, FormData};
use std::fmt::{self, Write};

pub fn render_summary(
    form: &FormData,
    results: &CalculationResults,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let title = if form.product_name.is_empty() {
        "(unnamed product)"
    } else {
        form.product_name.as_str()
    };
    writeln!(out, "{title}")?;
    if !form.batch_number.is_empty() {
        writeln!(out, "batch: {}", form.batch_number)?;
    }
    writeln!(out, "{}", "-".repeat(60))?;

    writeln!(
        out,
        "weight: {:.2} kg -> {:.2} kg  (waste {:.1}%)",
        form.quantity, results.final_processed_weight, results.total_waste_percentage,
    )?;

    writeln!(out, "\ncost breakdown:")?;
    if results.cost_breakdown.is_empty() {
        writeln!(out, "  (no costs)")?;
    }
    for entry in &results.cost_breakdown {
        writeln!(
            out,
            "  {:<18} {:>12.2}  {:>6.2}%",
            entry.label, entry.amount, entry.percentage
        )?;
    }
    writeln!(out, "  {:<18} {:>12.2}", "total", results.total_cost)?;
    writeln!(out, "  {:<18} {:>12.2}", "VAT", results.vat_amount)?;
    writeln!(out, "  {:<18} {:>12.2}", "adjusted", results.adjusted_cost)?;

    writeln!(out, "\npricing:")?;
    writeln!(
        out,
        "  selling price      {:>12.2}  ({:.3}/kg, margin {:.1}%)",
        results.selling_price_total, results.selling_price_per_kg, results.profit_margin,
    )?;
    writeln!(out, "  profit per kg      {:>12.3}", results.profit_per_kg)?;

    let competitors = &results.competitor_analysis;
    writeln!(
        out,
        "\nmarket: {}  (competitor 1 {:+.2}, competitor 2 {:+.2})",
        competitors.market_position, competitors.competitor1_diff, competitors.competitor2_diff,
    )?;

    let profit = &results.profit_analysis;
    writeln!(out, "\nprofit analysis:")?;
    writeln!(out, "  break-even/kg      {:>12.3}", profit.break_even_price)?;
    writeln!(
        out,
        "  current margin     {:>11.1}%",
        profit.margin_at_current_price
    )?;
    writeln!(
        out,
        "  recommended        {:>12.3}  (margin {:.1}%)",
        profit.recommended_selling_price, profit.recommended_margin,
    )?;
    Ok(out)
}
