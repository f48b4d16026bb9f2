use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cost_core::{CalculationResults, PricingConstants};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod input;
mod report;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "cost_cli", about = "Seafood batch costing CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConstantsArgs {
    /// Pricing constants JSON file. Built-in defaults when omitted.
    #[arg(long)]
    constants: Option<PathBuf>,
    /// Override one constant, e.g. --set market_threshold_per_kg=0.75. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

impl ConstantsArgs {
    fn resolve(&self) -> Result<PricingConstants> {
        cost_config::resolve_constants(self.constants.as_deref(), &self.overrides)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate one form and print the results.
    Calculate {
        /// Form JSON file, or - for stdin.
        #[arg(long, default_value = "-")]
        input: String,
        /// Print a human-readable report instead of JSON.
        #[arg(long)]
        summary: bool,
        #[command(flatten)]
        constants: ConstantsArgs,
    },
    /// Calculate a JSON array of forms in parallel.
    Batch {
        /// JSON file containing an array of forms, or - for stdin.
        #[arg(long)]
        input: String,
        #[command(flatten)]
        constants: ConstantsArgs,
    },
    /// Print the sanitized form without calculating.
    Sanitize {
        #[arg(long, default_value = "-")]
        input: String,
    },
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn calculate(source: &str, summary: bool, constants: &PricingConstants) -> Result<()> {
    let raw = input::read_json(source)?;
    let (form, sanitize_report) = cost_core::sanitize_with_report(&raw);
    if !sanitize_report.is_clean() {
        tracing::warn!(
            fields = ?sanitize_report.rejected,
            "input fields replaced by defaults"
        );
    }
    let results = cost_core::calculate_form(&form, constants);
    if summary {
        let text = report::render_summary(&form, &results).context("rendering summary")?;
        print!("{text}");
    } else {
        let json = serde_json::to_string_pretty(&results).context("serializing results")?;
        println!("{json}");
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    index: usize,
    batch_number: String,
    product_name: String,
    rejected_fields: Vec<String>,
    results: CalculationResults,
}

fn calculate_batch(forms: &[serde_json::Value], constants: &PricingConstants) -> Vec<BatchEntry> {
    forms
        .par_iter()
        .enumerate()
        .map(|(index, raw)| {
            let (form, sanitize_report) = cost_core::sanitize_with_report(raw);
            let results = cost_core::calculate_form(&form, constants);
            BatchEntry {
                index,
                batch_number: form.batch_number,
                product_name: form.product_name,
                rejected_fields: sanitize_report.rejected,
                results,
            }
        })
        .collect()
}

fn batch(source: &str, constants: &PricingConstants) -> Result<()> {
    let forms = input::read_batch(source)?;
    tracing::info!(count = forms.len(), source, "calculating batch");
    let entries = calculate_batch(&forms, constants);
    let with_defaults = entries
        .iter()
        .filter(|e| !e.rejected_fields.is_empty())
        .count();
    if with_defaults > 0 {
        tracing::warn!(forms = with_defaults, "some forms had fields replaced by defaults");
    }
    let json = serde_json::to_string_pretty(&entries).context("serializing batch results")?;
    println!("{json}");
    Ok(())
}

fn sanitize(source: &str) -> Result<()> {
    let raw = input::read_json(source)?;
    let form = cost_core::sanitize(&raw);
    let json = serde_json::to_string_pretty(&form).context("serializing form")?;
    println!("{json}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Calculate {
            input,
            summary,
            constants,
        } => calculate(&input, summary, &constants.resolve()?)?,
        Commands::Batch { input, constants } => batch(&input, &constants.resolve()?)?,
        Commands::Sanitize { input } => sanitize(&input)?,
    }
    Ok(())
}
