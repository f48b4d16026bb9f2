use anyhow::{anyhow, bail, Result};
use cost_core::PricingConstants;
use std::collections::HashMap;

pub const VALID_KEYS: &[&str] = &[
    "weight_floor_kg",
    "max_fallback_waste_percent",
    "market_threshold_per_kg",
    "recommended_margin_floor_percent",
];

pub fn apply_overrides(
    constants: &mut PricingConstants,
    overrides: &HashMap<String, serde_json::Value>,
) -> Result<()> {
    for (key, value) in overrides {
        match key.as_str() {
            "weight_floor_kg" => constants.weight_floor_kg = as_f64(key, value)?,
            "max_fallback_waste_percent" => {
                constants.max_fallback_waste_percent = as_f64(key, value)?;
            }
            "market_threshold_per_kg" => {
                constants.market_threshold_per_kg = as_f64(key, value)?;
            }
            "recommended_margin_floor_percent" => {
                constants.recommended_margin_floor_percent = as_f64(key, value)?;
            }
            _ => bail!(
                "unknown override key '{key}'. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
    }
    Ok(())
}

/// Parse a `key=value` flag. The value is read as JSON, so `0.75` is a
/// number and `"0.75"` a string.
pub fn parse_override(raw: &str) -> Result<(String, serde_json::Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("override '{raw}': expected key=value");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("override '{raw}': key must not be empty");
    }
    let value: serde_json::Value = serde_json::from_str(value.trim())
        .map_err(|err| anyhow!("override '{key}': value is not valid JSON: {err}"))?;
    Ok((key.to_string(), value))
}

fn as_f64(key: &str, value: &serde_json::Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| anyhow!("override '{key}': expected a number, got {value}"))
}
