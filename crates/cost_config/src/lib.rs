//! Pricing-constant loading shared between cost_cli and cost_daemon.

use anyhow::{bail, Context, Result};
use cost_core::PricingConstants;
use std::collections::HashMap;
use std::path::Path;

mod overrides;

pub use overrides::{apply_overrides, parse_override, VALID_KEYS};

/// Load and validate constants from a JSON file. Missing keys keep their
/// built-in defaults.
pub fn load_constants(path: &Path) -> Result<PricingConstants> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading constants file: {}", path.display()))?;
    let constants: PricingConstants = serde_json::from_str(&json)
        .with_context(|| format!("parsing constants file: {}", path.display()))?;
    validate_constants(&constants)
        .with_context(|| format!("validating constants file: {}", path.display()))?;
    Ok(constants)
}

/// Resolve constants for a binary: an explicit file if given, otherwise the
/// built-in defaults, then `key=value` overrides on top.
pub fn resolve_constants(path: Option<&Path>, overrides: &[String]) -> Result<PricingConstants> {
    let mut constants = match path {
        Some(path) => load_constants(path)?,
        None => PricingConstants::default(),
    };
    let parsed = overrides
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<Result<HashMap<_, _>>>()?;
    apply_overrides(&mut constants, &parsed)?;
    validate_constants(&constants).context("validating overridden constants")?;
    Ok(constants)
}

pub fn validate_constants(constants: &PricingConstants) -> Result<()> {
    let all = [
        ("weight_floor_kg", constants.weight_floor_kg),
        ("max_fallback_waste_percent", constants.max_fallback_waste_percent),
        ("market_threshold_per_kg", constants.market_threshold_per_kg),
        (
            "recommended_margin_floor_percent",
            constants.recommended_margin_floor_percent,
        ),
    ];
    for (key, value) in all {
        if !value.is_finite() {
            bail!("'{key}' must be a finite number, got {value}");
        }
    }
    if constants.weight_floor_kg <= 0.0 {
        bail!(
            "'weight_floor_kg' must be > 0 (it guards every per-kg division), got {}",
            constants.weight_floor_kg
        );
    }
    if constants.max_fallback_waste_percent <= 0.0 || constants.max_fallback_waste_percent > 100.0
    {
        bail!(
            "'max_fallback_waste_percent' must be in (0, 100], got {}",
            constants.max_fallback_waste_percent
        );
    }
    if constants.market_threshold_per_kg < 0.0 {
        bail!(
            "'market_threshold_per_kg' must be >= 0, got {}",
            constants.market_threshold_per_kg
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_shipped_constants_match_defaults() {
        let shipped: PricingConstants =
            serde_json::from_str(include_str!("../../../content/pricing_constants.json")).unwrap();
        assert_eq!(shipped, PricingConstants::default());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let file = write_temp(r#"{ "market_threshold_per_kg": 1.25 }"#);
        let constants = load_constants(file.path()).unwrap();
        assert!((constants.market_threshold_per_kg - 1.25).abs() < f64::EPSILON);
        assert!((constants.weight_floor_kg - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_rejects_zero_weight_floor() {
        let file = write_temp(r#"{ "weight_floor_kg": 0.0 }"#);
        let err = load_constants(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("weight_floor_kg"));
    }

    #[test]
    fn test_load_rejects_waste_clamp_above_100() {
        let file = write_temp(r#"{ "max_fallback_waste_percent": 120 }"#);
        assert!(load_constants(file.path()).is_err());
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let file = write_temp("{ not json");
        let err = load_constants(file.path()).unwrap_err();
        assert!(err.to_string().contains("parsing constants file"));
    }

    #[test]
    fn test_missing_file_fails_with_path() {
        let err = load_constants(Path::new("/nonexistent/constants.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/constants.json"));
    }

    #[test]
    fn test_resolve_applies_overrides_after_file() {
        let file = write_temp(r#"{ "market_threshold_per_kg": 1.0 }"#);
        let constants = resolve_constants(
            Some(file.path()),
            &["market_threshold_per_kg=0.75".to_string()],
        )
        .unwrap();
        assert!((constants.market_threshold_per_kg - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_validates_overrides() {
        let result = resolve_constants(None, &["weight_floor_kg=-1".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_without_inputs_is_default() {
        let constants = resolve_constants(None, &[]).unwrap();
        assert_eq!(constants, PricingConstants::default());
    }
}
