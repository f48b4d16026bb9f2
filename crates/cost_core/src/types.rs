//! Type definitions for `cost_core`.
//!
//! Input (`FormData`), output (`CalculationResults`) and the tunable
//! `PricingConstants` record. All records serialize camelCase so they match
//! the form layer that produces them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Worker {
    pub id: String,
    pub hourly_rate: f64,
    pub hours: f64,
}

impl Default for Worker {
    fn default() -> Self {
        Self {
            id: "1".to_string(),
            hourly_rate: 0.0,
            hours: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingPhase {
    pub id: String,
    pub name: String,
    /// Mass lost in this phase, percent of the phase's input weight.
    pub waste_percentage: f64,
    /// Mass gained after the waste step (e.g. ice glaze), signed percent.
    pub added_weight: f64,
}

impl ProcessingPhase {
    /// A phase with no waste and no added weight leaves the weight untouched.
    pub fn is_noop(&self) -> bool {
        self.waste_percentage == 0.0 && self.added_weight == 0.0
    }
}

impl Default for ProcessingPhase {
    fn default() -> Self {
        Self {
            id: "1".to_string(),
            name: String::new(),
            waste_percentage: 0.0,
            added_weight: 0.0,
        }
    }
}

/// Fully sanitized engine input.
///
/// Every numeric field is finite and both collections are non-empty once the
/// record has passed through [`crate::sanitize`] or [`FormData::normalized`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    // Product identity
    pub product_name: String,
    pub product_category: String,
    pub batch_number: String,
    pub supplier: String,
    pub origin: String,
    pub catch_method: String,
    pub catch_date: String,
    pub notes: String,
    /// Degrees Celsius.
    pub storage_temperature: f64,
    /// Days.
    pub shelf_life: f64,
    pub certifications: BTreeSet<String>,

    // Purchase
    pub purchase_price: f64,
    pub quantity: f64,
    pub waste: f64,
    pub glazing_percent: f64,
    pub vat_percent: f64,

    // Labor
    pub workers: Vec<Worker>,

    // Packaging
    pub box_cost: f64,
    pub bag_cost: f64,

    // Transport
    pub distance: f64,
    pub fuel_cost: f64,
    pub tolls: f64,
    pub parking_cost: f64,
    pub driver_salary: f64,

    // Additional costs
    pub electricity_cost: f64,
    pub equipment_cost: f64,
    pub insurance_cost: f64,
    pub rent_cost: f64,
    pub communication_cost: f64,
    pub other_costs: f64,

    // Market
    pub competitor1: f64,
    pub competitor2: f64,
    pub profit_margin: f64,
    pub minimum_margin: f64,
    pub seasonal_multiplier: f64,

    pub processing_phases: Vec<ProcessingPhase>,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            product_category: String::new(),
            batch_number: String::new(),
            supplier: String::new(),
            origin: String::new(),
            catch_method: String::new(),
            catch_date: String::new(),
            notes: String::new(),
            storage_temperature: -18.0,
            shelf_life: 365.0,
            certifications: BTreeSet::new(),
            purchase_price: 0.0,
            quantity: 0.0,
            waste: 0.0,
            glazing_percent: 0.0,
            vat_percent: 0.0,
            workers: vec![Worker::default()],
            box_cost: 0.0,
            bag_cost: 0.0,
            distance: 0.0,
            fuel_cost: 0.0,
            tolls: 0.0,
            parking_cost: 0.0,
            driver_salary: 0.0,
            electricity_cost: 0.0,
            equipment_cost: 0.0,
            insurance_cost: 0.0,
            rent_cost: 0.0,
            communication_cost: 0.0,
            other_costs: 0.0,
            competitor1: 0.0,
            competitor2: 0.0,
            profit_margin: 0.0,
            minimum_margin: 15.0,
            seasonal_multiplier: 1.0,
            processing_phases: vec![ProcessingPhase::default()],
        }
    }
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostCategory {
    Purchase,
    Labor,
    Packaging,
    Transport,
    Additional,
}

impl CostCategory {
    /// Breakdown order as shown to the user.
    pub const ALL: [CostCategory; 5] = [
        CostCategory::Purchase,
        CostCategory::Labor,
        CostCategory::Packaging,
        CostCategory::Transport,
        CostCategory::Additional,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Purchase => "Purchase",
            CostCategory::Labor => "Labor",
            CostCategory::Packaging => "Packaging",
            CostCategory::Transport => "Transport",
            CostCategory::Additional => "Additional costs",
        }
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdownEntry {
    pub category: CostCategory,
    pub label: String,
    pub amount: f64,
    /// Share of `totalCost`, in percent.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarketPosition {
    Competitive,
    Cheap,
    Expensive,
}

impl MarketPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            MarketPosition::Competitive => "competitive",
            MarketPosition::Cheap => "cheap",
            MarketPosition::Expensive => "expensive",
        }
    }
}

impl std::fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysis {
    /// `competitor1 - sellingPricePerKg`; positive means we undercut them.
    pub competitor1_diff: f64,
    pub competitor2_diff: f64,
    pub market_position: MarketPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitAnalysis {
    pub break_even_price: f64,
    pub margin_at_current_price: f64,
    pub recommended_margin: f64,
    pub recommended_selling_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResults {
    pub purchase_cost: f64,
    pub labor_cost: f64,
    pub packaging_cost: f64,
    pub transport_cost: f64,
    pub additional_costs: f64,
    pub total_cost: f64,
    pub vat_amount: f64,
    pub total_cost_with_vat: f64,
    pub adjusted_cost: f64,
    pub selling_price_total: f64,
    pub selling_price_per_kg: f64,
    pub profit_per_kg: f64,
    /// Applied margin percentage (negative input clamped to zero).
    pub profit_margin: f64,
    pub final_processed_weight: f64,
    pub total_waste_percentage: f64,
    pub cost_breakdown: Vec<CostBreakdownEntry>,
    pub competitor_analysis: CompetitorAnalysis,
    pub profit_analysis: ProfitAnalysis,
}

// ---------------------------------------------------------------------------
// Tunables
// ---------------------------------------------------------------------------

/// Engine constants. `Default` carries the production values; deployments can
/// load a tuned copy through `cost_config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConstants {
    /// Minimum weight in kg at every step of the weight flow.
    pub weight_floor_kg: f64,
    /// Upper clamp for `waste` in the single-step fallback, percent.
    pub max_fallback_waste_percent: f64,
    /// Price gap in currency per kg beyond which we are cheap/expensive.
    pub market_threshold_per_kg: f64,
    /// Lower bound for the recommended margin, percent.
    pub recommended_margin_floor_percent: f64,
}

impl Default for PricingConstants {
    fn default() -> Self {
        Self {
            weight_floor_kg: 0.1,
            max_fallback_waste_percent: 99.0,
            market_threshold_per_kg: 0.5,
            recommended_margin_floor_percent: 20.0,
        }
    }
}
