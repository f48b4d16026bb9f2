//! `cost_core`: deterministic seafood batch costing.
//!
//! No IO, no clock, no randomness. One call turns a raw form record into a
//! reconciled cost breakdown, selling price and market/profit analysis.

pub mod analysis;
pub mod costs;
mod engine;
pub mod pricing;
mod sanitize;
mod types;
pub mod weight;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use engine::{calculate, calculate_form, calculate_with};
pub use sanitize::{sanitize, sanitize_with_report, SanitizeReport};
pub use types::*;
