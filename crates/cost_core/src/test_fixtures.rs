//! Shared test fixtures for cost_core and downstream crates.
//!
//! `reference_form_json()` is the documented reference batch: 100 kg bought at
//! 5/kg, 10% waste, 24% VAT, one worker for 8h at 5/h, 15 of packaging and a
//! 20% margin.

use serde_json::{json, Value};

use crate::{sanitize, FormData, ProcessingPhase, Worker};

pub fn reference_form_json() -> Value {
    json!({
        "productName": "Gilthead sea bream",
        "purchasePrice": 5,
        "quantity": 100,
        "waste": 10,
        "glazingPercent": 0,
        "vatPercent": 24,
        "workers": [{"id": "1", "hourlyRate": 5, "hours": 8}],
        "boxCost": 10,
        "bagCost": 5,
        "profitMargin": 20,
    })
}

pub fn reference_form() -> FormData {
    sanitize(&reference_form_json())
}

/// A form where every cost category is positive.
pub fn full_cost_form() -> FormData {
    FormData {
        purchase_price: 7.5,
        quantity: 250.0,
        waste: 12.0,
        vat_percent: 13.0,
        workers: vec![worker(6.5, 8.0), worker(5.0, 4.0)],
        box_cost: 22.0,
        bag_cost: 8.0,
        distance: 180.0,
        fuel_cost: 0.18,
        tolls: 12.4,
        parking_cost: 5.0,
        driver_salary: 60.0,
        electricity_cost: 14.0,
        equipment_cost: 9.0,
        insurance_cost: 6.0,
        rent_cost: 30.0,
        communication_cost: 2.5,
        other_costs: 4.0,
        competitor1: 14.0,
        competitor2: 15.5,
        profit_margin: 25.0,
        ..FormData::default()
    }
}

pub fn worker(hourly_rate: f64, hours: f64) -> Worker {
    Worker {
        hourly_rate,
        hours,
        ..Worker::default()
    }
}

pub fn phase(name: &str, waste_percentage: f64, added_weight: f64) -> ProcessingPhase {
    ProcessingPhase {
        id: name.to_string(),
        name: name.to_string(),
        waste_percentage,
        added_weight,
    }
}

/// Absolute tolerance used by the numeric assertions in tests.
pub const TOLERANCE: f64 = 1e-9;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}
