//! Direct cost aggregation. Categories are independent of each other.

use serde::Serialize;

use crate::{CostCategory, FormData};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostTotals {
    pub purchase_cost: f64,
    pub labor_cost: f64,
    pub packaging_cost: f64,
    pub transport_cost: f64,
    pub additional_costs: f64,
    pub total_cost: f64,
}

impl CostTotals {
    pub fn amount(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Purchase => self.purchase_cost,
            CostCategory::Labor => self.labor_cost,
            CostCategory::Packaging => self.packaging_cost,
            CostCategory::Transport => self.transport_cost,
            CostCategory::Additional => self.additional_costs,
        }
    }
}

pub fn aggregate_costs(form: &FormData) -> CostTotals {
    let purchase_cost = form.purchase_price * form.quantity;
    let labor_cost: f64 = form
        .workers
        .iter()
        .map(|worker| worker.hourly_rate * worker.hours)
        .sum();
    let packaging_cost = form.box_cost + form.bag_cost;
    let transport_cost =
        form.distance * form.fuel_cost + form.tolls + form.parking_cost + form.driver_salary;
    let additional_costs = form.electricity_cost
        + form.equipment_cost
        + form.insurance_cost
        + form.rent_cost
        + form.communication_cost
        + form.other_costs;

    CostTotals {
        purchase_cost,
        labor_cost,
        packaging_cost,
        transport_cost,
        additional_costs,
        total_cost: purchase_cost + labor_cost + packaging_cost + transport_cost + additional_costs,
    }
}
