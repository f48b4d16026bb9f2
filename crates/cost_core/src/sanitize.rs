//! Input sanitizer: untrusted JSON → complete `FormData`.
//!
//! Numeric fields follow dynamic `Number(x)` coercion: numbers pass through,
//! strings are parsed (blank → 0), booleans become 1/0 and `null` becomes 0.
//! Anything else, or a non-finite result, falls back to the field default.
//! The function is total; nothing here returns an error.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{FormData, ProcessingPhase, Worker};

/// Fields that were present in the input but unusable and were replaced by
/// their default. Missing fields are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SanitizeReport {
    pub rejected: Vec<String>,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Sanitize an arbitrary JSON value into a `FormData`.
pub fn sanitize(raw: &Value) -> FormData {
    sanitize_with_report(raw).0
}

/// Like [`sanitize`], also reporting which present fields were rejected.
pub fn sanitize_with_report(raw: &Value) -> (FormData, SanitizeReport) {
    let mut report = SanitizeReport::default();
    if !raw.is_object() && !raw.is_null() {
        report.rejected.push("$".to_string());
    }
    let defaults = FormData::default();
    let mut r = Reader::new(raw.as_object(), String::new(), &mut report);

    let form = FormData {
        product_name: r.string("productName"),
        product_category: r.string("productCategory"),
        batch_number: r.string("batchNumber"),
        supplier: r.string("supplier"),
        origin: r.string("origin"),
        catch_method: r.string("catchMethod"),
        catch_date: r.string("catchDate"),
        notes: r.string("notes"),
        storage_temperature: r.number("storageTemperature", defaults.storage_temperature),
        shelf_life: r.number("shelfLife", defaults.shelf_life),
        certifications: r.string_set("certifications"),
        purchase_price: r.number("purchasePrice", 0.0),
        quantity: r.number("quantity", 0.0),
        waste: r.number("waste", 0.0),
        glazing_percent: r.number("glazingPercent", 0.0),
        vat_percent: r.number("vatPercent", 0.0),
        workers: r.list("workers", sanitize_worker, Worker::default),
        box_cost: r.number("boxCost", 0.0),
        bag_cost: r.number("bagCost", 0.0),
        distance: r.number("distance", 0.0),
        fuel_cost: r.number("fuelCost", 0.0),
        tolls: r.number("tolls", 0.0),
        parking_cost: r.number("parkingCost", 0.0),
        driver_salary: r.number("driverSalary", 0.0),
        electricity_cost: r.number("electricityCost", 0.0),
        equipment_cost: r.number("equipmentCost", 0.0),
        insurance_cost: r.number("insuranceCost", 0.0),
        rent_cost: r.number("rentCost", 0.0),
        communication_cost: r.number("communicationCost", 0.0),
        other_costs: r.number("otherCosts", 0.0),
        competitor1: r.number("competitor1", 0.0),
        competitor2: r.number("competitor2", 0.0),
        profit_margin: r.number("profitMargin", 0.0),
        minimum_margin: r.number("minimumMargin", defaults.minimum_margin),
        seasonal_multiplier: r.number("seasonalMultiplier", defaults.seasonal_multiplier),
        processing_phases: r.list("processingPhases", sanitize_phase, ProcessingPhase::default),
    };
    (form, report)
}

fn sanitize_worker(r: &mut Reader<'_, '_>) -> Worker {
    Worker {
        id: r.id("id"),
        hourly_rate: r.number("hourlyRate", 0.0),
        hours: r.number("hours", 0.0),
    }
}

fn sanitize_phase(r: &mut Reader<'_, '_>) -> ProcessingPhase {
    ProcessingPhase {
        id: r.id("id"),
        name: r.string("name"),
        waste_percentage: r.number("wastePercentage", 0.0),
        added_weight: r.number("addedWeight", 0.0),
    }
}

/// `Number(x)`-style coercion. `None` means the cast failed.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                parse_numeric_literal(trimmed)?
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Decimal text, or an unsigned `0x`/`0o`/`0b` integer literal.
fn parse_numeric_literal(text: &str) -> Option<f64> {
    let radix = match text.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return text.parse().ok(),
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        Some(acc * f64::from(radix) + f64::from(c.to_digit(radix)?))
    })
}

/// Field accessor over one JSON object that records rejected fields.
struct Reader<'a, 'r> {
    fields: Option<&'a Map<String, Value>>,
    path: String,
    report: &'r mut SanitizeReport,
}

impl<'a, 'r> Reader<'a, 'r> {
    fn new(
        fields: Option<&'a Map<String, Value>>,
        path: String,
        report: &'r mut SanitizeReport,
    ) -> Self {
        Self {
            fields,
            path,
            report,
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.and_then(|fields| fields.get(key))
    }

    fn reject(&mut self, key: &str) {
        let field = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        };
        self.report.rejected.push(field);
    }

    fn number(&mut self, key: &str, default: f64) -> f64 {
        let Some(value) = self.get(key) else {
            return default;
        };
        if let Some(n) = coerce_number(value) {
            n
        } else {
            self.reject(key);
            default
        }
    }

    fn string(&mut self, key: &str) -> String {
        match self.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Array(_) | Value::Object(_)) => {
                self.reject(key);
                String::new()
            }
        }
    }

    /// Identifier fields: strings kept, numbers stringified, otherwise `"1"`.
    fn id(&mut self, key: &str) -> String {
        match self.get(key) {
            None | Some(Value::Null) => "1".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                self.reject(key);
                "1".to_string()
            }
        }
    }

    fn string_set(&mut self, key: &str) -> BTreeSet<String> {
        match self.get(key) {
            None | Some(Value::Null) => BTreeSet::new(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(_) => {
                self.reject(key);
                BTreeSet::new()
            }
        }
    }

    /// Non-empty list guarantee: an absent, empty or non-array value yields a
    /// single default element.
    fn list<T>(
        &mut self,
        key: &str,
        mut element: impl FnMut(&mut Reader<'a, '_>) -> T,
        default: impl Fn() -> T,
    ) -> Vec<T> {
        let items = match self.get(key) {
            Some(Value::Array(items)) if !items.is_empty() => items,
            None | Some(Value::Null | Value::Array(_)) => return vec![default()],
            Some(_) => {
                self.reject(key);
                return vec![default()];
            }
        };
        let prefix = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let path = format!("{prefix}[{index}]");
                if !item.is_object() {
                    self.report.rejected.push(path.clone());
                }
                let mut nested = Reader::new(item.as_object(), path, self.report);
                element(&mut nested)
            })
            .collect()
    }
}

macro_rules! finite_or_default {
    ($target:expr, $defaults:expr; $($field:ident),+ $(,)?) => {
        $(
            if !$target.$field.is_finite() {
                $target.$field = $defaults.$field;
            }
        )+
    };
}

impl FormData {
    /// Enforce the sanitized invariants on an already-typed record: every
    /// number finite, `workers` and `processingPhases` non-empty.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let defaults = FormData::default();
        finite_or_default!(self, defaults;
            storage_temperature, shelf_life,
            purchase_price, quantity, waste, glazing_percent, vat_percent,
            box_cost, bag_cost,
            distance, fuel_cost, tolls, parking_cost, driver_salary,
            electricity_cost, equipment_cost, insurance_cost, rent_cost,
            communication_cost, other_costs,
            competitor1, competitor2, profit_margin, minimum_margin, seasonal_multiplier,
        );
        for worker in &mut self.workers {
            if !worker.hourly_rate.is_finite() {
                worker.hourly_rate = 0.0;
            }
            if !worker.hours.is_finite() {
                worker.hours = 0.0;
            }
        }
        for phase in &mut self.processing_phases {
            if !phase.waste_percentage.is_finite() {
                phase.waste_percentage = 0.0;
            }
            if !phase.added_weight.is_finite() {
                phase.added_weight = 0.0;
            }
        }
        if self.workers.is_empty() {
            self.workers.push(Worker::default());
        }
        if self.processing_phases.is_empty() {
            self.processing_phases.push(ProcessingPhase::default());
        }
        self
    }
}
