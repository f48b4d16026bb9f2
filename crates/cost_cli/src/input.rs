use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::io::Read;

/// Read a JSON document from a file path, or stdin when the path is `-`.
pub fn read_json(source: &str) -> Result<Value> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading form from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading form file: {source}"))?
    };
    parse_json(&text, source)
}

fn parse_json(text: &str, source: &str) -> Result<Value> {
    serde_json::from_str(text).with_context(|| format!("parsing form JSON: {source}"))
}

/// A batch file holds a JSON array of form records.
pub fn read_batch(source: &str) -> Result<Vec<Value>> {
    match read_json(source)? {
        Value::Array(forms) => Ok(forms),
        other => bail!(
            "batch input '{source}' must be a JSON array of forms, got {}",
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
