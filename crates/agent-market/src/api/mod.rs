//! Market-data API access

pub mod client;

pub use client::MarketDataClient;

use crate::error::{MarketError, Result};
use serde_json::Value;

/// Numeric field as `f64`
///
/// The API sends prices and balances sometimes as numbers and sometimes as
/// numeric strings. Anything else, including a missing field, reads as `0.0`.
pub fn as_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

/// String field, `null` when absent
pub fn text(value: &Value, key: &str) -> Value {
    value
        .get(key)
        .and_then(Value::as_str)
        .map_or(Value::Null, |s| Value::String(s.to_string()))
}

/// List items of a response body
///
/// Accepts a bare array or an object carrying the array under one of `keys`.
pub fn items(body: Value, keys: &[&str]) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => keys
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                MarketError::InvalidResponse(format!("expected a list under one of {keys:?}"))
            }),
        other => Err(MarketError::InvalidResponse(format!(
            "expected a JSON list, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
