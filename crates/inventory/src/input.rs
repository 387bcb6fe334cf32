//! Loosely-typed input boundary.
//!
//! Callers that receive item names and quantities as untyped JSON (scripts,
//! request payloads) go through these checks before reaching the typed
//! `Inventory` API. Each check reproduces one rejection of the stock rules and
//! names the offending JSON type in its message.

use serde_json::Value;

use stockroom_core::{DomainError, DomainResult};

use crate::item::{Amount, ItemName};

/// Human-readable name of a JSON value's type.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Item name for additions: must be a non-empty string.
pub fn item_name(value: &Value) -> DomainResult<ItemName> {
    match value {
        Value::String(s) => ItemName::parse(s.as_str()),
        _ => Err(DomainError::invalid_input("Invalid item name provided")),
    }
}

/// Item key for lookups and removals: must be a string.
pub fn item_key(value: &Value) -> DomainResult<&str> {
    value.as_str().ok_or_else(|| {
        DomainError::invalid_input(format!(
            "Invalid item type: expected str, got {}",
            type_name(value)
        ))
    })
}

/// Quantity for additions: must be an integer that fits in `i64`.
///
/// Sign is not checked here.
pub fn whole_quantity(item: &ItemName, value: &Value) -> DomainResult<i64> {
    match value {
        Value::Number(n) if n.is_i64() => n
            .as_i64()
            .ok_or_else(|| DomainError::invalid_input(format!("Quantity out of range for {item}"))),
        Value::Number(n) if n.is_u64() => Err(DomainError::invalid_input(format!(
            "Quantity out of range for {item}"
        ))),
        other => Err(DomainError::invalid_input(format!(
            "Invalid quantity type for {item}: expected int, got {}",
            type_name(other)
        ))),
    }
}

/// Numeric amount for removals: integer or float, non-negative and finite.
pub fn amount(value: &Value) -> DomainResult<Amount> {
    numeric(value)
        .ok_or_else(|| DomainError::invalid_input(format!("Invalid quantity: {value}")))?
        .validate()
}

/// Numeric low-stock threshold: integer or float, non-negative and finite.
pub fn threshold(value: &Value) -> DomainResult<Amount> {
    numeric(value)
        .and_then(|t| t.validate().ok())
        .ok_or_else(|| DomainError::invalid_input(format!("Invalid threshold: {value}")))
}

fn numeric(value: &Value) -> Option<Amount> {
    let Value::Number(n) = value else {
        return None;
    };
    match n.as_i64() {
        Some(whole) => Some(Amount::Whole(whole)),
        None => n.as_f64().map(Amount::Fractional),
    }
}
