//! String to value conversions used when normalizing SWAPI records.
//!
//! SWAPI reports nearly every field as text, including numbers ("172"),
//! lists ("blond, fair") and missing data ("unknown", "n/a"). The strict
//! `parse_*` functions report failure explicitly; the `to_*` wrappers keep
//! the original text when a value can't be converted.

use serde_json::{Number, Value};
use thiserror::Error;

const UNKNOWN_SENTINELS: [&str; 2] = ["unknown", "n/a"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("'{0}' is not a decimal number")]
    NotFloat(String),
    #[error("'{0}' is not an integer")]
    NotInt(String),
}

/// Returns true when `value` is an unknown sentinel ("unknown" or "n/a"),
/// ignoring case and surrounding whitespace.
pub fn is_unknown(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    UNKNOWN_SENTINELS.contains(&value.as_str())
}

/// Parses plain decimal notation such as `1`, `-0.5` or `12.`.
///
/// Exponents, `inf`, `NaN` and boolean-like text are rejected even though
/// `f64::from_str` would take some of them.
pub fn parse_float(value: &str) -> Result<f64, CoercionError> {
    let trimmed = value.trim();
    let unsigned = trimmed.strip_prefix(&['+', '-'][..]).unwrap_or(trimmed);

    let mut digits = 0;
    let mut dots = 0;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return Err(CoercionError::NotFloat(value.to_string())),
        }
    }
    if digits == 0 || dots > 1 {
        return Err(CoercionError::NotFloat(value.to_string()));
    }

    // Digit runs past f64::MAX parse to infinity rather than failing
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(CoercionError::NotFloat(value.to_string())),
    }
}

/// Parses an optionally signed run of decimal digits.
pub fn parse_int(value: &str) -> Result<i64, CoercionError> {
    let trimmed = value.trim();
    let unsigned = trimmed.strip_prefix(&['+', '-'][..]).unwrap_or(trimmed);

    if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoercionError::NotInt(value.to_string()));
    }

    trimmed
        .parse::<i64>()
        .map_err(|_| CoercionError::NotInt(value.to_string()))
}

/// Best-effort float conversion: the original string on failure.
pub fn to_float(value: &str) -> Value {
    parse_float(value)
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}

/// Best-effort integer conversion: the original string on failure.
pub fn to_int(value: &str) -> Value {
    match parse_int(value) {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(value.to_string()),
    }
}

/// Splits on `delimiter` without trimming the individual parts.
pub fn to_list(value: &str, delimiter: &str) -> Vec<String> {
    value.split(delimiter).map(str::to_string).collect()
}
