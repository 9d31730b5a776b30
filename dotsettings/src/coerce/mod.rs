//! Conversion of raw strings into values of a field's declared type.
//!
//! Scalars are parsed directly; collections, nested schemas and free-form
//! JSON fields are parsed as JSON and checked against the declared shape.
//! The output is a [`serde_json::Value`] ready for the structural decoder.

mod constraints;
mod shape;

use std::fmt;

use serde_json::{Number, Value};

use crate::schema::FieldKind;

pub(crate) use shape::conforms;

const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];
const FALSY: [&str; 4] = ["false", "0", "no", "off"];

/// Why a raw value could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionError {
    /// Type tag of the declared type.
    pub expected: String,
    /// Description of the failure.
    pub reason: String,
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}: {}", self.expected, self.reason)
    }
}

impl std::error::Error for CoercionError {}

/// Convert `raw` into a value compatible with `kind`.
///
/// Empty strings are coerced like any other value; absence is handled by the
/// caller before coercion is attempted.
///
/// # Errors
///
/// Returns a [`CoercionError`] when `raw` is not a valid representation of
/// `kind`.
///
/// # Examples
///
/// ```
/// use dotsettings::{FieldKind, coerce};
/// use serde_json::json;
///
/// assert_eq!(coerce("YES", &FieldKind::Bool).ok(), Some(json!(true)));
/// assert_eq!(coerce(" 42 ", &FieldKind::Int).ok(), Some(json!(42)));
/// assert_eq!(
///     coerce(r#"["auth","api"]"#, &FieldKind::list(FieldKind::Str)).ok(),
///     Some(json!(["auth", "api"]))
/// );
/// assert!(coerce("maybe", &FieldKind::Bool).is_err());
/// ```
pub fn coerce(raw: &str, kind: &FieldKind) -> Result<Value, CoercionError> {
    let fail = |reason: String| CoercionError {
        expected: kind.type_tag(),
        reason,
    };
    match kind {
        FieldKind::Str => Ok(Value::String(raw.to_owned())),
        FieldKind::Bool => parse_bool(raw).map(Value::Bool).map_err(fail),
        FieldKind::Int => parse_int(raw).map(Value::from).map_err(fail),
        FieldKind::Float => parse_float(raw).and_then(float_value).map_err(fail),
        FieldKind::List(_) | FieldKind::Map(_) | FieldKind::Json | FieldKind::Nested(_) => {
            parse_json(raw, kind).map_err(fail)
        }
        FieldKind::Optional(inner) => coerce(raw, inner),
        FieldKind::Constrained(constraint) => constraints::apply(*constraint, raw).map_err(fail),
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    let trimmed = raw.trim();
    if TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(trimmed)) {
        Ok(true)
    } else if FALSY.iter().any(|f| f.eq_ignore_ascii_case(trimmed)) {
        Ok(false)
    } else {
        Err(String::from(
            "not a boolean; use one of true/1/yes/on or false/0/no/off",
        ))
    }
}

pub(crate) fn parse_int(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| format!("not an integer: {e}"))
}

pub(crate) fn parse_float(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| format!("not a number: {e}"))
}

pub(crate) fn float_value(value: f64) -> Result<Value, String> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| String::from("non-finite numbers are not representable"))
}

fn parse_json(raw: &str, kind: &FieldKind) -> Result<Value, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    conforms(&value, kind)?;
    Ok(value)
}

#[cfg(test)]
mod tests;
