//! Structural checks of parsed JSON against a declared kind.

use serde_json::Value;

use crate::schema::{Constraint, FieldKind};

/// Check that `value` has the shape `kind` declares.
///
/// Element and entry values of collections are checked recursively. Refined
/// scalars only need the right primitive shape here; their rules apply when
/// the value arrives as a raw string.
pub(crate) fn conforms(value: &Value, kind: &FieldKind) -> Result<(), String> {
    match kind {
        FieldKind::Json => Ok(()),
        FieldKind::Optional(_) if value.is_null() => Ok(()),
        FieldKind::Optional(inner) => conforms(value, inner),
        FieldKind::List(inner) => {
            let Value::Array(items) = value else {
                return Err(mismatch("array", value));
            };
            items.iter().enumerate().try_for_each(|(idx, item)| {
                conforms(item, inner).map_err(|reason| format!("element {idx}: {reason}"))
            })
        }
        FieldKind::Map(inner) => {
            let Value::Object(entries) = value else {
                return Err(mismatch("object", value));
            };
            entries.iter().try_for_each(|(key, item)| {
                conforms(item, inner).map_err(|reason| format!("key {key:?}: {reason}"))
            })
        }
        FieldKind::Nested(_) => expect(value.is_object(), "object", value),
        FieldKind::Str => expect(value.is_string(), "string", value),
        FieldKind::Bool => expect(value.is_boolean(), "boolean", value),
        FieldKind::Int => expect(is_integer(value), "integer", value),
        FieldKind::Float => expect(value.is_number(), "number", value),
        FieldKind::Constrained(constraint) => match constraint {
            Constraint::PositiveInt
            | Constraint::NegativeInt
            | Constraint::NonNegativeInt
            | Constraint::NonPositiveInt => expect(is_integer(value), "integer", value),
            Constraint::PositiveFloat
            | Constraint::NegativeFloat
            | Constraint::NonNegativeFloat
            | Constraint::NonPositiveFloat => expect(value.is_number(), "number", value),
            _ => expect(value.is_string(), "string", value),
        },
    }
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

fn expect(ok: bool, wanted: &str, value: &Value) -> Result<(), String> {
    if ok { Ok(()) } else { Err(mismatch(wanted, value)) }
}

fn mismatch(wanted: &str, value: &Value) -> String {
    format!("expected a JSON {wanted}, found {}", describe(value))
}

const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
