//! Deep overlay of JSON values.

use serde_json::{Map, Value};

/// Overlay `layer` onto `target` in place.
///
/// Objects merge key by key, recursing into nested objects; a non-object
/// target becomes `{}` first. Arrays and scalars replace the target.
pub(super) fn overlay(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(entries) => overlay_object(target, entries),
        other => *target = other,
    }
}

fn overlay_object(target: &mut Value, entries: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Some(existing) = target.as_object_mut() else {
        return;
    };
    for (key, value) in entries {
        match existing.get_mut(&key) {
            Some(slot) => overlay(slot, value),
            None => {
                existing.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!({"a": 1, "b": {"x": 1}}), json!({"b": {"y": 2}}), json!({"a": 1, "b": {"x": 1, "y": 2}}))]
    #[case(json!({"b": {"x": 1}}), json!({"b": [1, 2]}), json!({"b": [1, 2]}))]
    #[case(json!(null), json!({"a": 1}), json!({"a": 1}))]
    #[case(json!({"a": 1}), json!(5), json!(5))]
    fn overlays_values(#[case] mut target: Value, #[case] layer: Value, #[case] expected: Value) {
        overlay(&mut target, layer);
        assert_eq!(target, expected);
    }
}
