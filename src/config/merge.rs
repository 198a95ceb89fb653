//! Deep merge of configuration documents
//!
//! Objects merge key by key, the override wins at every leaf, `null`
//! overrides leave the base value in place and arrays are replaced whole.

use serde_json::{Map, Value};
use tracing::debug;

/// Merge `overlay` on top of `base`, returning a new document
///
/// Neither input is modified.
#[must_use]
pub fn merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (_, Value::Null) => base.clone(),
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_maps(base_map, overlay_map))
        }
        (_, replacement) => {
            if base.is_object() || replacement.is_object() {
                debug!("Override replaces a value of a different shape");
            }
            replacement.clone()
        }
    }
}

/// Fold several override layers onto `base`, left to right
#[must_use]
pub fn merge_all<'a, I>(base: &Value, layers: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    layers
        .into_iter()
        .fold(base.clone(), |acc, layer| merge(&acc, layer))
}

fn merge_maps(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut result = base.clone();

    for (key, value) in overlay {
        match (result.get(key), value) {
            (_, Value::Null) => {}
            (Some(existing), _) => {
                let merged = merge(existing, value);
                result.insert(key.clone(), merged);
            }
            (None, _) => {
                result.insert(key.clone(), value.clone());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_override_key_is_not_added() {
        let merged = merge(&json!({"a": 1}), &json!({"b": null}));
        assert_eq!(merged, json!({"a": 1}));
    }

    #[test]
    fn merge_all_applies_layers_in_order() {
        let merged = merge_all(
            &json!({"a": 1, "b": 1}),
            [&json!({"a": 2}), &json!({"a": 3, "c": 3})],
        );
        assert_eq!(merged, json!({"a": 3, "b": 1, "c": 3}));
    }
}
