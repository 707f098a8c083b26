//! Loosely-typed form values.
//!
//! Forms edit entities field by field, so their working copy is a JSON object
//! keyed by field name. Typed entities are converted in and out at the edges.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};

/// Field name → value snapshot of an entity being edited.
pub type Values = Map<String, Value>;

/// Serialize a typed record into form values.
pub fn to_values<T: Serialize>(record: &T) -> DomainResult<Values> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(DomainError::serialization(format!(
            "expected an object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Deserialize form values into a typed record.
pub fn from_values<T: DeserializeOwned>(values: Values) -> DomainResult<T> {
    Ok(serde_json::from_value(Value::Object(values))?)
}

/// Shallow merge: every key of `patch` overwrites the same key in `base`.
pub fn merge(base: &mut Values, patch: &Values) {
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
}

/// Whether a value counts as "set" the way a form control would see it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Slot {
        id: Option<u64>,
        label: String,
    }

    #[test]
    fn round_trips_a_record() {
        let slot = Slot { id: None, label: "desk".into() };
        let values = to_values(&slot).unwrap();
        assert_eq!(values.get("id"), Some(&Value::Null));
        let back: Slot = from_values(values).unwrap();
        assert_eq!(back, slot);
    }

    #[test]
    fn rejects_non_object_records() {
        let err = to_values(&3_u8).unwrap_err();
        assert!(matches!(err, DomainError::Serialization(_)));
    }

    #[test]
    fn merge_overwrites_only_patched_keys() {
        let mut base = json!({"a": 1, "b": 2}).as_object().cloned().unwrap();
        let patch = json!({"b": 3, "c": 4}).as_object().cloned().unwrap();
        merge(&mut base, &patch);
        assert_eq!(Value::Object(base), json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn truthiness_follows_form_controls() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("loading")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: keys absent from the patch keep their value.
        #[test]
        fn merge_never_touches_unpatched_keys(
            base in prop::collection::btree_map("[a-e]", 0i64..100, 0..5),
            patch in prop::collection::btree_map("[c-h]", 0i64..100, 0..5)
        ) {
            let mut merged: Values = base.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
            let patch_values: Values = patch.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
            merge(&mut merged, &patch_values);

            for (k, v) in &base {
                if !patch.contains_key(k) {
                    prop_assert_eq!(merged.get(k), Some(&json!(v)));
                }
            }
            for (k, v) in &patch {
                prop_assert_eq!(merged.get(k), Some(&json!(v)));
            }
        }
    }
}
