//! Field-level validation messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key under which errors that belong to no single field are stored.
pub const FORM_ERRORS_KEY: &str = "_form";

/// Field name → ordered list of human-readable messages.
///
/// A field without a key has no error. This is the shape a 422 validation
/// payload carries under `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// An error map holding a single form-level message.
    pub fn form_level(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(FORM_ERRORS_KEY, message);
        errors
    }

    /// Append a message to `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// First message for `field`, the one shown inline next to the input.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|m| m.first()).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Drop every message for `field`. Returns whether anything was removed.
    pub fn clear_field(&mut self, field: &str) -> bool {
        self.0.remove(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl From<BTreeMap<String, Vec<String>>> for FieldErrors {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<K, M> FromIterator<(K, Vec<M>)> for FieldErrors
where
    K: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<M>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, msgs)| (k.into(), msgs.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_message_order_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("from", "is required");
        errors.push("from", "must be before to");
        assert_eq!(errors.get("from").unwrap(), ["is required", "must be before to"]);
        assert_eq!(errors.first("from"), Some("is required"));
        assert_eq!(errors.first("to"), None);
    }

    #[test]
    fn deserializes_validation_payload() {
        let errors: FieldErrors =
            serde_json::from_value(serde_json::json!({"asset_id": ["required"]})).unwrap();
        assert!(errors.contains("asset_id"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn clear_field_leaves_others() {
        let mut errors: FieldErrors =
            [("asset_id", vec!["required"]), ("user_id", vec!["required"])].into_iter().collect();
        assert!(errors.clear_field("asset_id"));
        assert!(!errors.clear_field("asset_id"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["user_id"]);
    }

    #[test]
    fn form_level_uses_reserved_key() {
        let errors = FieldErrors::form_level("network unreachable");
        assert_eq!(errors.first(FORM_ERRORS_KEY), Some("network unreachable"));
    }
}
