//! Submission lifecycle phase.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use assetdesk_core::values::is_truthy;

/// Where a form is in its submit cycle. Exactly one at a time.
///
/// `Idle -> Loading -> Success | Error`, and back to `Loading` on the next
/// submit. There is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Idle => "idle",
            FormStatus::Loading => "loading",
            FormStatus::Success => "success",
            FormStatus::Error => "error",
        }
    }

    pub fn is_loading(&self) -> bool {
        *self == FormStatus::Loading
    }

    /// Strict lookup of a named status.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "idle" => Some(FormStatus::Idle),
            "loading" => Some(FormStatus::Loading),
            "success" => Some(FormStatus::Success),
            "error" => Some(FormStatus::Error),
            _ => None,
        }
    }
}

impl core::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external loading flag: `true` is `Loading`, `false` is `Idle`.
impl From<bool> for FormStatus {
    fn from(loading: bool) -> Self {
        if loading {
            FormStatus::Loading
        } else {
            FormStatus::Idle
        }
    }
}

/// Named statuses map to themselves; any other non-empty string is a truthy
/// flag and reads as `Loading`; the empty string is `Idle`.
impl From<&str> for FormStatus {
    fn from(raw: &str) -> Self {
        FormStatus::from_name(raw).unwrap_or_else(|| FormStatus::from(!raw.is_empty()))
    }
}

impl From<&Value> for FormStatus {
    fn from(raw: &Value) -> Self {
        match raw {
            Value::String(s) => FormStatus::from(s.as_str()),
            other => FormStatus::from(is_truthy(other)),
        }
    }
}
