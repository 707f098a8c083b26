//! Options for select controls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Image shown next to an option (e.g. a user avatar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionImage {
    pub avatar: bool,
    pub src: String,
}

/// One entry of a select control.
///
/// `key` must be unique within a list; `value` is what `handle_change`
/// receives when the entry is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub key: String,
    pub text: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<OptionImage>,
}

impl SelectOption {
    pub fn new(key: impl ToString, text: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.to_string(),
            text: text.into(),
            value: value.into(),
            image: None,
        }
    }

    pub fn with_avatar(mut self, src: impl Into<String>) -> Self {
        self.image = Some(OptionImage {
            avatar: true,
            src: src.into(),
        });
        self
    }
}

/// Find the option whose value equals `value`.
pub fn selected<'a>(options: &'a [SelectOption], value: &Value) -> Option<&'a SelectOption> {
    if value.is_null() {
        return None;
    }
    options.iter().find(|o| &o.value == value)
}
