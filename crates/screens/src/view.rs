//! Render-ready description of a form.
//!
//! Nothing here draws anything; a view layer maps these records onto its
//! own widgets.

use serde::Serialize;
use serde_json::Value;

use assetdesk_forms::{FormStatus, SelectOption};

/// Which control renders a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    Select { options: Vec<SelectOption>, search: bool },
    DateTimeLocal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pointing {
    Below,
}

/// Message rendered next to an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineError {
    pub content: String,
    pub pointing: Pointing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub id: String,
    pub name: String,
    pub label: String,
    pub placeholder: String,
    #[serde(flatten)]
    pub control: Control,
    pub value: Value,
    pub required: bool,
    pub read_only: bool,
    pub error: Option<InlineError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldGroup {
    pub equal_widths: bool,
    pub fields: Vec<FieldView>,
}

/// Form-level flags driving the loading overlay and the success/error
/// styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Decoration {
    pub loading: bool,
    pub success: bool,
    pub error: bool,
}

impl From<FormStatus> for Decoration {
    fn from(status: FormStatus) -> Self {
        Self {
            loading: status == FormStatus::Loading,
            success: status == FormStatus::Success,
            error: status == FormStatus::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub to: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Header {
    /// Unsaved record.
    New { title: String },
    /// `<user> booking on <asset>`.
    Existing { user: Link, relation: String, asset: Link },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub header: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub header: Header,
    pub decoration: Decoration,
    pub groups: Vec<FieldGroup>,
    /// Errors that belong to no single field (e.g. the API was unreachable).
    pub form_errors: Vec<String>,
    /// Shown while `decoration.success` is set.
    pub success_message: Message,
    pub submit_label: String,
    pub submit_disabled: bool,
}

impl FormView {
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.groups
            .iter()
            .flat_map(|g| g.fields.iter())
            .find(|f| f.name == name)
    }
}
