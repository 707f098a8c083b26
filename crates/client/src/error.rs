use assetdesk_core::{DomainError, FieldErrors};

/// Failure of a call to the backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("not found")]
    NotFound,
    /// The backend rejected the payload (HTTP 422) with per-field messages.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ClientError {
    /// The error map a form should display for this failure.
    ///
    /// Validation failures carry their own map; anything else becomes a
    /// single form-level message so the view always has something to show.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ClientError::Validation(errors) => errors.clone(),
            other => FieldErrors::form_level(other.to_string()),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}
