//! `assetdesk-core`: shared building blocks.
//!
//! Pure data primitives (no IO): entity identity, typed ids, the error map
//! forms display, the loosely-typed value record forms edit, and liveness
//! tokens for guarding asynchronous completions.

pub mod entity;
pub mod error;
pub mod field_errors;
pub mod id;
pub mod liveness;
pub mod values;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use field_errors::{FORM_ERRORS_KEY, FieldErrors};
pub use id::{AssetId, BookingId, RequestId, UserId};
pub use liveness::{Liveness, LivenessToken};
pub use values::Values;
