//! `assetdesk-forms`: headless form state.
//!
//! [`FormController`] tracks the values of one edit session, the submission
//! [`FormStatus`] and the field error map. Views feed it input events and
//! render from [`FormState`] snapshots; a caller-supplied [`SubmitAction`]
//! does the persisting.

pub mod controller;
pub mod options;
pub mod status;
pub mod submit;

pub use controller::{FormConfig, FormController, FormState, SubmitFuture, TIMEOUT_MESSAGE};
pub use options::{OptionImage, SelectOption};
pub use status::FormStatus;
pub use submit::{FormHandle, SubmitAction, SubmitContext, SubmitEvent, SubmitFn, submit_fn};
