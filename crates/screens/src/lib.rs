//! `assetdesk-screens`: headless view-models of the booking and request
//! screens.
//!
//! Each form wraps a [`FormController`](assetdesk_forms::FormController)
//! around a [`RemoteModel`](assetdesk_client::RemoteModel) and renders a
//! [`FormView`] a UI layer can draw.

pub mod edit_request;
pub mod entity_form;
pub mod layout;
pub mod options;
pub mod view;

pub use edit_request::EditRequestScreen;
pub use entity_form::{EntityForm, FormProps, OnSave};
pub use layout::{BookingLayout, FormLayout, RequestLayout};
pub use options::{asset_options, user_options};
pub use view::{Control, Decoration, FieldView, FormView, Header, Link};

/// Create or edit a booking.
pub type BookingForm<S> = EntityForm<S, BookingLayout>;

/// Create or edit an asset request.
pub type RequestForm<S> = EntityForm<S, RequestLayout>;
