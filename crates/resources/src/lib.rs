//! Booking resources as the backend exposes them.
//!
//! Plain records with serde mappings; the backend stays the authority, these
//! are local and possibly stale copies.

pub mod asset;
pub mod booking;
pub mod datetime;
pub mod request;
pub mod user;

pub use asset::Asset;
pub use booking::Booking;
pub use request::Request;
pub use user::User;
