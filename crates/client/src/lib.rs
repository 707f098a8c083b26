//! `assetdesk-client`
//!
//! **Responsibility:** the client's view of the booking API.
//!
//! This crate provides:
//! - [`ModelService`]: find/list/save over one resource, backed by HTTP or
//!   by memory
//! - [`RemoteModel`]: a local record that can fill itself from form values
//!   and save itself
//! - [`ModelProvider`] / [`ListProvider`]: fetch state with loading flags
//!
//! The API remains the authority; everything here is a local copy.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod provider;
pub mod remote;
pub mod service;

pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpModelService;
pub use memory::InMemoryService;
pub use provider::{ListProvider, ListState, LoadFuture, ModelProvider, ModelState};
pub use remote::RemoteModel;
pub use service::ModelService;
