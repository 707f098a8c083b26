//! Entity trait: identity + continuity across state changes.

use core::fmt::{Debug, Display};
use core::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DomainResult;
use crate::values::{self, Values};

/// A remotely persisted record.
///
/// The id is absent until the backend has stored the record once; a new,
/// unsaved entity is a valid value of the type.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Collection path segment on the REST API (e.g. `bookings`).
    const RESOURCE: &'static str;

    /// Returns the entity identifier, if persisted.
    fn id(&self) -> Option<Self::Id>;

    /// Replace the identifier.
    fn set_id(&mut self, id: Self::Id);

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }

    /// Key used to detect that a form now targets a different record.
    fn identity(&self) -> Option<String> {
        self.id().map(|id| id.to_string())
    }

    /// Form values mirroring this entity.
    fn to_values(&self) -> DomainResult<Values> {
        values::to_values(self)
    }

    /// Local merge: overlay `patch` on this entity's fields, yielding a new
    /// entity. Unknown keys are ignored; mistyped ones are an error.
    fn fill(&self, patch: &Values) -> DomainResult<Self> {
        let mut merged = self.to_values()?;
        values::merge(&mut merged, patch);
        values::from_values(merged)
    }
}
