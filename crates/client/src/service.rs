use assetdesk_core::Entity;

use crate::error::ClientError;

/// Remote collection of one entity type.
#[async_trait::async_trait]
pub trait ModelService: Send + Sync + 'static {
    type Model: Entity;

    /// Fetch one record by id.
    async fn find(&self, id: <Self::Model as Entity>::Id) -> Result<Self::Model, ClientError>;

    /// Fetch the whole collection.
    async fn list(&self) -> Result<Vec<Self::Model>, ClientError>;

    /// Create (no id) or update (id present) a record; resolves with the
    /// backend's canonical representation.
    async fn save(&self, model: &Self::Model) -> Result<Self::Model, ClientError>;
}
