//! Client-side handle on one record plus the service that persists it.

use std::sync::Arc;

use assetdesk_core::{Entity, Values};

use crate::error::ClientError;
use crate::service::ModelService;

/// A local (possibly stale) copy of a record that knows how to save itself.
pub struct RemoteModel<S: ModelService> {
    entity: S::Model,
    service: Arc<S>,
}

impl<S: ModelService> RemoteModel<S> {
    pub fn new(service: Arc<S>, entity: S::Model) -> Self {
        Self { entity, service }
    }

    /// Placeholder for a record that does not exist yet.
    pub fn blank(service: Arc<S>) -> Self
    where
        S::Model: Default,
    {
        Self::new(service, S::Model::default())
    }

    pub fn entity(&self) -> &S::Model {
        &self.entity
    }

    pub fn into_entity(self) -> S::Model {
        self.entity
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub fn id(&self) -> Option<<S::Model as Entity>::Id> {
        self.entity.id()
    }

    pub fn identity(&self) -> Option<String> {
        self.entity.identity()
    }

    /// Local merge of form values; no network.
    pub fn fill(&mut self, values: &Values) -> Result<&mut Self, ClientError> {
        self.entity = self.entity.fill(values)?;
        Ok(self)
    }

    /// Persist, then adopt the backend's canonical copy.
    pub async fn save(&mut self) -> Result<S::Model, ClientError> {
        let saved = self.service.save(&self.entity).await?;
        self.entity = saved.clone();
        Ok(saved)
    }
}

impl<S: ModelService> Clone for RemoteModel<S> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: ModelService> core::fmt::Debug for RemoteModel<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RemoteModel")
            .field("resource", &<S::Model as Entity>::RESOURCE)
            .field("entity", &self.entity)
            .finish()
    }
}
