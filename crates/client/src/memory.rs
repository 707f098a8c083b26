//! In-process model service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use assetdesk_core::{Entity, FieldErrors};

use crate::error::ClientError;
use crate::service::ModelService;

/// Checks a record before it is stored; a non-empty map rejects the save.
pub type Validator<E> = Arc<dyn Fn(&E) -> FieldErrors + Send + Sync>;

/// In-memory stand-in for the REST API.
///
/// Intended for tests/dev. Ids are handed out sequentially, starting after
/// the largest seeded id.
pub struct InMemoryService<E: Entity> {
    records: RwLock<Vec<E>>,
    next_id: AtomicU64,
    validator: Option<Validator<E>>,
    latency: Option<Duration>,
    injected: Mutex<Option<ClientError>>,
}

impl<E> InMemoryService<E>
where
    E: Entity,
    E::Id: From<u64> + Into<u64>,
{
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seed the store. Records without an id get one.
    pub fn with_records(records: impl IntoIterator<Item = E>) -> Self {
        let mut records: Vec<E> = records.into_iter().collect();
        let mut next = records
            .iter()
            .filter_map(|r| r.id().map(Into::<u64>::into))
            .max()
            .unwrap_or(0)
            + 1;
        for record in records.iter_mut().filter(|r| !r.is_persisted()) {
            record.set_id(E::Id::from(next));
            next += 1;
        }

        Self {
            records: RwLock::new(records),
            next_id: AtomicU64::new(next),
            validator: None,
            latency: None,
            injected: Mutex::new(None),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn with_validator(mut self, validator: impl Fn(&E) -> FieldErrors + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Delay every call, to exercise loading states.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: ClientError) {
        *self.injected.lock().unwrap_or_else(PoisonError::into_inner) = Some(err);
    }

    pub fn records(&self) -> Vec<E> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn before_call(&self) -> Result<(), ClientError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.injected.lock().unwrap_or_else(PoisonError::into_inner).take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<E> Default for InMemoryService<E>
where
    E: Entity,
    E::Id: From<u64> + Into<u64>,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<E> ModelService for InMemoryService<E>
where
    E: Entity,
    E::Id: From<u64> + Into<u64>,
{
    type Model = E;

    async fn find(&self, id: E::Id) -> Result<E, ClientError> {
        self.before_call().await?;
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.id() == Some(id))
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn list(&self) -> Result<Vec<E>, ClientError> {
        self.before_call().await?;
        Ok(self.records())
    }

    async fn save(&self, model: &E) -> Result<E, ClientError> {
        self.before_call().await?;

        if let Some(validator) = &self.validator {
            let errors = validator(model);
            if !errors.is_empty() {
                tracing::debug!(resource = E::RESOURCE, fields = errors.len(), "save rejected");
                return Err(ClientError::Validation(errors));
            }
        }

        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match model.id() {
            Some(id) => {
                let slot = records
                    .iter_mut()
                    .find(|r| r.id() == Some(id))
                    .ok_or(ClientError::NotFound)?;
                *slot = model.clone();
                Ok(model.clone())
            }
            None => {
                let mut created = model.clone();
                created.set_id(E::Id::from(self.next_id.fetch_add(1, Ordering::SeqCst)));
                records.push(created.clone());
                Ok(created)
            }
        }
    }
}
