//! Fetch providers: load remote data into observable local state.
//!
//! Each provider keeps a loading flag next to the data, so views can render
//! a spinner while a request is in flight. Only the most recently started
//! load publishes its result; older ones finish silently.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};

use assetdesk_core::{Entity, Liveness, LivenessToken};

use crate::error::ClientError;
use crate::service::ModelService;

/// Future returned by provider `load` calls.
pub type LoadFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// State of a single-record fetch.
#[derive(Debug, Clone)]
pub struct ModelState<E> {
    pub model: Option<E>,
    pub is_loading: bool,
    pub error: Option<ClientError>,
}

impl<E> Default for ModelState<E> {
    fn default() -> Self {
        Self {
            model: None,
            is_loading: false,
            error: None,
        }
    }
}

/// Loads one record by id.
pub struct ModelProvider<S: ModelService> {
    service: Arc<S>,
    state: Arc<RwLock<ModelState<S::Model>>>,
    liveness: Liveness,
}

impl<S: ModelService> ModelProvider<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            state: Arc::new(RwLock::new(ModelState::default())),
            liveness: Liveness::new(),
        }
    }

    pub fn state(&self) -> ModelState<S::Model> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn model(&self) -> Option<S::Model> {
        self.state().model
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).is_loading
    }

    /// Start fetching `id`. Supersedes any load still in flight.
    pub fn load(&self, id: <S::Model as Entity>::Id) -> LoadFuture {
        self.liveness.advance();
        let token = self.liveness.token();
        self.state.write().unwrap_or_else(PoisonError::into_inner).is_loading = true;

        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);
        let guard = LoadingGuard::new(&state, &token, |state: &mut ModelState<S::Model>| {
            state.is_loading = false;
        });
        Box::pin(async move {
            let _guard = guard;
            tracing::debug!(resource = <S::Model as Entity>::RESOURCE, %id, "loading model");
            let result = service.find(id).await;
            publish(&state, &token, |state| {
                state.is_loading = false;
                match result {
                    Ok(model) => {
                        state.model = Some(model);
                        state.error = None;
                    }
                    Err(err) => {
                        tracing::warn!(
                            resource = <S::Model as Entity>::RESOURCE,
                            %id,
                            error = %err,
                            "model load failed"
                        );
                        state.error = Some(err);
                    }
                }
            });
        })
    }
}

/// State of a collection fetch.
#[derive(Debug, Clone)]
pub struct ListState<E> {
    pub items: Vec<E>,
    pub is_loading: bool,
    pub error: Option<ClientError>,
}

impl<E> Default for ListState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

/// Loads a whole collection.
pub struct ListProvider<S: ModelService> {
    service: Arc<S>,
    state: Arc<RwLock<ListState<S::Model>>>,
    liveness: Liveness,
}

impl<S: ModelService> ListProvider<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            state: Arc::new(RwLock::new(ListState::default())),
            liveness: Liveness::new(),
        }
    }

    pub fn state(&self) -> ListState<S::Model> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// `(items, is_loading)`.
    pub fn snapshot(&self) -> (Vec<S::Model>, bool) {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        (state.items.clone(), state.is_loading)
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).is_loading
    }

    pub fn load(&self) -> LoadFuture {
        self.liveness.advance();
        let token = self.liveness.token();
        self.state.write().unwrap_or_else(PoisonError::into_inner).is_loading = true;

        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);
        let guard = LoadingGuard::new(&state, &token, |state: &mut ListState<S::Model>| {
            state.is_loading = false;
        });
        Box::pin(async move {
            let _guard = guard;
            let result = service.list().await;
            publish(&state, &token, |state| {
                state.is_loading = false;
                match result {
                    Ok(items) => {
                        tracing::debug!(
                            resource = <S::Model as Entity>::RESOURCE,
                            count = items.len(),
                            "list loaded"
                        );
                        state.items = items;
                        state.error = None;
                    }
                    Err(err) => {
                        tracing::warn!(
                            resource = <S::Model as Entity>::RESOURCE,
                            error = %err,
                            "list load failed"
                        );
                        state.error = Some(err);
                    }
                }
            });
        })
    }
}

/// Lives inside a load future. If the future is dropped before it publishes,
/// the loading flag is cleared, unless a newer load has taken over.
struct LoadingGuard<T> {
    state: Arc<RwLock<T>>,
    token: LivenessToken,
    settle: fn(&mut T),
}

impl<T> LoadingGuard<T> {
    fn new(state: &Arc<RwLock<T>>, token: &LivenessToken, settle: fn(&mut T)) -> Self {
        Self {
            state: Arc::clone(state),
            token: token.clone(),
            settle,
        }
    }
}

impl<T> Drop for LoadingGuard<T> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.token.is_live() {
            (self.settle)(&mut state);
        }
    }
}

fn publish<T>(state: &RwLock<T>, token: &LivenessToken, apply: impl FnOnce(&mut T)) {
    let mut state = state.write().unwrap_or_else(PoisonError::into_inner);
    if !token.is_live() {
        tracing::debug!(epoch = token.epoch(), "dropping superseded load");
        return;
    }
    apply(&mut state);
}
