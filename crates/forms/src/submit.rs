//! What a submit action gets to work with.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use assetdesk_core::{FieldErrors, LivenessToken, Values};

use crate::controller::FormState;
use crate::status::FormStatus;

/// The submit event raised by the view.
///
/// The controller always marks it handled so the host does not run its
/// native submission on top of ours.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Mutator handle over a form's state, guarded by a liveness token.
///
/// Once the form is disposed (or retargeted to another entity) every call
/// becomes a silent no-op and returns `false`.
#[derive(Debug, Clone)]
pub struct FormHandle {
    state: Arc<Mutex<FormState>>,
    token: LivenessToken,
}

impl FormHandle {
    pub(crate) fn new(state: Arc<Mutex<FormState>>, token: LivenessToken) -> Self {
        Self { state, token }
    }

    pub fn is_live(&self) -> bool {
        self.token.is_live()
    }

    /// Replace the values snapshot.
    pub fn set_values(&self, values: Values) -> bool {
        self.apply("set_values", |state| state.values = values)
    }

    pub fn set_status(&self, status: impl Into<FormStatus>) -> bool {
        let status = status.into();
        self.apply("set_status", |state| state.status = status)
    }

    /// Replace the error map.
    pub fn set_form_errors(&self, errors: FieldErrors) -> bool {
        self.apply("set_form_errors", |state| state.errors = errors)
    }

    fn apply(&self, op: &'static str, f: impl FnOnce(&mut FormState)) -> bool {
        let mut state = lock(&self.state);
        // Checked under the lock: dispose/retarget take it too.
        if !self.token.is_live() {
            tracing::debug!(op, epoch = self.token.epoch(), "dropping late form update");
            return false;
        }
        f(&mut state);
        true
    }
}

/// Arguments handed to a [`SubmitAction`]: the values at submit time plus
/// the mutators.
#[derive(Debug, Clone)]
pub struct SubmitContext {
    values: Values,
    handle: FormHandle,
}

impl SubmitContext {
    pub(crate) fn new(values: Values, handle: FormHandle) -> Self {
        Self { values, handle }
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn handle(&self) -> &FormHandle {
        &self.handle
    }

    pub fn is_live(&self) -> bool {
        self.handle.is_live()
    }

    pub fn set_values(&self, values: Values) -> bool {
        self.handle.set_values(values)
    }

    pub fn set_status(&self, status: impl Into<FormStatus>) -> bool {
        self.handle.set_status(status)
    }

    pub fn set_form_errors(&self, errors: FieldErrors) -> bool {
        self.handle.set_form_errors(errors)
    }
}

/// Caller-supplied persistence step.
///
/// The controller never changes `status` on its own; the action drives the
/// lifecycle (typically `Loading`, then `Success` or `Error`).
#[async_trait::async_trait]
pub trait SubmitAction: Send + Sync {
    async fn submit(&self, ctx: SubmitContext);
}

/// Adapter turning an async closure into a [`SubmitAction`].
pub struct SubmitFn<F>(F);

/// Wrap `f` as a submit action.
pub fn submit_fn<F, Fut>(f: F) -> SubmitFn<F>
where
    F: Fn(SubmitContext) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    SubmitFn(f)
}

#[async_trait::async_trait]
impl<F, Fut> SubmitAction for SubmitFn<F>
where
    F: Fn(SubmitContext) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn submit(&self, ctx: SubmitContext) {
        (self.0)(ctx).await
    }
}

pub(crate) fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
