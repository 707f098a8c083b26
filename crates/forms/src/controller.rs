//! The form controller: values, status and field errors for one edit
//! session, plus the change and submit entry points a view binds to.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use assetdesk_core::{FieldErrors, Liveness, Values};

use crate::status::FormStatus;
use crate::submit::{FormHandle, SubmitAction, SubmitContext, SubmitEvent, lock};

/// Form-level message recorded when a submission exceeds its timeout.
pub const TIMEOUT_MESSAGE: &str = "The request timed out.";

/// Future returned by [`FormController::handle_submit`].
pub type SubmitFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Snapshot of everything a view renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub values: Values,
    pub status: FormStatus,
    pub errors: FieldErrors,
}

/// Controller settings.
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// Name used in log lines.
    pub name: String,
    /// Abort submissions running longer than this. `None` waits forever.
    pub submit_timeout: Option<Duration>,
}

impl FormConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_submit_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.submit_timeout = timeout;
        self
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            name: "form".to_string(),
            submit_timeout: None,
        }
    }
}

/// Owns the state of one form for as long as the view that created it.
///
/// Dropping the controller disposes it: submissions still in flight keep
/// running, but nothing they report back is applied.
pub struct FormController {
    state: Arc<Mutex<FormState>>,
    liveness: Liveness,
    identity: Option<String>,
    on_submit: Arc<dyn SubmitAction>,
    config: FormConfig,
}

impl FormController {
    /// `values = initial_values`, `status = Idle`, no errors.
    pub fn new(initial_values: Values, on_submit: impl SubmitAction + 'static) -> Self {
        Self::with_config(initial_values, on_submit, FormConfig::default())
    }

    pub fn with_config(
        initial_values: Values,
        on_submit: impl SubmitAction + 'static,
        config: FormConfig,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState {
                values: initial_values,
                ..FormState::default()
            })),
            liveness: Liveness::new(),
            identity: None,
            on_submit: Arc::new(on_submit),
            config,
        }
    }

    /// Record which entity the initial values belong to.
    pub fn with_identity(mut self, identity: Option<String>) -> Self {
        self.identity = identity;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn state(&self) -> FormState {
        lock(&self.state).clone()
    }

    pub fn values(&self) -> Values {
        lock(&self.state).values.clone()
    }

    pub fn value(&self, field: &str) -> Option<Value> {
        lock(&self.state).values.get(field).cloned()
    }

    pub fn status(&self) -> FormStatus {
        lock(&self.state).status
    }

    pub fn errors(&self) -> FieldErrors {
        lock(&self.state).errors.clone()
    }

    /// A mutator handle bound to the current entity.
    pub fn handle(&self) -> FormHandle {
        FormHandle::new(Arc::clone(&self.state), self.liveness.token())
    }

    /// Merge `{field: value}` into the values. Other fields, their errors and
    /// the status stay as they are; the edited field's own errors go away.
    pub fn handle_change(&self, field: &str, value: impl Into<Value>) {
        let mut state = lock(&self.state);
        state.values.insert(field.to_string(), value.into());
        if state.errors.clear_field(field) {
            tracing::trace!(form = %self.config.name, field, "cleared field error on edit");
        }
    }

    /// Prevent the host's default submission, then run the submit action
    /// with the current values and a mutator handle.
    ///
    /// The returned future owns everything it needs; drive it in place or
    /// hand it to an executor. Status changes are left to the action.
    pub fn handle_submit(&self, event: &mut SubmitEvent) -> SubmitFuture {
        event.prevent_default();

        let values = {
            let state = lock(&self.state);
            if state.status.is_loading() {
                tracing::warn!(
                    form = %self.config.name,
                    "submitting while a previous submission is still loading"
                );
            }
            state.values.clone()
        };

        let handle = self.handle();
        let ctx = SubmitContext::new(values, handle.clone());
        let action = Arc::clone(&self.on_submit);
        let timeout = self.config.submit_timeout;
        let span = tracing::info_span!("form_submit", form = %self.config.name, entity = ?self.identity);

        Box::pin(
            async move {
                tracing::debug!("submission started");
                match timeout {
                    None => action.submit(ctx).await,
                    Some(limit) => {
                        if tokio::time::timeout(limit, action.submit(ctx)).await.is_err() {
                            tracing::warn!(?limit, "submission timed out");
                            if handle.set_status(FormStatus::Error) {
                                handle.set_form_errors(FieldErrors::form_level(TIMEOUT_MESSAGE));
                            }
                            return;
                        }
                    }
                }
                tracing::debug!(live = handle.is_live(), "submission finished");
            }
            .instrument(span),
        )
    }

    /// [`handle_submit`](Self::handle_submit) on the tokio runtime.
    pub fn spawn_submit(&self, event: &mut SubmitEvent) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.handle_submit(event))
    }

    /// Replace the values snapshot.
    pub fn set_values(&self, values: Values) {
        lock(&self.state).values = values;
    }

    /// Accepts a [`FormStatus`], a loading flag, a string or a JSON value.
    pub fn set_status(&self, status: impl Into<FormStatus>) {
        lock(&self.state).status = status.into();
    }

    pub fn set_form_errors(&self, errors: FieldErrors) {
        lock(&self.state).errors = errors;
    }

    /// Point the form at another entity without rebuilding it.
    ///
    /// When `identity` differs from the current one the values are replaced,
    /// the errors cleared, and handles issued for the previous entity stop
    /// applying updates. Status is left alone. Returns whether anything
    /// changed.
    pub fn retarget(&mut self, identity: Option<String>, values: Values) -> bool {
        if identity == self.identity {
            return false;
        }

        let mut state = lock(&self.state);
        let epoch = self.liveness.advance();
        state.values = values;
        state.errors = FieldErrors::new();
        tracing::debug!(
            form = %self.config.name,
            from = ?self.identity,
            to = ?identity,
            epoch,
            "form retargeted"
        );
        self.identity = identity;
        true
    }

    /// Stop accepting updates from in-flight submissions.
    pub fn dispose(&self) {
        let _state = lock(&self.state);
        self.liveness.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.liveness.is_disposed()
    }
}

impl core::fmt::Debug for FormController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FormController")
            .field("name", &self.config.name)
            .field("identity", &self.identity)
            .field("state", &self.state())
            .finish()
    }
}
