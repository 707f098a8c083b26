//! A form editing one booking-like record: asset, user and time range.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use assetdesk_client::{ClientConfig, ModelService, RemoteModel};
use assetdesk_core::values::is_truthy;
use assetdesk_core::{Entity, FORM_ERRORS_KEY, Values};
use assetdesk_forms::options::selected;
use assetdesk_forms::{
    FormConfig, FormController, FormState, FormStatus, SelectOption, SubmitAction, SubmitContext,
    SubmitEvent, SubmitFuture,
};
use assetdesk_resources::{Asset, User};

use crate::layout::{FieldSpec, FormLayout, Input};
use crate::options::{asset_options, user_options};
use crate::view::{
    Control, FieldGroup, FieldView, FormView, Header, InlineError, Link, Message, Pointing,
};

/// Called with the backend's copy of the record after a successful save.
///
/// Runs before the form can switch records, so it must not call back into
/// the form.
pub type OnSave<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Inputs from the owning view.
pub struct FormProps<S: ModelService> {
    /// The record to edit, or a blank one to create.
    pub entity: RemoteModel<S>,
    pub users: Vec<User>,
    pub assets: Vec<Asset>,
    /// External loading flag (e.g. option lists still fetching).
    pub is_loading: bool,
    pub on_save: Option<OnSave<S::Model>>,
}

impl<S: ModelService> FormProps<S> {
    pub fn new(entity: RemoteModel<S>) -> Self {
        Self {
            entity,
            users: Vec::new(),
            assets: Vec::new(),
            is_loading: false,
            on_save: None,
        }
    }

    pub fn blank(service: Arc<S>) -> Self
    where
        S::Model: Default,
    {
        Self::new(RemoteModel::blank(service))
    }

    pub fn users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        self
    }

    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    pub fn on_save(mut self, on_save: impl Fn(&S::Model) + Send + Sync + 'static) -> Self {
        self.on_save = Some(Arc::new(on_save));
        self
    }
}

type Slot<S> = Arc<Mutex<RemoteModel<S>>>;

fn lock<S: ModelService>(slot: &Slot<S>) -> MutexGuard<'_, RemoteModel<S>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fill the record from the form values and save it.
struct SaveEntity<S: ModelService> {
    remote: Slot<S>,
    on_save: Option<OnSave<S::Model>>,
    form: &'static str,
}

#[async_trait::async_trait]
impl<S: ModelService> SubmitAction for SaveEntity<S> {
    async fn submit(&self, ctx: SubmitContext) {
        ctx.set_status(FormStatus::Loading);

        let mut draft = lock(&self.remote).clone();
        let filled = draft.fill(ctx.values()).map(|_| ());
        let result = match filled {
            Ok(()) => draft.save().await,
            Err(err) => Err(err),
        };

        match result {
            Ok(saved) => {
                let values = saved.to_values();
                {
                    // Liveness only changes while the slot is held.
                    let mut slot = lock(&self.remote);
                    if !ctx.is_live() {
                        tracing::debug!(form = self.form, "save finished after the form moved on");
                        return;
                    }
                    *slot = draft;
                    ctx.set_status(FormStatus::Success);
                    match values {
                        Ok(values) => {
                            ctx.set_values(values);
                        }
                        Err(err) => {
                            tracing::error!(form = self.form, error = %err, "saved record has no form values");
                        }
                    }
                    tracing::info!(form = self.form, id = ?saved.id(), "record saved");
                    if let Some(on_save) = &self.on_save {
                        on_save(&saved);
                    }
                }
            }
            Err(err) => {
                tracing::info!(form = self.form, error = %err, "save failed");
                ctx.set_status(FormStatus::Error);
                ctx.set_form_errors(err.field_errors());
            }
        }
    }
}

fn values_of<E: Entity>(entity: &E) -> Values {
    entity.to_values().unwrap_or_else(|err| {
        tracing::error!(resource = E::RESOURCE, error = %err, "record has no form values");
        Values::new()
    })
}

/// Headless view-model of an entity form.
///
/// Mount it with the initial props, feed later props through
/// [`update`](Self::update), bind inputs to [`change`](Self::change) and the
/// form to [`submit`](Self::submit), and render [`view`](Self::view).
/// `on_save` is fixed at mount.
///
/// Dropping the form disposes it; a save still in flight then changes
/// nothing.
pub struct EntityForm<S: ModelService, L: FormLayout> {
    controller: FormController,
    remote: Slot<S>,
    users: Vec<SelectOption>,
    assets: Vec<SelectOption>,
    is_loading: bool,
    _layout: PhantomData<L>,
}

impl<S, L> EntityForm<S, L>
where
    L: FormLayout,
    S: ModelService<Model = L::Model>,
{
    pub fn mount(props: FormProps<S>) -> Self {
        Self::mount_with(props, FormConfig::named(L::NAME))
    }

    /// Mount with the submit timeout from the client configuration.
    pub fn mount_with_client(props: FormProps<S>, client: &ClientConfig) -> Self {
        Self::mount_with(
            props,
            FormConfig::named(L::NAME).with_submit_timeout(client.submit_timeout),
        )
    }

    pub fn mount_with(props: FormProps<S>, config: FormConfig) -> Self {
        let FormProps {
            entity,
            users,
            assets,
            is_loading,
            on_save,
        } = props;

        let identity = entity.identity();
        let values = values_of(entity.entity());
        let remote = Arc::new(Mutex::new(entity));
        let action = SaveEntity {
            remote: Arc::clone(&remote),
            on_save,
            form: L::NAME,
        };

        let controller = FormController::with_config(values, action, config).with_identity(identity);
        controller.set_status(is_loading);
        tracing::debug!(form = L::NAME, entity = ?controller.identity(), "form mounted");

        Self {
            controller,
            remote,
            users: user_options(&users),
            assets: asset_options(&assets),
            is_loading,
            _layout: PhantomData,
        }
    }

    /// Apply new props. A different record resets values and errors; a
    /// changed loading flag is forwarded to the status.
    pub fn update(&mut self, props: FormProps<S>) {
        let FormProps {
            entity,
            users,
            assets,
            is_loading,
            ..
        } = props;

        self.users = user_options(&users);
        self.assets = asset_options(&assets);

        let identity = entity.identity();
        if identity.as_deref() != self.controller.identity() {
            let values = values_of(entity.entity());
            let mut slot = lock(&self.remote);
            self.controller.retarget(identity, values);
            *slot = entity;
        }

        if is_loading != self.is_loading {
            self.is_loading = is_loading;
            self.controller.set_status(is_loading);
        }
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn state(&self) -> FormState {
        self.controller.state()
    }

    /// The record as last loaded or saved.
    pub fn entity(&self) -> S::Model {
        lock(&self.remote).entity().clone()
    }

    pub fn change(&self, field: &str, value: impl Into<Value>) {
        self.controller.handle_change(field, value);
    }

    pub fn submit(&self) -> SubmitFuture {
        self.controller.handle_submit(&mut SubmitEvent::new())
    }

    pub fn spawn_submit(&self) -> tokio::task::JoinHandle<()> {
        self.controller.spawn_submit(&mut SubmitEvent::new())
    }

    /// The submit button is disabled while a save is loading.
    pub fn submit_disabled(&self) -> bool {
        self.controller.status().is_loading()
    }

    pub fn unmount(self) {
        tracing::debug!(form = L::NAME, entity = ?self.controller.identity(), "form unmounted");
    }

    pub fn view(&self) -> FormView {
        let state = self.controller.state();

        let groups = L::groups()
            .iter()
            .map(|group| FieldGroup {
                equal_widths: group.equal_widths,
                fields: group
                    .fields
                    .iter()
                    .map(|spec| self.field_view(spec, &state))
                    .collect(),
            })
            .collect();

        FormView {
            header: self.header(&state.values),
            decoration: state.status.into(),
            groups,
            form_errors: state
                .errors
                .get(FORM_ERRORS_KEY)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            success_message: Message {
                header: "Success!".to_string(),
                content: format!("The {} has been saved", L::NOUN),
            },
            submit_label: "Save!".to_string(),
            submit_disabled: state.status.is_loading(),
        }
    }

    fn field_view(&self, spec: &FieldSpec, state: &FormState) -> FieldView {
        let control = match spec.input {
            Input::UserSelect => Control::Select {
                options: self.users.clone(),
                search: true,
            },
            Input::AssetSelect => Control::Select {
                options: self.assets.clone(),
                search: true,
            },
            Input::DateTimeLocal => Control::DateTimeLocal,
        };

        FieldView {
            id: spec.name.to_string(),
            name: spec.name.to_string(),
            label: spec.label.to_string(),
            placeholder: spec.placeholder.to_string(),
            control,
            value: state.values.get(spec.name).cloned().unwrap_or(Value::Null),
            required: spec.required,
            read_only: spec.read_only,
            error: state.errors.first(spec.name).map(|message| InlineError {
                content: message.to_string(),
                pointing: Pointing::Below,
            }),
        }
    }

    fn header(&self, values: &Values) -> Header {
        if !values.get("id").is_some_and(is_truthy) {
            return Header::New {
                title: format!("New {}", L::NOUN),
            };
        }

        Header::Existing {
            user: related(values, "user", "user_id", &self.users, "users"),
            relation: L::RELATION.to_string(),
            asset: related(values, "asset", "asset_id", &self.assets, "assets"),
        }
    }
}

impl<S: ModelService, L: FormLayout> Drop for EntityForm<S, L> {
    fn drop(&mut self) {
        let _slot = lock(&self.remote);
        self.controller.dispose();
    }
}

/// Link to a related record, named from the embedded relation when the API
/// sent one, else from the option list.
fn related(values: &Values, embedded: &str, key: &str, options: &[SelectOption], path: &str) -> Link {
    let nested = values.get(embedded).filter(|v| v.is_object());
    let id = nested
        .and_then(|n| n.get("id"))
        .or_else(|| values.get(key))
        .filter(|v| !v.is_null());

    let text = nested
        .and_then(|n| n.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| id.and_then(|id| selected(options, id)).map(|o| o.text.clone()))
        .unwrap_or_else(|| "Unknown".to_string());

    let to = match id {
        Some(Value::String(s)) => format!("/{path}/{s}"),
        Some(other) => format!("/{path}/{other}"),
        None => format!("/{path}"),
    };

    Link { to, text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BookingLayout, RequestLayout};
    use assetdesk_client::InMemoryService;
    use assetdesk_core::{AssetId, BookingId, FieldErrors, RequestId, UserId};
    use assetdesk_resources::{Booking, Request};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Bookings = InMemoryService<Booking>;

    fn users() -> Vec<User> {
        vec![
            User::new(UserId::new(9), "Ada").with_avatar("https://cdn.test/ada.png"),
            User::new(UserId::new(5), "Grace"),
        ]
    }

    fn assets() -> Vec<Asset> {
        vec![Asset::new(AssetId::new(3), "Projector")]
    }

    fn mount_booking(booking: Booking) -> EntityForm<Bookings, BookingLayout> {
        let service = Bookings::new().arc();
        EntityForm::mount(
            FormProps::new(RemoteModel::new(service, booking))
                .users(users())
                .assets(assets()),
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn switching_records_mid_save_keeps_record_and_values_together() {
        let service = Bookings::with_records([Booking {
            id: Some(BookingId::new(50)),
            ..Booking::default()
        }])
        .arc();
        let other = Booking {
            id: Some(BookingId::new(50)),
            ..Booking::default()
        };

        for _ in 0..200 {
            let saves = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&saves);
            let mut form: EntityForm<_, BookingLayout> = EntityForm::mount(
                FormProps::blank(Arc::clone(&service)).on_save(move |_: &Booking| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            );
            form.change("asset_id", 3);

            let submission = form.spawn_submit();
            tokio::task::yield_now().await;
            form.update(FormProps::new(RemoteModel::new(Arc::clone(&service), other.clone())));
            let saves_at_switch = saves.load(Ordering::SeqCst);
            submission.await.unwrap();

            assert_eq!(form.entity(), other);
            assert_eq!(form.controller().identity(), Some("50"));
            assert_eq!(form.state().values["id"], json!(50));
            assert_eq!(saves.load(Ordering::SeqCst), saves_at_switch);
        }
    }

    #[tokio::test]
    async fn save_after_drop_does_not_notify() {
        let service = Bookings::new()
            .with_latency(std::time::Duration::from_millis(20))
            .arc();
        let saves = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&saves);
        let form: EntityForm<_, BookingLayout> = EntityForm::mount(
            FormProps::blank(Arc::clone(&service)).on_save(move |_: &Booking| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let submission = form.spawn_submit();
        tokio::task::yield_now().await;
        drop(form);

        submission.await.unwrap();
        assert_eq!(saves.load(Ordering::SeqCst), 0);
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn new_record_gets_a_new_header() {
        let form = mount_booking(Booking::default());
        let view = form.view();
        assert_eq!(
            view.header,
            Header::New {
                title: "New Booking".into()
            }
        );
        assert_eq!(view.submit_label, "Save!");
        assert_eq!(view.success_message.content, "The Booking has been saved");
    }

    #[test]
    fn existing_record_header_links_user_and_asset() {
        let form = mount_booking(Booking {
            id: Some(BookingId::new(1)),
            asset_id: Some(AssetId::new(3)),
            user_id: Some(UserId::new(9)),
            ..Booking::default()
        });

        let Header::Existing { user, relation, asset } = form.view().header else {
            panic!("expected an existing-record header");
        };
        assert_eq!(user, Link { to: "/users/9".into(), text: "Ada".into() });
        assert_eq!(relation, " booking on ");
        assert_eq!(asset, Link { to: "/assets/3".into(), text: "Projector".into() });
    }

    #[test]
    fn embedded_relations_win_over_options() {
        let service = InMemoryService::<Request>::new().arc();
        let form: EntityForm<_, RequestLayout> = EntityForm::mount(FormProps::new(RemoteModel::new(
            service,
            Request {
                id: Some(RequestId::new(4)),
                user_id: Some(UserId::new(12)),
                asset_id: Some(AssetId::new(8)),
                user: Some(User::new(UserId::new(12), "Linus")),
                ..Request::default()
            },
        )));

        let Header::Existing { user, relation, asset } = form.view().header else {
            panic!("expected an existing-record header");
        };
        assert_eq!(user.text, "Linus");
        assert_eq!(relation, " requested ");
        assert_eq!(asset, Link { to: "/assets/8".into(), text: "Unknown".into() });
    }

    #[test]
    fn fields_render_options_values_and_first_error() {
        let form = mount_booking(Booking::default());
        form.change("user_id", 9);
        form.controller().set_form_errors(FieldErrors::from_iter([
            ("from", vec!["must be before to", "is invalid"]),
        ]));

        let view = form.view();
        let user = view.field("user_id").unwrap();
        assert_eq!(user.value, json!(9));
        match &user.control {
            Control::Select { options, search } => {
                assert!(search);
                assert_eq!(options.len(), 2);
                assert!(options[0].image.is_some());
            }
            other => panic!("unexpected control {other:?}"),
        }

        let from = view.field("from").unwrap();
        assert_eq!(from.error.as_ref().unwrap().content, "must be before to");
        assert!(view.field("processed_at").unwrap().read_only);
        assert!(view.field("asset_id").unwrap().error.is_none());
    }

    #[test]
    fn form_level_errors_are_listed_separately() {
        let form = mount_booking(Booking::default());
        form.controller()
            .set_form_errors(FieldErrors::form_level("The server could not be reached."));
        let view = form.view();
        assert_eq!(view.form_errors, vec!["The server could not be reached.".to_string()]);
        assert!(view.groups.iter().flat_map(|g| &g.fields).all(|f| f.error.is_none()));
    }

    #[test]
    fn loading_prop_is_applied_on_mount_and_update() {
        let service = Bookings::new().arc();
        let mut form: EntityForm<_, BookingLayout> =
            EntityForm::mount(FormProps::blank(Arc::clone(&service)).loading(true));
        assert_eq!(form.state().status, FormStatus::Loading);
        assert!(form.submit_disabled());
        assert!(form.view().decoration.loading);

        form.update(FormProps::blank(service).loading(false));
        assert_eq!(form.state().status, FormStatus::Idle);
        assert!(!form.submit_disabled());
    }
}
