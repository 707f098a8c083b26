//! Screen editing one existing request.

use std::sync::Arc;

use assetdesk_client::{ClientConfig, ClientError, ListProvider, LoadFuture, ModelProvider, ModelService, RemoteModel};
use assetdesk_core::RequestId;
use assetdesk_resources::{Asset, Request, User};

use crate::RequestForm;
use crate::entity_form::FormProps;

/// Loads a request together with the user and asset lists and feeds them to
/// a [`RequestForm`].
///
/// The form shows as loading while either option list is still fetching.
pub struct EditRequestScreen<R, U, A>
where
    R: ModelService<Model = Request>,
    U: ModelService<Model = User>,
    A: ModelService<Model = Asset>,
{
    requests: Arc<R>,
    request: ModelProvider<R>,
    users: ListProvider<U>,
    assets: ListProvider<A>,
    form: RequestForm<R>,
}

impl<R, U, A> EditRequestScreen<R, U, A>
where
    R: ModelService<Model = Request>,
    U: ModelService<Model = User>,
    A: ModelService<Model = Asset>,
{
    pub fn new(
        requests: Arc<R>,
        users: Arc<U>,
        assets: Arc<A>,
        on_save: impl Fn(&Request) + Send + Sync + 'static,
    ) -> Self {
        Self::with_client_config(requests, users, assets, &ClientConfig::default(), on_save)
    }

    /// Like [`new`](Self::new), taking the submit timeout from `client`.
    pub fn with_client_config(
        requests: Arc<R>,
        users: Arc<U>,
        assets: Arc<A>,
        client: &ClientConfig,
        on_save: impl Fn(&Request) + Send + Sync + 'static,
    ) -> Self {
        let form = RequestForm::mount_with_client(
            FormProps::blank(Arc::clone(&requests)).on_save(on_save),
            client,
        );
        Self {
            request: ModelProvider::new(Arc::clone(&requests)),
            users: ListProvider::new(users),
            assets: ListProvider::new(assets),
            requests,
            form,
        }
    }

    /// Fetch the request and both option lists concurrently. Call
    /// [`refresh`](Self::refresh) afterwards (or in between) to push the
    /// results into the form.
    pub fn load(&self, id: RequestId) -> LoadFuture {
        let request = self.request.load(id);
        let users = self.users.load();
        let assets = self.assets.load();
        Box::pin(async move {
            tokio::join!(request, users, assets);
        })
    }

    /// Rebuild the form props from the providers.
    pub fn refresh(&mut self) {
        let (users, users_loading) = self.users.snapshot();
        let (assets, assets_loading) = self.assets.snapshot();
        let entity = match self.request.model() {
            Some(request) => RemoteModel::new(Arc::clone(&self.requests), request),
            None => RemoteModel::blank(Arc::clone(&self.requests)),
        };

        self.form.update(
            FormProps::new(entity)
                .users(users)
                .assets(assets)
                .loading(users_loading || assets_loading),
        );
    }

    pub async fn open(&mut self, id: RequestId) {
        let load = self.load(id);
        self.refresh();
        load.await;
        self.refresh();
        if let Some(err) = self.load_error() {
            tracing::warn!(%id, error = %err, "request could not be opened");
        }
    }

    /// Why the request itself failed to load, if it did.
    pub fn load_error(&self) -> Option<ClientError> {
        self.request.state().error
    }

    pub fn form(&self) -> &RequestForm<R> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RequestForm<R> {
        &mut self.form
    }
}
