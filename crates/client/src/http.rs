//! REST-backed model service.

use std::marker::PhantomData;

use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use assetdesk_core::{Entity, FieldErrors};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::service::ModelService;

/// Talks to `/{resource}` endpoints of the booking API.
///
/// - `GET /{resource}` and `GET /{resource}/{id}` for reads
/// - `POST /{resource}` to create, `PUT /{resource}/{id}` to update
///
/// Responses may be bare or wrapped in `{"data": ...}`.
pub struct HttpModelService<E> {
    http: reqwest::Client,
    config: ClientConfig,
    _model: PhantomData<fn() -> E>,
}

/// Success body, with or without the resource envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> T {
        match self {
            Payload::Wrapped { data } => data,
            Payload::Bare(inner) => inner,
        }
    }
}

/// Body of a 422 response.
#[derive(Deserialize)]
struct ValidationBody {
    #[serde(default)]
    errors: Option<FieldErrors>,
}

impl<E: Entity> HttpModelService<E> {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self::with_client(http, config))
    }

    /// Share an existing connection pool.
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            http,
            config,
            _model: PhantomData,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn collection_url(&self) -> String {
        self.config.endpoint(E::RESOURCE)
    }

    fn member_url(&self, id: E::Id) -> String {
        self.config.endpoint(&format!("{}/{}", E::RESOURCE, id))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str::<Payload<T>>(&body)
                .map(Payload::into_inner)
                .map_err(|e| ClientError::Parse(e.to_string()));
        }

        Err(match status {
            StatusCode::NOT_FOUND => ClientError::NotFound,
            StatusCode::UNPROCESSABLE_ENTITY => {
                match serde_json::from_str::<ValidationBody>(&body) {
                    Ok(ValidationBody {
                        errors: Some(errors),
                    }) => ClientError::Validation(errors),
                    _ => ClientError::Api(status.as_u16(), body),
                }
            }
            _ => ClientError::Api(status.as_u16(), body),
        })
    }
}

#[async_trait::async_trait]
impl<E: Entity> ModelService for HttpModelService<E> {
    type Model = E;

    async fn find(&self, id: E::Id) -> Result<E, ClientError> {
        let url = self.member_url(id);
        tracing::debug!(resource = E::RESOURCE, %id, %url, "fetching record");
        self.send(self.http.get(&url)).await.inspect_err(|e| {
            tracing::warn!(resource = E::RESOURCE, %id, error = %e, "fetch failed");
        })
    }

    async fn list(&self) -> Result<Vec<E>, ClientError> {
        let url = self.collection_url();
        tracing::debug!(resource = E::RESOURCE, %url, "listing records");
        self.send(self.http.get(&url)).await.inspect_err(|e| {
            tracing::warn!(resource = E::RESOURCE, error = %e, "list failed");
        })
    }

    async fn save(&self, model: &E) -> Result<E, ClientError> {
        let req = match model.id() {
            Some(id) => self.http.put(self.member_url(id)),
            None => self.http.post(self.collection_url()),
        };
        tracing::debug!(resource = E::RESOURCE, id = ?model.id(), "saving record");

        let saved: E = self.send(req.json(model)).await.inspect_err(|e| {
            if e.is_validation() {
                tracing::info!(resource = E::RESOURCE, error = %e, "save rejected");
            } else {
                tracing::warn!(resource = E::RESOURCE, error = %e, "save failed");
            }
        })?;

        tracing::info!(resource = E::RESOURCE, id = ?saved.id(), "record saved");
        Ok(saved)
    }
}
