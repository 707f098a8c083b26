use std::sync::{Arc, Mutex};

use assetdesk_client::{ClientConfig, ClientError, HttpModelService, ModelService};
use assetdesk_core::{AssetId, BookingId, Entity, UserId};
use assetdesk_resources::{Asset, Booking};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

type Store = Arc<Mutex<Vec<Value>>>;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let store: Store = Arc::new(Mutex::new(vec![json!({
            "id": 1,
            "asset_id": 2,
            "user_id": 5,
            "from": "2024-01-01 10:00:00",
            "to": "2024-01-01 12:00:00",
            "processed_at": null,
            "user": {"id": 5, "name": "Ada", "avatar": null},
            "asset": {"id": 2, "name": "Projector"},
        })]));

        let app = Router::new()
            .route("/bookings", get(list_bookings).post(create_booking))
            .route("/bookings/:id", get(find_booking).put(update_booking))
            .route("/assets", get(list_assets))
            .with_state(store);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn service<E: Entity>(&self) -> HttpModelService<E> {
        HttpModelService::new(ClientConfig::new(&self.base_url)).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn list_bookings(State(store): State<Store>) -> Json<Value> {
    let items = store.lock().unwrap().clone();
    Json(json!({"data": items}))
}

async fn find_booking(State(store): State<Store>, Path(id): Path<u64>) -> impl IntoResponse {
    let store = store.lock().unwrap();
    match store.iter().find(|b| b["id"] == json!(id)) {
        Some(b) => (StatusCode::OK, Json(json!({"data": b}))),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))),
    }
}

fn validate(body: &Value) -> Option<Value> {
    let mut errors = serde_json::Map::new();
    if body["asset_id"].is_null() {
        errors.insert("asset_id".into(), json!(["The asset field is required."]));
    }
    if let (Some(from), Some(to)) = (body["from"].as_str(), body["to"].as_str()) {
        if from >= to {
            errors.insert("from".into(), json!(["must be before to"]));
        }
    }
    (!errors.is_empty()).then(|| json!({"message": "The given data was invalid.", "errors": errors}))
}

async fn create_booking(State(store): State<Store>, Json(mut body): Json<Value>) -> impl IntoResponse {
    if let Some(errors) = validate(&body) {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors));
    }
    let mut store = store.lock().unwrap();
    body["id"] = json!(40 + store.len() as u64 + 1);
    store.push(body.clone());
    (StatusCode::CREATED, Json(json!({"data": body})))
}

async fn update_booking(
    State(store): State<Store>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if let Some(errors) = validate(&body) {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors));
    }
    let mut store = store.lock().unwrap();
    match store.iter_mut().find(|b| b["id"] == json!(id)) {
        Some(slot) => {
            *slot = body.clone();
            (StatusCode::OK, Json(body))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))),
    }
}

async fn list_assets(headers: HeaderMap) -> impl IntoResponse {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer letmein") => (
            StatusCode::OK,
            Json(json!([{"id": 3, "name": "Van"}])),
        ),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."}))),
    }
}

#[tokio::test]
async fn finds_and_lists_wrapped_payloads() {
    let server = TestServer::spawn().await;
    let bookings = server.service::<Booking>();

    let booking = bookings.find(BookingId::new(1)).await.unwrap();
    assert_eq!(booking.user.unwrap().name, "Ada");
    assert_eq!(booking.asset_id, Some(AssetId::new(2)));

    let all = bookings.list().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let server = TestServer::spawn().await;
    let err = server.service::<Booking>().find(BookingId::new(9)).await.unwrap_err();
    assert_eq!(err, ClientError::NotFound);
}

#[tokio::test]
async fn create_posts_and_returns_canonical_record() {
    let server = TestServer::spawn().await;
    let bookings = server.service::<Booking>();

    let draft = Booking::default()
        .fill(
            json!({
                "asset_id": 3,
                "user_id": 9,
                "from": "2024-01-01T10:00",
                "to": "2024-01-01T12:00",
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();

    let saved = bookings.save(&draft).await.unwrap();
    assert_eq!(saved.id, Some(BookingId::new(42)));
    assert_eq!(saved.user_id, Some(UserId::new(9)));
}

#[tokio::test]
async fn unprocessable_entity_maps_to_field_errors() {
    let server = TestServer::spawn().await;
    let bookings = server.service::<Booking>();

    let draft = Booking::default()
        .fill(
            json!({
                "asset_id": 3,
                "from": "2024-01-01T12:00",
                "to": "2024-01-01T10:00",
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();

    let err = bookings.save(&draft).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.field_errors().first("from"), Some("must be before to"));
}

#[tokio::test]
async fn update_puts_to_member_url() {
    let server = TestServer::spawn().await;
    let bookings = server.service::<Booking>();

    let mut booking = bookings.find(BookingId::new(1)).await.unwrap();
    booking.user_id = Some(UserId::new(7));
    let saved = bookings.save(&booking).await.unwrap();

    assert_eq!(saved.id, Some(BookingId::new(1)));
    assert_eq!(saved.user_id, Some(UserId::new(7)));
}

#[tokio::test]
async fn bearer_token_is_forwarded() {
    let server = TestServer::spawn().await;

    let anonymous = server.service::<Asset>();
    assert!(matches!(anonymous.list().await, Err(ClientError::Api(401, _))));

    let authed: HttpModelService<Asset> =
        HttpModelService::new(ClientConfig::new(&server.base_url).with_token("letmein")).unwrap();
    let assets = authed.list().await.unwrap();
    assert_eq!(assets[0].name, "Van");
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
    let service: HttpModelService<Asset> =
        HttpModelService::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
    let err = service.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert!(err.field_errors().first(assetdesk_core::FORM_ERRORS_KEY).is_some());
}
