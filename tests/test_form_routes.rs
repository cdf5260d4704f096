//! HTTP routes driven in-process against the in-memory template store:
//! GET query strings and POST bodies, matches, typed echoes, 400/422/503 paths.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use form_match::storage::{load_seed_file, StoreError};
use form_match::transport::http::types::MatchingTemplate;
use form_match::{transport, FormMatchingService, InMemoryTemplateStore, TemplateStore};
use http_body_util::BodyExt;
use serde_json::{json, Value as JsonValue};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app_with_store(store: Arc<dyn TemplateStore>) -> Router {
    let state = transport::http::AppState {
        form_service: Arc::new(FormMatchingService::new(store, Duration::from_secs(5))),
    };
    transport::http::build_app(state, "/api_v1")
}

fn app_with(records: Vec<JsonValue>) -> Router {
    app_with_store(Arc::new(InMemoryTemplateStore::with_records(records)))
}

fn seeded_app() -> Router {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/initial_data.json");
    app_with(load_seed_file(&path).expect("bundled seed fixture"))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api_v1/forms/get_form")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn get_with_date_matches_template() {
    let app = app_with(vec![json!({ "name": "Birthday", "dob": "date" })]);
    let (status, body) = send(app, get("/api_v1/forms/get_form?dob=1990-01-01")).await;

    assert_eq!(status, StatusCode::OK);
    let matched: MatchingTemplate = serde_json::from_value(body).unwrap();
    assert_eq!(matched.template_name, "Birthday");
}

#[tokio::test]
async fn post_picks_the_widest_template() {
    let app = app_with(vec![
        json!({ "name": "A", "name_field": "text" }),
        json!({ "name": "B", "name_field": "text", "email": "email" }),
    ]);
    let (status, body) = send(
        app,
        post(json!({ "name_field": "John", "email": "john@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "template_name": "B" }));
}

#[tokio::test]
async fn unmatched_form_returns_type_tags() {
    let app = seeded_app();
    let (status, body) = send(app, get("/api_v1/forms/get_form?note=hello%20world")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "note": "text" }));
}

#[tokio::test]
async fn get_and_post_agree() {
    let (_, from_query) = send(
        seeded_app(),
        get("/api_v1/forms/get_form?contact_email=user%40example.com&contact_phone=%2B7%20999%20123%2045%2067"),
    )
    .await;
    let (_, from_body) = send(
        seeded_app(),
        post(json!({ "contact_email": "user@example.com", "contact_phone": "+7 999 123 45 67" })),
    )
    .await;

    assert_eq!(from_query, json!({ "template_name": "Contact" }));
    assert_eq!(from_query, from_body);
}

#[tokio::test]
async fn seeded_templates_prefer_larger_match() {
    let (status, body) = send(
        seeded_app(),
        post(json!({
            "full_name": "Ivan Petrov",
            "contact_email": "ivan@example.com",
            "contact_phone": "+7 911 000 11 22",
            "unrelated": "whatever"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "template_name": "Contact with name" }));
}

#[tokio::test]
async fn non_canonical_phone_is_rejected() {
    let (status, body) = send(seeded_app(), post(json!({ "phone": "9999999999" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("9999999999"));
    assert!(detail.contains("+7 XXX XXX XX XX"));
}

#[tokio::test]
async fn loose_date_is_rejected() {
    let (status, body) = send(
        seeded_app(),
        get("/api_v1/forms/get_form?dob=March%203rd%2C%202024"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("March 3rd, 2024"));
    assert!(detail.contains("DD.MM.YYYY or YYYY-MM-DD"));
}

#[tokio::test]
async fn canonical_phone_is_accepted() {
    let (status, body) = send(
        app_with(vec![json!({ "name": "Callback", "phone": "phone" })]),
        post(json!({ "phone": "+7 999 999 99 99" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "template_name": "Callback" }));
}

#[tokio::test]
async fn non_string_body_values_are_unprocessable() {
    let (status, body) = send(seeded_app(), post(json!({ "age": 42 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = send(seeded_app(), post(json!(["not", "an", "object"]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn empty_form_echoes_empty_mapping() {
    let (status, body) = send(seeded_app(), get("/api_v1/forms/get_form")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

struct BrokenStore;

#[async_trait::async_trait]
impl TemplateStore for BrokenStore {
    async fn list_all(&self) -> Result<Vec<JsonValue>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn seed_if_empty(&self, _records: &[JsonValue]) -> Result<u64, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn store_failure_is_503_without_internals() {
    let (status, body) = send(
        app_with_store(Arc::new(BrokenStore)),
        get("/api_v1/forms/get_form?note=hi"),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let detail = body["detail"].as_str().unwrap();
    assert!(!detail.to_lowercase().contains("pool"));
}

#[tokio::test]
async fn health_reflects_store_reachability() {
    let (status, body) = send(seeded_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, body) = send(app_with_store(Arc::new(BrokenStore)), get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn openapi_document_lists_form_route() {
    let (status, body) = send(seeded_app(), get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api_v1/forms/get_form"]["get"].is_object());
    assert!(body["paths"]["/api_v1/forms/get_form"]["post"].is_object());
}

#[tokio::test]
async fn openapi_success_body_is_template_or_typed_form() {
    let (_, body) = send(seeded_app(), get("/api-docs/openapi.json")).await;
    for method in ["get", "post"] {
        let schema = &body["paths"]["/api_v1/forms/get_form"][method]["responses"]["200"]
            ["content"]["application/json"]["schema"];
        assert_eq!(schema["$ref"], "#/components/schemas/FormMatchResponse");
    }

    let variants = body["components"]["schemas"]["FormMatchResponse"]["oneOf"]
        .as_array()
        .expect("oneOf variants");
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0]["$ref"], "#/components/schemas/MatchingTemplate");
    assert_eq!(variants[1]["type"], "object");
    assert!(variants[1]["additionalProperties"].is_object());
}
