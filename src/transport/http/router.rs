use crate::domain::form::FieldType;
use crate::transport::http::handlers::{forms, health};
use crate::transport::http::types::{
    ApiResponse, AppState, ErrorDetail, FormMatchResponse, MatchingTemplate,
};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Form Match API"),
    paths(
        health::healthcheck_handler,
        forms::get_form_query_handler,
        forms::get_form_body_handler
    ),
    components(schemas(ApiResponse, FormMatchResponse, MatchingTemplate, ErrorDetail, FieldType))
)]
pub struct ApiDoc;

/// Routes only; `api_prefix` is e.g. `/api_v1`.
pub fn create_router(app_state: AppState, api_prefix: &str) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            &format!("{}/forms/get_form", api_prefix),
            get(forms::get_form_query_handler).post(forms::get_form_body_handler),
        )
        .with_state(app_state)
}

/// Routes plus Swagger UI, request tracing and permissive CORS.
pub fn build_app(app_state: AppState, api_prefix: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    create_router(app_state, api_prefix)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
