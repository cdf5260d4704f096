use crate::app::ServiceError;
use crate::transport::http::types::{detail, AppState, FormData, FormMatchResponse};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Maps a service failure to its HTTP status and `{"detail"}` body.
///
/// Store problems are logged here and answered with a generic message.
pub fn service_error_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(e) => detail(StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        ServiceError::StoreUnavailable(e) => {
            tracing::error!(error = %e, "template store read failed");
            detail(
                StatusCode::SERVICE_UNAVAILABLE,
                "Template store is unavailable, retry later",
            )
            .into_response()
        }
        ServiceError::StoreTimeout(timeout) => {
            tracing::error!(?timeout, "template store read timed out");
            detail(
                StatusCode::SERVICE_UNAVAILABLE,
                "Template store is unavailable, retry later",
            )
            .into_response()
        }
    }
}

/// Shared body of both form routes.
pub async fn classify_and_match(state: &AppState, form_data: FormData) -> Response {
    match state.form_service.handle(&form_data).await {
        Ok(result) => (StatusCode::OK, Json(FormMatchResponse::from(result))).into_response(),
        Err(e) => service_error_response(e),
    }
}
