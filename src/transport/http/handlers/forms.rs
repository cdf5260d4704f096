use crate::transport::http::handlers::common::classify_and_match;
use crate::transport::http::types::{json_422, AppState, ErrorDetail, FormData, FormMatchResponse};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/api_v1/forms/get_form",
    params(
        ("field" = Option<String>, Query, description = "Any number of form fields as field=value pairs")
    ),
    responses(
        (status = 200, description = "Either the matching template name or, when nothing matches, an object of field -> type tag (date, phone, email, text)", body = FormMatchResponse),
        (status = 400, description = "A value failed date/phone format validation", body = ErrorDetail),
        (status = 422, description = "Unparsable query string", body = ErrorDetail),
        (status = 503, description = "Template store unavailable", body = ErrorDetail)
    )
)]
pub async fn get_form_query_handler(
    State(state): State<AppState>,
    query: Result<Query<FormData>, QueryRejection>,
) -> impl IntoResponse {
    let Query(form_data) = match query {
        Ok(v) => v,
        Err(e) => return json_422(e, "field=value pairs").into_response(),
    };
    classify_and_match(&state, form_data).await
}

#[utoipa::path(
    post,
    path = "/api_v1/forms/get_form",
    request_body(content = HashMap<String, String>, description = "Flat JSON object of field -> value strings"),
    responses(
        (status = 200, description = "Either the matching template name or, when nothing matches, an object of field -> type tag (date, phone, email, text)", body = FormMatchResponse),
        (status = 400, description = "A value failed date/phone format validation", body = ErrorDetail),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ErrorDetail),
        (status = 503, description = "Template store unavailable", body = ErrorDetail)
    )
)]
pub async fn get_form_body_handler(
    State(state): State<AppState>,
    request: Result<Json<FormData>, JsonRejection>,
) -> impl IntoResponse {
    let Json(form_data) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"field\": \"value\", ...}").into_response(),
    };
    classify_and_match(&state, form_data).await
}
