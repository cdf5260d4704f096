use crate::app::{FormMatchingService, MatchResult};
use crate::domain::form::FieldType;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub form_service: Arc<FormMatchingService>,
}

/// Flat field name -> raw value map, from the query string or a JSON body.
pub type FormData = HashMap<String, String>;

/// Body returned when a stored template covers the submitted form.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MatchingTemplate {
    pub template_name: String,
}

/// 200 body of the form routes: the matching template, or the typed form when
/// no template covers it.
#[derive(Serialize, Debug, ToSchema)]
#[serde(untagged)]
pub enum FormMatchResponse {
    Matched(MatchingTemplate),
    Typed(BTreeMap<String, FieldType>),
}

impl From<MatchResult> for FormMatchResponse {
    fn from(result: MatchResult) -> Self {
        match result {
            MatchResult::MatchedTemplate { template_name } => {
                Self::Matched(MatchingTemplate { template_name })
            }
            MatchResult::UnmatchedTyped(fields) => Self::Typed(fields),
        }
    }
}

/// Error body for every failed form request.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn detail(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorDetail>) {
    (
        status,
        Json(ErrorDetail {
            detail: message.into(),
        }),
    )
}

pub fn json_422(err: impl std::fmt::Display, expected: &str) -> (StatusCode, Json<ErrorDetail>) {
    detail(
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("Invalid request: {} (expected: {})", err, expected),
    )
}
