//! Classify-and-match orchestration for one submitted form.
//!
//! 1.  Types every submitted field; the first invalid value aborts the request.
//! 2.  Scans the full template collection under a deadline.
//! 3.  Returns the best template name, or the typed form when nothing matches.

use crate::domain::form::{classify, find_best_match, templates_from_records, TypedForm, ValidationError};
use crate::storage::templates::{StoreError, TemplateStore};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one request. Serializes as `{"template_name": ...}` or as the bare
/// field -> type tag mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MatchResult {
    MatchedTemplate { template_name: String },
    UnmatchedTyped(TypedForm),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("template store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
    #[error("template store did not answer within {0:?}")]
    StoreTimeout(Duration),
}

pub struct FormMatchingService {
    store: Arc<dyn TemplateStore>,
    store_timeout: Duration,
}

impl FormMatchingService {
    pub fn new(store: Arc<dyn TemplateStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    pub fn store(&self) -> &Arc<dyn TemplateStore> {
        &self.store
    }

    /// Types every field. Stops at the first value failing strict validation.
    pub fn type_fields(form_data: &HashMap<String, String>) -> Result<TypedForm, ValidationError> {
        let mut typed = TypedForm::new();
        for (field, value) in form_data {
            match classify(value) {
                Ok(field_type) => {
                    typed.insert(field.clone(), field_type);
                }
                Err(e) => {
                    tracing::error!(field = %field, value = %value, "form value failed validation");
                    return Err(e);
                }
            }
        }
        Ok(typed)
    }

    pub async fn handle(&self, form_data: &HashMap<String, String>) -> Result<MatchResult, ServiceError> {
        let typed_form = Self::type_fields(form_data)?;

        let records = tokio::time::timeout(self.store_timeout, self.store.list_all())
            .await
            .map_err(|_| ServiceError::StoreTimeout(self.store_timeout))??;
        let templates = templates_from_records(&records);

        match find_best_match(&typed_form, &templates) {
            Some(template) => {
                tracing::debug!(template = %template.name, "form matched template");
                Ok(MatchResult::MatchedTemplate {
                    template_name: template.name.clone(),
                })
            }
            None => {
                tracing::info!("no matching template found");
                Ok(MatchResult::UnmatchedTyped(typed_form))
            }
        }
    }
}
