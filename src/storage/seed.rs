//! One-time population of an empty template store from a JSON fixture.

use crate::storage::templates::TemplateStore;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("seed file {path} not found or unreadable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("seed file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("seed file {0} must contain a JSON array of template records")]
    NotAnArray(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(u64),
    AlreadyPopulated,
    Failed,
}

pub fn load_seed_file(path: &Path) -> Result<Vec<JsonValue>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: JsonValue = serde_json::from_str(&raw).map_err(|source| SeedError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match parsed {
        JsonValue::Array(records) => Ok(records),
        _ => Err(SeedError::NotAnArray(path.to_path_buf())),
    }
}

/// Seeds `store` from `path` if the store is empty.
///
/// Never fails: a missing fixture or store error is logged and startup carries on
/// with whatever the store already holds.
pub async fn seed_templates(store: &dyn TemplateStore, path: &Path) -> SeedOutcome {
    let records = match load_seed_file(path) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "template store initialization failed");
            return SeedOutcome::Failed;
        }
    };

    tracing::info!(path = %path.display(), records = records.len(), "seeding template store if empty");
    match store.seed_if_empty(&records).await {
        Ok(0) => {
            tracing::info!("template store is not empty, skipping initialization");
            SeedOutcome::AlreadyPopulated
        }
        Ok(n) => {
            tracing::info!(inserted = n, "template store initialization completed");
            SeedOutcome::Seeded(n)
        }
        Err(e) => {
            tracing::error!(error = %e, "template store initialization failed");
            SeedOutcome::Failed
        }
    }
}
