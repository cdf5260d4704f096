//! Read access to the stored template collection.

use crate::infra::config::Settings;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTemplateStore;
pub use postgres::PostgresTemplateStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid store configuration: {0}")]
    Config(String),
}

/// Contract for the template collection.
///
/// Records are returned raw (`{"name": ..., "<field>": "<tag>", ...}`); parsing and
/// skipping of malformed records happens in the matcher.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Full scan of the collection.
    async fn list_all(&self) -> Result<Vec<JsonValue>, StoreError>;

    /// Inserts `records` only when the collection is empty. Returns the number inserted.
    async fn seed_if_empty(&self, records: &[JsonValue]) -> Result<u64, StoreError>;

    /// Cheap reachability check for the health route.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// The store the server runs against, chosen from settings at startup.
pub enum TemplateBackend {
    Postgres(Arc<PostgresTemplateStore>),
    InMemory(Arc<InMemoryTemplateStore>),
}

impl TemplateBackend {
    /// Connects to Postgres when `DATABASE_URL` is set, otherwise falls back to memory.
    pub async fn open(settings: &Settings) -> Result<Self, StoreError> {
        if settings.database_url.is_none() {
            tracing::warn!("DATABASE_URL is not set; templates are kept in memory and lost on exit");
            return Ok(Self::InMemory(Arc::new(InMemoryTemplateStore::new())));
        }
        let store = PostgresTemplateStore::connect(settings).await?;
        Ok(Self::Postgres(Arc::new(store)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }

    pub fn store(&self) -> Arc<dyn TemplateStore> {
        match self {
            Self::Postgres(store) => store.clone(),
            Self::InMemory(store) => store.clone(),
        }
    }

    pub async fn close(&self) {
        if let Self::Postgres(store) = self {
            store.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn settings_without_database() -> Settings {
        Settings {
            database_url: None,
            database_name: None,
            templates_table: "form_templates".to_string(),
            api_prefix: "/api_v1".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            seed_file: "data/initial_data.json".into(),
            store_timeout: Duration::from_secs(1),
            max_connections: 1,
        }
    }

    #[tokio::test]
    async fn missing_database_url_opens_memory_store() {
        let backend = TemplateBackend::open(&settings_without_database()).await.unwrap();
        assert_eq!(backend.kind(), "memory");

        let store = backend.store();
        let seeded = store
            .seed_if_empty(&[json!({ "name": "Contact", "email": "email" })])
            .await
            .unwrap();
        assert_eq!(seeded, 1);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
        store.ping().await.unwrap();
        backend.close().await;
    }

    #[tokio::test]
    async fn postgres_connect_requires_database_url() {
        let err = PostgresTemplateStore::connect(&settings_without_database())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::Config(_)));
    }
}
