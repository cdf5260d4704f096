use crate::storage::templates::{StoreError, TemplateStore};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

/// Template store kept in process memory. Backs the server when no `DATABASE_URL` is set.
#[derive(Default)]
pub struct InMemoryTemplateStore {
    records: RwLock<Vec<JsonValue>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<JsonValue>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn list_all(&self) -> Result<Vec<JsonValue>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn seed_if_empty(&self, records: &[JsonValue]) -> Result<u64, StoreError> {
        // Check and insert under one write guard so concurrent seeders cannot both win.
        let mut guard = self.records.write().await;
        if !guard.is_empty() {
            return Ok(0);
        }
        guard.extend(records.iter().cloned());
        Ok(records.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn seeds_only_when_empty() {
        let store = InMemoryTemplateStore::new();
        let seed = vec![json!({ "name": "A", "x": "text" })];

        assert_eq!(store.seed_if_empty(&seed).await.unwrap(), 1);
        assert_eq!(store.seed_if_empty(&seed).await.unwrap(), 0);
        assert_eq!(store.list_all().await.unwrap(), seed);
    }

    #[tokio::test]
    async fn concurrent_seeding_inserts_once() {
        let store = Arc::new(InMemoryTemplateStore::new());
        let seed = vec![
            json!({ "name": "A", "x": "text" }),
            json!({ "name": "B", "y": "date" }),
        ];

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let seed = seed.clone();
            handles.push(tokio::spawn(async move { store.seed_if_empty(&seed).await.unwrap() }));
        }
        let mut inserted = 0;
        for h in handles {
            inserted += h.await.unwrap();
        }

        assert_eq!(inserted, 2);
        assert_eq!(store.len().await, 2);
    }
}
