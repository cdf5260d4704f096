//! Template store backed by a PostgreSQL table of JSONB documents.

use crate::infra::config::Settings;
use crate::storage::templates::{StoreError, TemplateStore};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};
use std::str::FromStr;

// Arbitrary constant lock ID (must be stable across instances).
const SEED_LOCK_ID: i64 = 4_240_017;

pub fn validate_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// One row per template record; `id` is store identity and never compared.
#[derive(Clone)]
pub struct PostgresTemplateStore {
    pool: PgPool,
    table: String,
}

impl PostgresTemplateStore {
    /// Wraps an existing pool. The table name must be a plain SQL identifier.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, StoreError> {
        let table = table.into();
        if !validate_ident(&table) {
            return Err(StoreError::Config(format!(
                "'{}' is not a valid table name",
                table
            )));
        }
        Ok(Self { pool, table })
    }

    /// Builds the connection pool from settings and makes sure the table exists.
    pub async fn connect(settings: &Settings) -> Result<Self, StoreError> {
        let url = settings
            .database_url
            .as_deref()
            .ok_or_else(|| StoreError::Config("DATABASE_URL is not set".to_string()))?;
        let mut options = PgConnectOptions::from_str(url)?;
        if let Some(name) = &settings.database_name {
            options = options.database(name);
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.store_timeout)
            .connect_with(options)
            .await?;

        let store = Self::new(pool, settings.templates_table.clone())?;
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                document JSONB NOT NULL
            )",
            self.table
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TemplateStore for PostgresTemplateStore {
    async fn list_all(&self) -> Result<Vec<JsonValue>, StoreError> {
        let rows = sqlx::query(&format!("SELECT document FROM {} ORDER BY id", self.table))
            .fetch_all(&self.pool)
            .await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(row.try_get::<JsonValue, _>("document")?);
        }
        Ok(records)
    }

    async fn seed_if_empty(&self, records: &[JsonValue]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent seeders; released on commit/rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_LOCK_ID)
            .execute(&mut *tx)
            .await?;

        let populated: bool =
            sqlx::query_scalar(&format!("SELECT EXISTS (SELECT 1 FROM {})", self.table))
                .fetch_one(&mut *tx)
                .await?;
        if populated {
            tx.rollback().await?;
            return Ok(0);
        }

        let insert = format!("INSERT INTO {} (document) VALUES ($1)", self.table);
        for record in records {
            sqlx::query(&insert).bind(record).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(records.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
