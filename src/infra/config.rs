//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_PREFIX: &str = "/api_v1";
pub const DEFAULT_TEMPLATES_TABLE: &str = "form_templates";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_SEED_FILE: &str = "data/initial_data.json";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value '{}'", name, raw)),
        None => Ok(default),
    }
}

/// Postgres URL. When unset the server keeps templates in process memory.
pub fn database_url() -> Option<String> {
    optional("DATABASE_URL")
}

/// Optional database name overriding the one in `DATABASE_URL`.
pub fn database_name() -> Option<String> {
    optional("DATABASE_NAME")
}

/// Table holding the template records.
pub fn templates_table() -> String {
    optional("TEMPLATES_TABLE").unwrap_or_else(|| DEFAULT_TEMPLATES_TABLE.to_string())
}

/// Route prefix for the versioned API.
pub fn api_prefix() -> String {
    let prefix = optional("API_V1_STR").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

pub fn bind_addr() -> anyhow::Result<SocketAddr> {
    let default: SocketAddr = DEFAULT_BIND_ADDR.parse()?;
    parsed("BIND_ADDR", default)
}

pub fn seed_file() -> PathBuf {
    optional("SEED_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SEED_FILE))
}

/// Deadline for a single store read (and for acquiring a pooled connection).
pub fn store_timeout() -> anyhow::Result<Duration> {
    let ms = parsed("STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)?;
    Ok(Duration::from_millis(ms.max(1)))
}

pub fn max_connections() -> anyhow::Result<u32> {
    Ok(parsed("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?.max(1))
}

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub templates_table: String,
    pub api_prefix: String,
    pub bind_addr: SocketAddr,
    pub seed_file: PathBuf,
    pub store_timeout: Duration,
    pub max_connections: u32,
}

impl Settings {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self {
            database_url: database_url(),
            database_name: database_name(),
            templates_table: templates_table(),
            api_prefix: api_prefix(),
            bind_addr: bind_addr()?,
            seed_file: seed_file(),
            store_timeout: store_timeout()?,
            max_connections: max_connections()?,
        })
    }
}
