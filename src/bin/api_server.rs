// src/bin/api_server.rs

use anyhow::Context;
use form_match::infra::telemetry;
use form_match::storage::seed_templates;
use form_match::transport;
use form_match::{FormMatchingService, Settings, TemplateBackend};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let settings = Settings::from_env()?;

    // --- Store Initialization ---
    tracing::info!(table = %settings.templates_table, "opening template store");
    let backend = TemplateBackend::open(&settings)
        .await
        .context("failed to connect to the template store")?;
    tracing::info!(backend = backend.kind(), "template store ready");
    let store = backend.store();

    // Seeding finishes before the listener is bound, so no request races it.
    seed_templates(&*store, &settings.seed_file).await;

    // --- Service Initialization ---
    let app_state = transport::http::AppState {
        form_service: Arc::new(FormMatchingService::new(store, settings.store_timeout)),
    };

    // --- API Server Initialization ---
    let app = transport::http::build_app(app_state, &settings.api_prefix);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    tracing::info!(addr = %settings.bind_addr, prefix = %settings.api_prefix, "API server listening");
    tracing::info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    backend.close().await;
    tracing::info!("template store closed, shutdown complete");
    Ok(())
}
