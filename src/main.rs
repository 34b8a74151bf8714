// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::export_service::ExportService;
use crate::application::page_service::PageService;
use crate::application::record_service::RecordService;
use crate::application::record_store::RecordStore;
use crate::infrastructure::config::{load_app_config, StoreKind};
use crate::infrastructure::fixture_store::FixtureStore;
use crate::infrastructure::http_store::HttpStore;
use crate::presentation::app_state::{AppState, Refreshes};
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create record store (infrastructure layer)
    let store: Arc<dyn RecordStore> = match config.store.kind {
        StoreKind::Fixture => Arc::new(FixtureStore::seeded()),
        StoreKind::Http => {
            let base_url = config
                .store
                .base_url
                .as_deref()
                .context("store.base_url is required when store.kind = \"http\"")?;
            Arc::new(HttpStore::new(base_url, config.store.timeout())?)
        }
    };
    tracing::info!("Using {:?} record store", config.store.kind);

    // Create services (application layer)
    let page_service = PageService::new(store.clone(), config.thresholds.clone(), config.clock.clock());
    let record_service = RecordService::new(store.clone());
    let export_service = ExportService::new(store);

    // Create application state
    let state = Arc::new(AppState {
        page_service,
        record_service,
        export_service,
        refreshes: Refreshes::default(),
    });

    // Build router (presentation layer)
    // Responses are compressed by the handlers, so there is no CompressionLayer
    let router = router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid server.bind address {}", config.server.bind))?;
    tracing::info!("Starting program-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
