// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::{poller, shutdown};
use crate::application::refresh_service::{RefreshService, RefreshSettings};
use crate::domain::window::Controls;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_api_source::HttpApiSource;
use crate::presentation::app_state::AppState;
use crate::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config().context("Failed to load configuration")?;
    let settings = &config.dashboard;

    // Backend adapter (infrastructure layer)
    let source = Arc::new(HttpApiSource::new(
        config.backend.base_url.clone(),
        config.backend.timeout(),
    )?);

    // Refresh orchestration (application layer)
    let refresh_service = RefreshService::new(
        source,
        RefreshSettings {
            default_minutes: settings.default_minutes,
            series_limit: settings.series_limit,
            table_rows: settings.table_rows,
        },
        Controls::new(None, settings.default_bucket.clone()),
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let poller_handle = tokio::spawn(poller::run(
        refresh_service.clone(),
        settings.poll_interval(),
        shutdown::signalled(shutdown_rx.clone()),
    ));

    let state = Arc::new(AppState {
        refresh_service,
        refresh_seconds: settings.poll_interval().as_secs().max(1),
        shutdown: shutdown_rx,
    });
    let router = router::build(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen))?;
    tracing::info!(
        "Starting temp-dashboard on {} (backend {})",
        addr,
        config.backend.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    poller_handle.await?;
    Ok(())
}
