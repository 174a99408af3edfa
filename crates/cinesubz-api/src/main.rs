//! JSON HTTP API for the cinesubz.co scraper
//!
//! Thin axum surface over [`cinesubz_core`]: four GET endpoints, a JSON
//! error envelope, permissive CORS and request tracing.

mod config;
mod error;
mod handlers;
mod routes;
mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cinesubz_core::CinesubzScraper;

use crate::config::ApiConfig;
use crate::handlers::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env();
    info!(base_url = %config.client_config().base_url, "starting cinesubz-api");

    let scraper = CinesubzScraper::with_config(config.client_config())
        .context("Failed to build scraper")?;
    let state = AppState {
        scraper: Arc::new(scraper),
    };

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("HTTP API server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
