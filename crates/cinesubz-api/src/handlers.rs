//! HTTP request handlers mapping endpoints onto the core pipeline

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use cinesubz_core::{CinesubzScraper, HealthStatus};

use crate::error::ApiError;
use crate::types::{DetailsResponse, DownloadResponse, SearchResponse};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<CinesubzScraper>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UrlParams {
    pub url: Option<String>,
}

/// `GET /health`: source-site reachability probe
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.scraper.health().await)
}

/// `GET /search?q={term}`
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = required_param(params.q, "q")?;
    debug!(%query, "search request");

    let results = state.scraper.search(&query).await?;
    Ok(Json(SearchResponse {
        success: true,
        results,
    }))
}

/// `GET /details?url={entry_url}`
pub async fn details(
    State(state): State<AppState>,
    Query(params): Query<UrlParams>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let entry_url = required_param(params.url, "url")?;
    debug!(%entry_url, "details request");

    let data = state.scraper.details(&entry_url).await?;
    Ok(Json(DetailsResponse {
        success: true,
        data,
    }))
}

/// `GET /download?url={redirector_url}`
pub async fn download(
    State(state): State<AppState>,
    Query(params): Query<UrlParams>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let redirector_url = required_param(params.url, "url")?;
    debug!(%redirector_url, "download request");

    let download_options = state.scraper.resolve_downloads(&redirector_url).await?;
    Ok(Json(DownloadResponse {
        success: true,
        download_options,
    }))
}

fn required_param(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ApiError::invalid_input(format!(
            "missing required parameter: {name}"
        ))),
    }
}
