//! High-level scraper API for cinesubz.co
//!
//! Combines the HTTP client, the page parsers and the URL transformation
//! engine into the three-stage pipeline: search → details → download
//! resolution.

use std::time::Instant;

use tracing::{debug, warn};

use crate::client::{CinesubzClient, ClientConfig};
use crate::error::{CinesubzError, Result};
use crate::parser::{parse_movie_details, parse_redirector_targets, parse_search_results};
use crate::transform::TransformEngine;
use crate::types::{
    HealthStatus, MovieDetails, ResolvedDownload, SearchResult, ServiceStatus,
};
use crate::url::build_search_url;

/// Main scraper API
///
/// Requests are independent; a `CinesubzScraper` can be shared across
/// tasks. The only shared state is the read-only rule table and the
/// client's capped connection pool.
pub struct CinesubzScraper {
    client: CinesubzClient,
    engine: TransformEngine,
}

impl CinesubzScraper {
    /// Create a scraper with default configuration and the documented
    /// transformation table
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a scraper with custom client configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: CinesubzClient::with_config(config)?,
            engine: TransformEngine::with_default_rules()?,
        })
    }

    /// Create a scraper from pre-built parts, e.g. a custom rule table
    pub fn with_parts(client: CinesubzClient, engine: TransformEngine) -> Self {
        Self { client, engine }
    }

    /// Search the portal for entries matching a query
    ///
    /// Zero matches yield an empty list, not an error.
    ///
    /// # Errors
    /// - `InvalidInput` - query empty or whitespace only
    /// - `UpstreamTimeout` / `UpstreamUnreachable` / `UpstreamHttp` -
    ///   network-layer failures after retries
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> cinesubz_core::Result<()> {
    /// use cinesubz_core::CinesubzScraper;
    /// let scraper = CinesubzScraper::new()?;
    /// for result in scraper.search("Avatar").await? {
    ///     println!("{}: {}", result.title, result.entry_url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(CinesubzError::InvalidInput(
                "search query cannot be empty".to_string(),
            ));
        }

        let search_url = build_search_url(self.client.base_url(), trimmed);
        let page = self.client.fetch(&search_url).await?;

        match parse_search_results(&page.body, &page.final_url) {
            Ok(results) => {
                debug!(query = trimmed, count = results.len(), "search completed");
                Ok(results)
            }
            Err(CinesubzError::NoResultsFound(_)) => {
                debug!(query = trimmed, "search matched nothing");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch an entry page and extract full metadata plus download buttons
    ///
    /// # Errors
    /// - `InvalidInput` - URL not on the allow-listed source host
    /// - `EntryNotFound` - page fetched but its layout is not recognized
    /// - `UpstreamHttp` - true upstream 404 and other terminal statuses
    pub async fn details(&self, entry_url: &str) -> Result<MovieDetails> {
        if !self.client.is_allowed_url(entry_url) {
            return Err(CinesubzError::InvalidInput(format!(
                "entry URL is not on the source host: {entry_url}"
            )));
        }

        let page = self.client.fetch(entry_url).await?;
        parse_movie_details(&page.body, &page.final_url)
    }

    /// Resolve a download-button URL through its redirector page
    ///
    /// Fetches the intermediary page, collects every embedded raw internal
    /// URL (a page may offer multiple mirrors) and maps each through the
    /// transformation engine. When the redirector answers with an off-site
    /// redirect, the revealed target counts as a candidate; it is recorded,
    /// never fetched.
    ///
    /// # Errors
    /// - `InvalidInput` - URL not on the allow-listed source host
    /// - `RedirectorUnrecognized` - no embedded target found
    /// - `UnmappableUrl` - a target matched no transformation rule
    pub async fn resolve_downloads(&self, redirector_url: &str) -> Result<Vec<ResolvedDownload>> {
        if !self.client.is_allowed_url(redirector_url) {
            return Err(CinesubzError::InvalidInput(format!(
                "redirector URL is not on the source host: {redirector_url}"
            )));
        }

        let page = self.client.fetch(redirector_url).await?;

        let mut raws: Vec<String> = Vec::new();
        if !self.client.is_allowed_url(&page.final_url) {
            debug!(target = %page.final_url, "redirector revealed its target via HTTP redirect");
            raws.push(page.final_url.clone());
        }

        match parse_redirector_targets(&page.body, redirector_url) {
            Ok(found) => {
                for target in found {
                    if !raws.contains(&target) {
                        raws.push(target);
                    }
                }
            }
            // The HTTP-level redirect already gave us a target; a bare 302
            // body has nothing further to offer
            Err(CinesubzError::RedirectorUnrecognized(_) | CinesubzError::MalformedDocument(_))
                if !raws.is_empty() => {}
            Err(e) => return Err(e),
        }

        let mut options = Vec::with_capacity(raws.len());
        for raw in raws {
            let (provider, public_download_url) = self.engine.transform(&raw)?;
            options.push(ResolvedDownload {
                provider,
                label: provider.display_label().to_string(),
                raw_internal_url: raw,
                public_download_url,
            });
        }
        Ok(options)
    }

    /// Probe the source site and report reachability plus round-trip latency
    ///
    /// Never fails: an unreachable upstream reports `degraded`.
    pub async fn health(&self) -> HealthStatus {
        let started = Instant::now();
        let status = match self.client.fetch(self.client.base_url()).await {
            Ok(_) => ServiceStatus::Online,
            Err(e) => {
                warn!(error = %e, "health probe failed");
                ServiceStatus::Degraded
            }
        };
        HealthStatus {
            status,
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraper_creation() {
        let scraper = CinesubzScraper::new();
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_scraper_with_custom_config() {
        let config = ClientConfig {
            timeout_secs: 30,
            max_retries: 1,
            ..ClientConfig::default()
        };
        let scraper = CinesubzScraper::with_config(config);
        assert!(scraper.is_ok());
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let scraper = CinesubzScraper::new().unwrap();
        let result = scraper.search("").await;
        match result {
            Err(CinesubzError::InvalidInput(msg)) => {
                assert!(msg.contains("empty"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[tokio::test]
    async fn test_search_whitespace_query() {
        let scraper = CinesubzScraper::new().unwrap();
        let result = scraper.search("   ").await;
        assert!(matches!(result, Err(CinesubzError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_details_rejects_off_host_url() {
        let scraper = CinesubzScraper::new().unwrap();
        let result = scraper.details("https://example.com/movies/avatar/").await;
        match result {
            Err(CinesubzError::InvalidInput(msg)) => {
                assert!(msg.contains("source host"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_off_host_url() {
        let scraper = CinesubzScraper::new().unwrap();
        let result = scraper.resolve_downloads("https://example.com/api-1/").await;
        assert!(matches!(result, Err(CinesubzError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_resolve_rejects_malformed_url() {
        let scraper = CinesubzScraper::new().unwrap();
        let result = scraper.resolve_downloads("not a url").await;
        assert!(matches!(result, Err(CinesubzError::InvalidInput(_))));
    }
}
