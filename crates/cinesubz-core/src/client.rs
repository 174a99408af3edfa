//! HTTP client for cinesubz.co with retry, redirect and allow-list policy
//!
//! All outbound traffic goes through this client. Redirects are followed
//! manually so every hop can be host-checked and the post-redirect URL
//! reported back to the extraction stages.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::error::{CinesubzError, Result};
use crate::url::{absolutize, allowed_hosts_for, host_of, DEFAULT_BASE_URL};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the source portal
    pub base_url: String,
    /// Per-fetch connect/read timeout in seconds (default: 12)
    pub timeout_secs: u64,
    /// Maximum retry attempts for transient errors (default: 2)
    pub max_retries: u32,
    /// Base backoff delay in milliseconds, doubled per attempt (default: 300)
    pub retry_base_ms: u64,
    /// Maximum redirect hops followed per fetch (default: 5)
    pub max_redirects: u32,
    /// Cap on concurrent outbound fetches (default: 16)
    pub max_connections: usize,
    /// Hosts fetches may target; empty means derive from `base_url`
    pub allowed_hosts: Vec<String>,
    /// Response cache TTL in seconds; `None` disables caching
    pub cache_ttl_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 12,
            max_retries: 2,
            retry_base_ms: 300,
            max_redirects: 5,
            max_connections: 16,
            allowed_hosts: Vec::new(),
            cache_ttl_secs: None,
        }
    }
}

/// Result of one fetch: the decoded body and the URL that produced it
///
/// `final_url` differs from the requested URL when redirects were followed.
/// When the chain pointed outside the allow-list, `final_url` is that
/// off-list target and `body` is the last on-list response; the target is
/// recorded, never fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub body: String,
    pub final_url: String,
}

/// HTTP client wrapper with bounded retries and a connection cap
pub struct CinesubzClient {
    client: reqwest::Client,
    limiter: Arc<Semaphore>,
    cache: Option<ResponseCache>,
    base_url: String,
    allowed_hosts: Vec<String>,
    max_retries: u32,
    retry_base: Duration,
    max_redirects: u32,
}

impl CinesubzClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CinesubzError::InvalidInput(format!("client configuration: {e}")))?;

        let allowed_hosts = if config.allowed_hosts.is_empty() {
            allowed_hosts_for(&config.base_url)
        } else {
            config.allowed_hosts
        };
        if allowed_hosts.is_empty() {
            return Err(CinesubzError::InvalidInput(format!(
                "base URL has no resolvable host: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            limiter: Arc::new(Semaphore::new(config.max_connections)),
            cache: config
                .cache_ttl_secs
                .map(|secs| ResponseCache::new(Duration::from_secs(secs))),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            allowed_hosts,
            max_retries: config.max_retries,
            retry_base: Duration::from_millis(config.retry_base_ms),
            max_redirects: config.max_redirects,
        })
    }

    /// Base URL of the source portal this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a URL is well-formed http(s) and targets an allow-listed host
    pub fn is_allowed_url(&self, url: &str) -> bool {
        match host_of(url) {
            Some(host) => self.allowed_hosts.iter().any(|h| *h == host),
            None => false,
        }
    }

    /// Fetch a page, following on-list redirects and retrying transient failures
    ///
    /// # Errors
    /// - `InvalidInput` - URL malformed or host not allow-listed
    /// - `UpstreamTimeout` - a fetch attempt timed out after all retries
    /// - `UpstreamUnreachable` - connection failures after all retries
    /// - `UpstreamHttp` - terminal 4xx/5xx from the source site
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        if !self.is_allowed_url(url) {
            return Err(CinesubzError::InvalidInput(format!(
                "URL is not on an allow-listed host: {url}"
            )));
        }

        if let Some(cache) = &self.cache
            && let Some(page) = cache.get(url)
        {
            debug!(url, "serving fetch from cache");
            return Ok(page);
        }

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| CinesubzError::UpstreamUnreachable("connection limiter closed".to_string()))?;

        let page = self.fetch_with_retry(url).await?;

        if let Some(cache) = &self.cache {
            cache.put(url, page.clone());
        }
        Ok(page)
    }

    /// Retry loop: exponential backoff on transient failures
    async fn fetch_with_retry(&self, url: &str) -> Result<FetchedPage> {
        let mut attempt = 0;
        loop {
            match self.do_fetch(url).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    if Self::is_transient(&e) && attempt < self.max_retries {
                        let backoff = self.retry_base * 2u32.pow(attempt);
                        warn!(url, attempt, error = %e, "transient fetch failure, backing off");
                        sleep(backoff).await;
                        attempt += 1;
                    } else {
                        return Err(e);
                    }
                }
            }
        }
    }

    /// Single attempt with manual redirect following
    ///
    /// Redirect targets are resolved against the current URL and
    /// host-checked per hop. An off-list target ends the chain: its URL is
    /// reported as `final_url` without being fetched.
    async fn do_fetch(&self, url: &str) -> Result<FetchedPage> {
        let mut current_url = url.to_string();

        for _ in 0..=self.max_redirects {
            let response = self
                .client
                .get(&current_url)
                .send()
                .await
                .map_err(|e| Self::classify_send_error(&current_url, &e))?;

            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);

                let Some(location) = location else {
                    // Redirect without a usable Location; return the body as-is
                    let body = Self::read_body(&current_url, response).await?;
                    return Ok(FetchedPage { body, final_url: current_url });
                };

                let Some(next) = absolutize(&current_url, &location) else {
                    let body = Self::read_body(&current_url, response).await?;
                    return Ok(FetchedPage { body, final_url: current_url });
                };

                if self.is_allowed_url(&next) {
                    current_url = next;
                    continue;
                }

                debug!(from = %current_url, to = %next, "redirect leaves allow-list, recording target");
                let body = Self::read_body(&current_url, response).await?;
                return Ok(FetchedPage { body, final_url: next });
            }

            if status == StatusCode::TOO_MANY_REQUESTS
                || status.is_server_error()
                || status.is_client_error()
            {
                return Err(CinesubzError::UpstreamHttp {
                    status: status.as_u16(),
                });
            }

            let body = Self::read_body(&current_url, response).await?;
            return Ok(FetchedPage { body, final_url: current_url });
        }

        Err(CinesubzError::UpstreamUnreachable(format!(
            "redirect limit exceeded fetching {url}"
        )))
    }

    async fn read_body(url: &str, response: reqwest::Response) -> Result<String> {
        response.text().await.map_err(|e| {
            if e.is_timeout() {
                CinesubzError::UpstreamTimeout(format!("reading body of {url}"))
            } else {
                CinesubzError::UpstreamUnreachable(format!("reading body of {url}: {e}"))
            }
        })
    }

    fn classify_send_error(url: &str, e: &reqwest::Error) -> CinesubzError {
        if e.is_timeout() {
            CinesubzError::UpstreamTimeout(format!("fetching {url}"))
        } else {
            CinesubzError::UpstreamUnreachable(format!("fetching {url}: {e}"))
        }
    }

    /// Transient failures worth retrying: timeouts, connection loss, 429/5xx
    fn is_transient(error: &CinesubzError) -> bool {
        match error {
            CinesubzError::UpstreamTimeout(_) | CinesubzError::UpstreamUnreachable(_) => true,
            CinesubzError::UpstreamHttp { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
