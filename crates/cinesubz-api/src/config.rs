//! API server configuration from environment variables

use cinesubz_core::ClientConfig;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration for the API binary
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address the server binds to
    pub listen_addr: String,
    /// Override for the source portal base URL
    pub base_url: Option<String>,
    /// Response cache TTL in seconds; unset disables caching
    pub cache_ttl_secs: Option<u64>,
}

impl ApiConfig {
    /// Reads configuration from the process environment
    ///
    /// - `CINESUBZ_API_ADDR` (default `0.0.0.0:8080`)
    /// - `CINESUBZ_BASE_URL`
    /// - `CINESUBZ_CACHE_TTL_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            listen_addr: lookup("CINESUBZ_API_ADDR")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            base_url: lookup("CINESUBZ_BASE_URL").filter(|v| !v.trim().is_empty()),
            cache_ttl_secs: lookup("CINESUBZ_CACHE_TTL_SECS").and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Client configuration for the core scraper
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig {
            cache_ttl_secs: self.cache_ttl_secs,
            ..ClientConfig::default()
        };
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        config
    }
}
