//! Optional TTL response cache in front of the HTTP client
//!
//! Keyed by normalized request URL. Stores successful fetches only;
//! the pipeline must behave identically with caching disabled.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::client::FetchedPage;
use crate::url::normalize_cache_key;

/// In-memory response cache with a fixed time-to-live
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    stored_at: Instant,
    page: FetchedPage,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a cached page if present and fresh; evicts it otherwise
    pub fn get(&self, url: &str) -> Option<FetchedPage> {
        let key = normalize_cache_key(url);
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        if let Some(entry) = entries.get(&key) {
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.page.clone());
            }
            entries.remove(&key);
        }
        None
    }

    /// Stores a successful fetch result
    pub fn put(&self, url: &str, page: FetchedPage) {
        let key = normalize_cache_key(url);
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                page,
            },
        );
    }
}
