//! Core data types for the cinesubz.co scraper
//!
//! All entities are request-scoped: constructed during one pipeline
//! invocation and discarded after serialization.

use serde::{Deserialize, Serialize};

/// Classification of a catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    TvShow,
    Unknown,
}

impl MediaType {
    /// Maps a badge/label token from a result card to a media type
    ///
    /// Unrecognized tokens classify as `Unknown`, never an error.
    pub fn from_badge(token: &str) -> Self {
        let token = token.trim().to_lowercase();
        if token.contains("movie") || token.contains("film") {
            MediaType::Movie
        } else if token.contains("tv") || token.contains("show") || token.contains("series") {
            MediaType::TvShow
        } else {
            MediaType::Unknown
        }
    }

    /// Infers a media type from an entry URL path segment
    ///
    /// cinesubz.co routes movies under `/movies/` and shows under `/tvshows/`.
    pub fn from_entry_path(url: &str) -> Self {
        if url.contains("/movies/") {
            MediaType::Movie
        } else if url.contains("/tvshows/") || url.contains("/episodes/") {
            MediaType::TvShow
        } else {
            MediaType::Unknown
        }
    }
}

/// One result card from a search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Entry title
    pub title: String,

    /// movie / tvshow / unknown
    #[serde(rename = "type")]
    pub media_type: MediaType,

    /// Quality badge text (e.g. "HD"), empty when absent
    pub quality: String,

    /// Rating badge text (e.g. "7.8"), empty when absent
    pub rating: String,

    /// Poster image URL, if the card carries one
    pub poster_url: Option<String>,

    /// Absolute URL of the entry page on the source domain
    pub entry_url: String,
}

/// Labeled metadata block of an entry page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub title: String,

    #[serde(rename = "type")]
    pub media_type: MediaType,

    /// Release year as shown on the page, empty when absent
    pub year: String,

    /// IMDb rating as shown on the page, empty when absent
    pub rating: String,

    /// Genre names, deduplicated, in presentation order
    pub genres: Vec<String>,

    /// Synopsis text, empty when absent
    pub description: String,
}

/// Full metadata for one entry page plus its download buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub info: MovieInfo,
    pub poster_url: Option<String>,
    pub entry_url: String,

    /// On-page presentation order; duplicates by quality are permitted
    pub download_links: Vec<DownloadButton>,
}

/// An unresolved pointer to an intermediary countdown/redirector page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadButton {
    /// Resolution token, e.g. "720p"
    pub quality_label: String,

    /// File size text, e.g. "1.2 GB", empty when absent
    pub size_label: String,

    /// Absolute URL of the intermediary page
    pub redirector_url: String,
}

/// Public hosting service ultimately serving a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Direct,
    Google,
    Telegram,
    Mega,
}

impl Provider {
    /// Human-readable label shown next to resolved links
    pub fn display_label(&self) -> &'static str {
        match self {
            Provider::Direct => "Direct Download",
            Provider::Google => "Google Drive",
            Provider::Telegram => "Telegram",
            Provider::Mega => "Mega.nz",
        }
    }
}

/// Terminal entity of the pipeline; never mutated after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDownload {
    pub provider: Provider,
    pub label: String,

    /// The internal URL as extracted from the redirector page
    pub raw_internal_url: String,

    /// The rewritten, publicly reachable location
    pub public_download_url: String,
}

/// Reachability of the source site as reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Online,
    Degraded,
}

/// Source-site probe result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: ServiceStatus,
    pub latency_ms: u64,
}
