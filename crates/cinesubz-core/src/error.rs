//! Error types for the cinesubz.co scraper
//!
//! One enum covers the whole pipeline; every variant maps to a stable
//! machine-readable kind used by the JSON error envelope.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all cinesubz.co scraper operations
///
/// Implements Display for human-readable messages and Serialize
/// as the display string for transport compatibility.
#[derive(Error, Debug)]
pub enum CinesubzError {
    /// Malformed or missing request parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network-level failure after all retries exhausted
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Per-fetch timeout elapsed
    #[error("upstream timeout: {0}")]
    UpstreamTimeout(String),

    /// Terminal HTTP status from the source site
    #[error("upstream returned HTTP {status}")]
    UpstreamHttp { status: u16 },

    /// Body was not decodable as markup at all
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Search produced zero result cards; a signal, not a hard failure
    #[error("no results found: {0}")]
    NoResultsFound(String),

    /// Entry page lacks the expected metadata container
    #[error("entry page not recognized: {0}")]
    EntryNotFound(String),

    /// Redirector page embeds no recognizable internal target
    #[error("redirector page not recognized: {0}")]
    RedirectorUnrecognized(String),

    /// Transformation engine cannot classify the raw internal URL
    #[error("cannot map internal URL to a public provider: {0}")]
    UnmappableUrl(String),
}

impl CinesubzError {
    /// Stable machine-readable kind for the JSON error envelope
    pub fn kind(&self) -> &'static str {
        match self {
            CinesubzError::InvalidInput(_) => "invalid_input",
            CinesubzError::UpstreamUnreachable(_) => "upstream_unreachable",
            CinesubzError::UpstreamTimeout(_) => "upstream_timeout",
            CinesubzError::UpstreamHttp { .. } => "upstream_http_error",
            CinesubzError::MalformedDocument(_) => "malformed_document",
            CinesubzError::NoResultsFound(_) => "no_results_found",
            CinesubzError::EntryNotFound(_) => "entry_not_found",
            CinesubzError::RedirectorUnrecognized(_) => "redirector_unrecognized",
            CinesubzError::UnmappableUrl(_) => "unmappable_url",
        }
    }
}

impl Serialize for CinesubzError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for cinesubz.co operations
pub type Result<T> = std::result::Result<T, CinesubzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_input() {
        let error = CinesubzError::InvalidInput("missing query".to_string());
        assert_eq!(error.to_string(), "invalid input: missing query");
    }

    #[test]
    fn test_error_display_upstream_http() {
        let error = CinesubzError::UpstreamHttp { status: 404 };
        assert_eq!(error.to_string(), "upstream returned HTTP 404");
    }

    #[test]
    fn test_error_display_unmappable() {
        let error = CinesubzError::UnmappableUrl("garbage".to_string());
        assert_eq!(
            error.to_string(),
            "cannot map internal URL to a public provider: garbage"
        );
    }

    #[test]
    fn test_error_kind_stability() {
        assert_eq!(CinesubzError::InvalidInput(String::new()).kind(), "invalid_input");
        assert_eq!(
            CinesubzError::UpstreamTimeout(String::new()).kind(),
            "upstream_timeout"
        );
        assert_eq!(CinesubzError::UpstreamHttp { status: 500 }.kind(), "upstream_http_error");
        assert_eq!(
            CinesubzError::RedirectorUnrecognized(String::new()).kind(),
            "redirector_unrecognized"
        );
        assert_eq!(CinesubzError::UnmappableUrl(String::new()).kind(), "unmappable_url");
    }

    #[test]
    fn test_error_serialize() {
        let error = CinesubzError::EntryNotFound("details-v1: missing header".to_string());
        let json = serde_json::to_string(&error).expect("Serialization should succeed");
        assert_eq!(json, "\"entry page not recognized: details-v1: missing header\"");
    }
}
