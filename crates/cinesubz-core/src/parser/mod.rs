//! HTML parsers for cinesubz.co pages
//!
//! One module per page type, each with its own named selector/pattern set
//! so a layout change produces an attributable error instead of a wrong
//! silent result.

pub mod details;
pub mod redirector;
pub mod search;

pub use details::parse_movie_details;
pub use redirector::parse_redirector_targets;
pub use search::parse_search_results;

use crate::error::{CinesubzError, Result};

/// Rejects bodies that are not markup at all
///
/// The HTML parser itself is tolerant and never fails on recoverable
/// fragments; this guard only catches empty or binary responses.
pub(crate) fn ensure_markup(body: &str) -> Result<()> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(CinesubzError::MalformedDocument("empty body".to_string()));
    }
    if trimmed.contains('\u{0}') {
        return Err(CinesubzError::MalformedDocument(
            "body contains binary content".to_string(),
        ));
    }
    if !trimmed.contains('<') {
        return Err(CinesubzError::MalformedDocument(
            "body has no tag structure".to_string(),
        ));
    }
    Ok(())
}

/// Decodes the HTML entities that show up inside extracted URLs
pub(crate) fn decode_html_entities(url: &str) -> String {
    url.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_markup_accepts_fragments() {
        assert!(ensure_markup("<div>partial").is_ok());
    }

    #[test]
    fn test_ensure_markup_rejects_empty() {
        assert!(matches!(
            ensure_markup("   "),
            Err(CinesubzError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_ensure_markup_rejects_binary() {
        assert!(matches!(
            ensure_markup("<a>\u{0}\u{0}</a>"),
            Err(CinesubzError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_ensure_markup_rejects_plain_text() {
        assert!(matches!(
            ensure_markup("just some text"),
            Err(CinesubzError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(
            decode_html_entities("https://x.test/?a=1&amp;b=2"),
            "https://x.test/?a=1&b=2"
        );
    }
}
