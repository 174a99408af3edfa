//! URL helpers for cinesubz.co
//!
//! Builders and validators take the base URL as an argument instead of
//! reading a global, so tests can point the pipeline at a local server.

use url::Url;

/// Canonical base URL of the source portal
pub const DEFAULT_BASE_URL: &str = "https://cinesubz.co";

/// Builds the search URL for a given query
///
/// The portal is a WordPress install; search is the `s` query parameter.
///
/// # Example
/// ```
/// use cinesubz_core::url::build_search_url;
/// let url = build_search_url("https://cinesubz.co", "avatar 2009");
/// assert_eq!(url, "https://cinesubz.co/?s=avatar%202009");
/// ```
pub fn build_search_url(base: &str, query: &str) -> String {
    let encoded = urlencoding::encode(query);
    format!("{}/?s={}", base.trim_end_matches('/'), encoded)
}

/// Extracts the host portion of a URL, lowercased
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Default allow-list for a base URL: its host plus the `www.` variant
pub fn allowed_hosts_for(base: &str) -> Vec<String> {
    let Some(host) = host_of(base) else {
        return Vec::new();
    };
    if let Some(bare) = host.strip_prefix("www.") {
        vec![bare.to_string(), host.clone()]
    } else {
        vec![host.clone(), format!("www.{}", host)]
    }
}

/// Resolves a possibly-relative href against a page URL
///
/// Returns `None` for unusable hrefs (empty, fragments, javascript:).
pub fn absolutize(page_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    let page = Url::parse(page_url).ok()?;
    page.join(href).ok().map(|u| u.to_string())
}

/// Normalizes a URL for use as a cache key: parsed form with fragment dropped
pub fn normalize_cache_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut u) => {
            u.set_fragment(None);
            u.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Checks whether a URL is absolute and its host publicly routable
///
/// Rejects non-http(s) schemes, loopback/private/link-local addresses and
/// obviously internal hostnames. Used by the transformation engine's
/// fallback classification.
pub fn is_publicly_routable(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }
    match parsed.host() {
        Some(url::Host::Domain(domain)) => {
            let domain = domain.to_lowercase();
            domain.contains('.')
                && domain != "localhost"
                && !domain.ends_with(".local")
                && !domain.ends_with(".internal")
                && !domain.ends_with(".lan")
        }
        Some(url::Host::Ipv4(ip)) => {
            !(ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified())
        }
        Some(url::Host::Ipv6(ip)) => !(ip.is_loopback() || ip.is_unspecified()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_url_simple() {
        let url = build_search_url(DEFAULT_BASE_URL, "avatar");
        assert_eq!(url, "https://cinesubz.co/?s=avatar");
    }

    #[test]
    fn test_build_search_url_with_spaces() {
        let url = build_search_url(DEFAULT_BASE_URL, "doctor who s07e05");
        assert_eq!(url, "https://cinesubz.co/?s=doctor%20who%20s07e05");
    }

    #[test]
    fn test_build_search_url_trailing_slash_base() {
        let url = build_search_url("https://cinesubz.co/", "avatar");
        assert_eq!(url, "https://cinesubz.co/?s=avatar");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://cinesubz.co/movies/avatar/"),
            Some("cinesubz.co".to_string())
        );
        assert_eq!(
            host_of("https://WWW.CineSubz.co/x"),
            Some("www.cinesubz.co".to_string())
        );
        assert_eq!(host_of("not a url"), None);
    }

    #[test]
    fn test_allowed_hosts_for() {
        assert_eq!(
            allowed_hosts_for(DEFAULT_BASE_URL),
            vec!["cinesubz.co".to_string(), "www.cinesubz.co".to_string()]
        );
        assert_eq!(
            allowed_hosts_for("https://www.cinesubz.co"),
            vec!["cinesubz.co".to_string(), "www.cinesubz.co".to_string()]
        );
    }

    #[test]
    fn test_absolutize_relative() {
        assert_eq!(
            absolutize("https://cinesubz.co/movies/avatar/", "/api-123456/"),
            Some("https://cinesubz.co/api-123456/".to_string())
        );
    }

    #[test]
    fn test_absolutize_absolute_passthrough() {
        assert_eq!(
            absolutize("https://cinesubz.co/", "https://mega.nz/file/abc"),
            Some("https://mega.nz/file/abc".to_string())
        );
    }

    #[test]
    fn test_absolutize_rejects_fragments_and_javascript() {
        assert_eq!(absolutize("https://cinesubz.co/", "#"), None);
        assert_eq!(absolutize("https://cinesubz.co/", "javascript:void(0)"), None);
        assert_eq!(absolutize("https://cinesubz.co/", "  "), None);
    }

    #[test]
    fn test_normalize_cache_key_strips_fragment() {
        assert_eq!(
            normalize_cache_key("https://cinesubz.co/?s=avatar#top"),
            "https://cinesubz.co/?s=avatar"
        );
    }

    #[test]
    fn test_is_publicly_routable() {
        assert!(is_publicly_routable("https://mega.nz/file/abc"));
        assert!(is_publicly_routable("http://example.com/path"));
        assert!(!is_publicly_routable("https://localhost/file"));
        assert!(!is_publicly_routable("http://127.0.0.1/file"));
        assert!(!is_publicly_routable("http://192.168.1.10/file"));
        assert!(!is_publicly_routable("https://fileserver.internal/x"));
        assert!(!is_publicly_routable("ftp://example.com/x"));
        assert!(!is_publicly_routable("server11/1:/file.mp4"));
    }
}
