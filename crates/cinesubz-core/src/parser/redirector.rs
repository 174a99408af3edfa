//! Redirector/countdown page parser
//!
//! Pattern set `redirector-v1`. The intermediary page never hosts the file
//! itself; it embeds the raw internal target in an inline script payload,
//! a countdown button, or a meta refresh. A single page may offer several
//! mirrors, so all candidates are returned in discovery order.

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{CinesubzError, Result};
use crate::parser::{decode_html_entities, ensure_markup};
use crate::url::host_of;

const PATTERN_SET: &str = "redirector-v1";

/// Inline script shapes that reveal the target
const SCRIPT_PATTERNS: [&str; 5] = [
    r#"window\.location\.href\s*=\s*["']([^"']+)["']"#,
    r#"window\.location\s*=\s*["']([^"']+)["']"#,
    r#"location\.href\s*=\s*["']([^"']+)["']"#,
    r#"window\.open\(\s*["']([^"']+)["']"#,
    r#"var\s+(?:url|link|target|file|download)\w*\s*=\s*["'](https?://[^"']+)["']"#,
];

/// Countdown/button anchors worth inspecting
const BUTTON_SELECTOR: &str = "a#link, a#download, a#download-btn, a.btn[href], a.download-button";

/// Extracts every embedded raw internal URL from a redirector page
///
/// # Arguments
/// * `html` - Raw HTML of the intermediary page
/// * `page_url` - The redirector URL itself; on-site anchors are excluded
///   so navigation links never masquerade as targets
///
/// # Errors
/// - `MalformedDocument` - body is not markup
/// - `RedirectorUnrecognized` - no pattern produced a candidate; the
///   intermediary layout changed or the link expired
pub fn parse_redirector_targets(html: &str, page_url: &str) -> Result<Vec<String>> {
    ensure_markup(html)?;

    let mut targets: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        let candidate = decode_html_entities(candidate.trim());
        if candidate.starts_with("http") && !targets.contains(&candidate) {
            targets.push(candidate);
        }
    };

    for pattern in SCRIPT_PATTERNS {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        for caps in re.captures_iter(html) {
            if let Some(m) = caps.get(1) {
                push(m.as_str());
            }
        }
    }

    let page_host = host_of(page_url);
    let document = Html::parse_document(html);
    if let Ok(selector) = Selector::parse(BUTTON_SELECTOR) {
        for anchor in document.select(&selector) {
            if let Some(href) = anchor.value().attr("href")
                && host_of(href).is_some()
                && host_of(href) != page_host
            {
                push(href);
            }
        }
    }

    if let Ok(selector) = Selector::parse(r#"meta[http-equiv="refresh"]"#) {
        for meta in document.select(&selector) {
            if let Some(content) = meta.value().attr("content")
                && let Some(url_part) = content.split("url=").nth(1)
            {
                push(url_part);
            }
        }
    }

    if targets.is_empty() {
        return Err(CinesubzError::RedirectorUnrecognized(format!(
            "{PATTERN_SET}: no embedded target found on {page_url}"
        )));
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://cinesubz.co/api-123456/";

    #[test]
    fn test_extract_from_location_href() {
        let html = r#"
        <html><body>
        <script>
            setTimeout(function() {
                window.location.href = "https://google.com/server11/1:/file.mp4";
            }, 5000);
        </script>
        </body></html>
        "#;
        let targets = parse_redirector_targets(html, PAGE_URL).unwrap();
        assert_eq!(targets, vec!["https://google.com/server11/1:/file.mp4".to_string()]);
    }

    #[test]
    fn test_extract_from_var_binding() {
        let html = r#"
        <script>var downloadLink = "https://mega.nz/file/AbCdEf#key";</script>
        "#;
        let targets = parse_redirector_targets(html, PAGE_URL).unwrap();
        assert_eq!(targets, vec!["https://mega.nz/file/AbCdEf#key".to_string()]);
    }

    #[test]
    fn test_multiple_mirrors_in_order() {
        let html = r#"
        <script>var url = "https://google.com/server11/1:/file.mp4";</script>
        <a id="download" href="https://t.me/cinesubz_files/42">Telegram mirror</a>
        "#;
        let targets = parse_redirector_targets(html, PAGE_URL).unwrap();
        assert_eq!(
            targets,
            vec![
                "https://google.com/server11/1:/file.mp4".to_string(),
                "https://t.me/cinesubz_files/42".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r#"
        <script>window.location.href = "https://google.com/server2/1:/x.mkv";</script>
        <a class="btn" href="https://google.com/server2/1:/x.mkv">Continue</a>
        "#;
        let targets = parse_redirector_targets(html, PAGE_URL).unwrap();
        assert_eq!(targets.len(), 1);
    }

    #[test]
    fn test_on_site_anchors_are_not_targets() {
        let html = r#"
        <a class="btn" href="https://cinesubz.co/movies/avatar/">Back to movie</a>
        <a class="btn" href="https://drive.google.com/file/d/1a2b3c/view">Download</a>
        "#;
        let targets = parse_redirector_targets(html, PAGE_URL).unwrap();
        assert_eq!(targets, vec!["https://drive.google.com/file/d/1a2b3c/view".to_string()]);
    }

    #[test]
    fn test_extract_from_meta_refresh() {
        let html = r#"
        <html><head>
        <meta http-equiv="refresh" content="3;url=https://google.com/server5/2:/movie.avi">
        </head></html>
        "#;
        let targets = parse_redirector_targets(html, PAGE_URL).unwrap();
        assert_eq!(targets, vec!["https://google.com/server5/2:/movie.avi".to_string()]);
    }

    #[test]
    fn test_html_entities_are_decoded() {
        let html = r#"
        <script>window.location = "https://files.example.com/get?id=1&amp;token=2";</script>
        "#;
        let targets = parse_redirector_targets(html, PAGE_URL).unwrap();
        assert_eq!(targets, vec!["https://files.example.com/get?id=1&token=2".to_string()]);
    }

    #[test]
    fn test_unrecognized_page_errors() {
        let html = "<html><body><h1>Please wait...</h1></body></html>";
        match parse_redirector_targets(html, PAGE_URL) {
            Err(CinesubzError::RedirectorUnrecognized(msg)) => {
                assert!(msg.contains("redirector-v1"));
            }
            _ => panic!("Expected RedirectorUnrecognized"),
        }
    }
}
