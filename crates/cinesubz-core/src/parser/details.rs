//! Entry page parser
//!
//! Selector set `details-v1`. Metadata comes from the dooplay labeled
//! field block (`.custom_fields`); download buttons are any anchors whose
//! label or href carries a resolution token.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{CinesubzError, Result};
use crate::parser::ensure_markup;
use crate::types::{DownloadButton, MediaType, MovieDetails, MovieInfo};
use crate::url::absolutize;

const SELECTOR_SET: &str = "details-v1";

/// Resolution token: a 3-or-4-digit number immediately followed by "p"
const RESOLUTION_PATTERN: &str = r"\b(\d{3,4})p\b";
/// File size text like "1.2 GB" or "520MB"
const SIZE_PATTERN: &str = r"(?i)(\d+(?:[.,]\d+)?)\s*(GB|MB|KB)";

/// Parses an entry page into full metadata plus download buttons
///
/// # Arguments
/// * `html` - Raw HTML of the entry page
/// * `entry_url` - URL the page was fetched from (post-redirect)
///
/// # Errors
/// - `MalformedDocument` - body is not markup
/// - `EntryNotFound` - the expected metadata container is missing, i.e.
///   the page exists but has a different layout (a true 404 surfaces
///   earlier as `UpstreamHttp`)
pub fn parse_movie_details(html: &str, entry_url: &str) -> Result<MovieDetails> {
    ensure_markup(html)?;
    let document = Html::parse_document(html);

    let title = extract_title(&document).ok_or_else(|| {
        CinesubzError::EntryNotFound(format!(
            "{SELECTOR_SET}: missing header container (.sheader .data h1 / h1.entry-title)"
        ))
    })?;

    let fields = extract_custom_fields(&document);
    let rating = fields
        .rating
        .or_else(|| extract_text(&document, ".dt_rating_vgs"))
        .unwrap_or_default();
    let year = fields
        .year
        .or_else(|| extract_year_fallback(&document))
        .unwrap_or_default();
    let genres = if fields.genres.is_empty() {
        extract_genre_tags(&document)
    } else {
        fields.genres
    };

    Ok(MovieDetails {
        info: MovieInfo {
            title,
            media_type: MediaType::from_entry_path(entry_url),
            year,
            rating,
            genres,
            description: extract_description(&document).unwrap_or_default(),
        },
        poster_url: extract_poster(&document),
        entry_url: entry_url.to_string(),
        download_links: extract_download_buttons(&document, entry_url),
    })
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse(".sheader .data h1, h1.entry-title").ok()?;
    document
        .select(&selector)
        .map(collapse_text)
        .find(|t| !t.is_empty())
}

#[derive(Default)]
struct CustomFields {
    rating: Option<String>,
    year: Option<String>,
    genres: Vec<String>,
}

/// Scans the labeled field block for recognized keys; unrecognized keys
/// are ignored
fn extract_custom_fields(document: &Html) -> CustomFields {
    let mut fields = CustomFields::default();

    let Ok(block_selector) = Selector::parse(".custom_fields") else {
        return fields;
    };
    let Ok(key_selector) = Selector::parse("b.variante") else {
        return fields;
    };
    let Ok(value_selector) = Selector::parse("span.valor") else {
        return fields;
    };

    for block in document.select(&block_selector) {
        let Some(key) = block.select(&key_selector).next().map(collapse_text) else {
            continue;
        };
        let Some(value) = block.select(&value_selector).next().map(collapse_text) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        let key = key.to_lowercase();
        if key.contains("imdb") {
            fields.rating = extract_rating_number(&value).or(Some(value));
        } else if key.contains("genre") {
            fields.genres = split_genres(&value);
        } else if key.contains("year") || key.contains("release") {
            fields.year = extract_year(&value).or(Some(value));
        }
    }
    fields
}

/// "7.9 / 10 from 1,024 votes" → "7.9"
fn extract_rating_number(value: &str) -> Option<String> {
    let re = Regex::new(r"\d+(?:\.\d+)?").ok()?;
    re.find(value).map(|m| m.as_str().to_string())
}

fn extract_year(value: &str) -> Option<String> {
    let re = Regex::new(r"\b(19|20)\d{2}\b").ok()?;
    re.find(value).map(|m| m.as_str().to_string())
}

fn split_genres(value: &str) -> Vec<String> {
    let mut genres = Vec::new();
    for genre in value.split(',') {
        let genre = genre.trim().to_string();
        if !genre.is_empty() && !genres.contains(&genre) {
            genres.push(genre);
        }
    }
    genres
}

fn extract_genre_tags(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(".sgeneros a") else {
        return Vec::new();
    };
    let mut genres = Vec::new();
    for tag in document.select(&selector) {
        let genre = collapse_text(tag);
        if !genre.is_empty() && !genres.contains(&genre) {
            genres.push(genre);
        }
    }
    genres
}

fn extract_year_fallback(document: &Html) -> Option<String> {
    extract_text(document, ".extra .date, .date").and_then(|t| extract_year(&t))
}

fn extract_description(document: &Html) -> Option<String> {
    for selector_str in [".wp-content p", r#"div[itemprop="description"] p"#] {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(text) = document
            .select(&selector)
            .map(collapse_text)
            .find(|t| !t.is_empty())
        {
            return Some(text);
        }
    }
    None
}

/// The social-preview meta tag is consistently higher resolution than any
/// inline thumbnail, so it wins
fn extract_poster(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse(r#"meta[property="og:image"]"#)
        && let Some(meta) = document.select(&selector).next()
        && let Some(content) = meta.value().attr("content")
        && !content.trim().is_empty()
    {
        return Some(content.trim().to_string());
    }

    let selector = Selector::parse(".poster img").ok()?;
    let img = document.select(&selector).next()?;
    img.value()
        .attr("src")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Anchors whose label or href matches the resolution pattern, in document
/// order; everything else is excluded
fn extract_download_buttons(document: &Html, entry_url: &str) -> Vec<DownloadButton> {
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let Ok(resolution_re) = Regex::new(RESOLUTION_PATTERN) else {
        return Vec::new();
    };
    let Ok(size_re) = Regex::new(SIZE_PATTERN) else {
        return Vec::new();
    };

    let mut buttons = Vec::new();
    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let label = collapse_text(anchor);

        let quality = resolution_re
            .captures(&label)
            .or_else(|| resolution_re.captures(href))
            .and_then(|caps| caps.get(1))
            .map(|m| format!("{}p", m.as_str()));
        let Some(quality_label) = quality else {
            continue;
        };

        let Some(redirector_url) = absolutize(entry_url, href) else {
            continue;
        };
        if redirector_url == entry_url {
            continue;
        }

        let size_label = size_re
            .captures(&label)
            .map(|caps| format!("{} {}", &caps[1], caps[2].to_uppercase()))
            .unwrap_or_default();

        buttons.push(DownloadButton {
            quality_label,
            size_label,
            redirector_url,
        });
    }
    buttons
}

fn extract_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(collapse_text)
        .find(|t| !t.is_empty())
}

fn collapse_text(node: ElementRef) -> String {
    node.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY_URL: &str = "https://cinesubz.co/movies/avatar-2009-sinhala-subtitles/";

    fn sample_page() -> &'static str {
        r#"
        <html>
        <head>
            <meta property="og:image" content="https://cinesubz.co/wp-content/posters/avatar-large.jpg">
        </head>
        <body>
        <div class="sheader">
            <div class="poster"><img src="https://cinesubz.co/wp-content/posters/avatar-thumb.jpg"></div>
            <div class="data">
                <h1>Avatar (2009) Sinhala Subtitles</h1>
                <div class="extra"><span class="date">December 18, 2009</span></div>
            </div>
        </div>
        <div class="custom_fields"><b class="variante">IMDb Rating</b><span class="valor">7.9 / 10 from 1,420,000 votes</span></div>
        <div class="custom_fields"><b class="variante">Genre</b><span class="valor">Action, Adventure, Sci-Fi</span></div>
        <div class="custom_fields"><b class="variante">Release Year</b><span class="valor">2009</span></div>
        <div class="custom_fields"><b class="variante">Runtime</b><span class="valor">162 min</span></div>
        <div class="wp-content">
            <p>A paraplegic Marine dispatched to the moon Pandora on a unique mission.</p>
        </div>
        <div class="download-links">
            <a href="https://cinesubz.co/api-111111/">480p SD - 520MB</a>
            <a href="https://cinesubz.co/api-222222/">720p HD - 1.1 GB</a>
            <a href="/api-333333/">1080p FHD - 2.3GB</a>
            <a href="/movies/avatar-2-the-way-of-water/">Avatar 2</a>
        </div>
        </body>
        </html>
        "#
    }

    #[test]
    fn test_parse_movie_details_metadata() {
        let details = parse_movie_details(sample_page(), ENTRY_URL).unwrap();

        assert_eq!(details.info.title, "Avatar (2009) Sinhala Subtitles");
        assert_eq!(details.info.media_type, MediaType::Movie);
        assert_eq!(details.info.year, "2009");
        assert_eq!(details.info.rating, "7.9");
        assert_eq!(
            details.info.genres,
            vec!["Action".to_string(), "Adventure".to_string(), "Sci-Fi".to_string()]
        );
        assert!(details.info.description.starts_with("A paraplegic Marine"));
        assert_eq!(details.entry_url, ENTRY_URL);
    }

    #[test]
    fn test_poster_prefers_og_image_over_thumbnail() {
        let details = parse_movie_details(sample_page(), ENTRY_URL).unwrap();
        assert_eq!(
            details.poster_url.as_deref(),
            Some("https://cinesubz.co/wp-content/posters/avatar-large.jpg")
        );
    }

    #[test]
    fn test_poster_thumbnail_fallback() {
        let html = r#"
        <h1 class="entry-title">Entry</h1>
        <div class="poster"><img src="https://cinesubz.co/thumb.jpg"></div>
        "#;
        let details = parse_movie_details(html, ENTRY_URL).unwrap();
        assert_eq!(details.poster_url.as_deref(), Some("https://cinesubz.co/thumb.jpg"));
    }

    #[test]
    fn test_download_buttons_in_document_order() {
        let details = parse_movie_details(sample_page(), ENTRY_URL).unwrap();
        let labels: Vec<&str> = details
            .download_links
            .iter()
            .map(|b| b.quality_label.as_str())
            .collect();
        assert_eq!(labels, vec!["480p", "720p", "1080p"]);
    }

    #[test]
    fn test_download_button_fields() {
        let details = parse_movie_details(sample_page(), ENTRY_URL).unwrap();
        let first = &details.download_links[0];
        assert_eq!(first.quality_label, "480p");
        assert_eq!(first.size_label, "520 MB");
        assert_eq!(first.redirector_url, "https://cinesubz.co/api-111111/");

        // Relative hrefs are absolutized
        let third = &details.download_links[2];
        assert_eq!(third.redirector_url, "https://cinesubz.co/api-333333/");
        assert_eq!(third.size_label, "2.3 GB");
    }

    #[test]
    fn test_non_resolution_anchors_are_dropped() {
        let details = parse_movie_details(sample_page(), ENTRY_URL).unwrap();
        assert!(details
            .download_links
            .iter()
            .all(|b| !b.redirector_url.contains("avatar-2")));
    }

    #[test]
    fn test_resolution_in_href_only() {
        let html = r#"
        <h1 class="entry-title">Entry</h1>
        <a href="https://cinesubz.co/api-720p-xyz/">Download HD</a>
        "#;
        let details = parse_movie_details(html, ENTRY_URL).unwrap();
        assert_eq!(details.download_links.len(), 1);
        assert_eq!(details.download_links[0].quality_label, "720p");
        assert_eq!(details.download_links[0].size_label, "");
    }

    #[test]
    fn test_unrecognized_field_keys_are_ignored() {
        let details = parse_movie_details(sample_page(), ENTRY_URL).unwrap();
        // "Runtime" must not leak into any mapped field
        assert_ne!(details.info.year, "162");
    }

    #[test]
    fn test_genre_tag_fallback() {
        let html = r#"
        <h1 class="entry-title">Entry</h1>
        <div class="sgeneros"><a href="/genre/action/">Action</a><a href="/genre/drama/">Drama</a></div>
        "#;
        let details = parse_movie_details(html, ENTRY_URL).unwrap();
        assert_eq!(details.info.genres, vec!["Action".to_string(), "Drama".to_string()]);
    }

    #[test]
    fn test_missing_header_is_entry_not_found() {
        let html = "<html><body><div class='totally-different-layout'></div></body></html>";
        match parse_movie_details(html, ENTRY_URL) {
            Err(CinesubzError::EntryNotFound(msg)) => {
                assert!(msg.contains("details-v1"));
            }
            _ => panic!("Expected EntryNotFound"),
        }
    }

    #[test]
    fn test_tvshow_entry_type() {
        let html = r#"<h1 class="entry-title">Loki</h1>"#;
        let details =
            parse_movie_details(html, "https://cinesubz.co/tvshows/loki/").unwrap();
        assert_eq!(details.info.media_type, MediaType::TvShow);
        assert!(details.download_links.is_empty());
    }
}
