//! Search results parser
//!
//! Selector set `search-v1`: the portal renders search hits as dooplay
//! theme cards (`.item-box`, with `.result-item article` as the fallback
//! layout variant).

use scraper::{ElementRef, Html, Selector};

use crate::error::{CinesubzError, Result};
use crate::parser::ensure_markup;
use crate::types::{MediaType, SearchResult};
use crate::url::{absolutize, host_of};

const SELECTOR_SET: &str = "search-v1";
const CARD_SELECTORS: [&str; 2] = [".item-box", ".result-item article"];

/// Parses a search results page into result summaries
///
/// # Arguments
/// * `html` - Raw HTML of the search page
/// * `page_url` - URL the page was fetched from, used to absolutize hrefs
///
/// # Errors
/// - `MalformedDocument` - body is not markup
/// - `NoResultsFound` - zero result cards matched; callers surface this as
///   an empty list, not a failure
pub fn parse_search_results(html: &str, page_url: &str) -> Result<Vec<SearchResult>> {
    ensure_markup(html)?;
    let document = Html::parse_document(html);

    let mut results = Vec::new();
    for card_selector in CARD_SELECTORS {
        let selector = parse_selector(card_selector)?;
        for card in document.select(&selector) {
            if let Some(result) = parse_result_card(&card, page_url) {
                results.push(result);
            }
        }
        if !results.is_empty() {
            break;
        }
    }

    if results.is_empty() {
        return Err(CinesubzError::NoResultsFound(format!(
            "{SELECTOR_SET}: no result cards matched"
        )));
    }
    Ok(results)
}

/// Parses one result card; cards missing a usable anchor or title are skipped
fn parse_result_card(card: &ElementRef, page_url: &str) -> Option<SearchResult> {
    let anchor_selector = Selector::parse("a[href]").ok()?;
    let anchor = card.select(&anchor_selector).next()?;
    let href = anchor.value().attr("href")?;

    let entry_url = absolutize(page_url, href)?;
    // Cards must link back into the portal itself
    if host_of(&entry_url) != host_of(page_url) {
        return None;
    }

    let title = extract_title(card, &anchor)?;
    if title.is_empty() {
        return None;
    }

    Some(SearchResult {
        media_type: extract_media_type(card, &entry_url),
        quality: extract_badge(card, ".quality").unwrap_or_default(),
        rating: extract_rating(card).unwrap_or_default(),
        poster_url: extract_poster(card),
        title,
        entry_url,
    })
}

/// Heading text preferred over raw anchor text, which often wraps the poster
fn extract_title(card: &ElementRef, anchor: &ElementRef) -> Option<String> {
    let heading_selector = Selector::parse("h2, h3, .title").ok()?;
    if let Some(heading) = card.select(&heading_selector).next() {
        let text = collapse_text(heading);
        if !text.is_empty() {
            return Some(text);
        }
    }
    if let Some(title_attr) = anchor.value().attr("title") {
        let trimmed = title_attr.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    Some(collapse_text(*anchor))
}

/// Badge token first, then the card's own class list, then the URL path
fn extract_media_type(card: &ElementRef, entry_url: &str) -> MediaType {
    if let Some(badge) = extract_badge(card, ".item-type, .type") {
        let badge_type = MediaType::from_badge(&badge);
        if badge_type != MediaType::Unknown {
            return badge_type;
        }
    }
    for class in card.value().classes() {
        let class_type = MediaType::from_badge(class);
        if class_type != MediaType::Unknown {
            return class_type;
        }
    }
    MediaType::from_entry_path(entry_url)
}

fn extract_rating(card: &ElementRef) -> Option<String> {
    let raw = extract_badge(card, ".rating, .imdb")?;
    let cleaned = raw
        .trim_start_matches("IMDb")
        .trim_start_matches("IMDB")
        .trim_start_matches("imdb")
        .trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Falls back to the lazy-load attributes when the primary src is a placeholder
fn extract_poster(card: &ElementRef) -> Option<String> {
    let img_selector = Selector::parse("img").ok()?;
    let img = card.select(&img_selector).next()?;

    let primary = img.value().attr("src").map(str::trim).unwrap_or("");
    if !primary.is_empty() && !is_placeholder(primary) {
        return Some(primary.to_string());
    }
    for lazy_attr in ["data-src", "data-lazy-src"] {
        if let Some(value) = img.value().attr(lazy_attr) {
            let trimmed = value.trim();
            if !trimmed.is_empty() && !is_placeholder(trimmed) {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn is_placeholder(src: &str) -> bool {
    src.starts_with("data:") || src.contains("placeholder") || src.contains("blank.")
}

fn extract_badge(card: &ElementRef, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let node = card.select(&selector).next()?;
    let text = collapse_text(node);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn collapse_text(node: ElementRef) -> String {
    node.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| CinesubzError::MalformedDocument(format!("invalid selector {selector}: {e:?}")))
}
