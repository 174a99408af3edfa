//! CineSubz Scraper Core Library
//!
//! Async API for extracting movie/TV metadata from cinesubz.co and
//! resolving the portal's obfuscated internal links into public,
//! provider-classified download URLs.
//!
//! # Overview
//!
//! The crate implements a three-stage pipeline:
//! - **Search**: a query string becomes a list of result summaries.
//! - **Details**: an entry URL becomes full metadata plus
//!   resolution-labeled download buttons.
//! - **Download resolution**: a button's redirector URL is followed
//!   through the portal's countdown page; embedded raw internal targets
//!   are rewritten by a table-driven [`TransformEngine`] into public
//!   provider URLs (direct cloud storage, Google Drive, Telegram,
//!   Mega.nz).
//!
//! All HTTP goes through a rate-capped client with bounded retries and a
//! host allow-list; parsing and transformation are pure computations over
//! fetched bytes.
//!
//! # Example
//!
//! ```no_run
//! use cinesubz_core::{CinesubzScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = CinesubzScraper::new()?;
//!
//!     let results = scraper.search("Avatar").await?;
//!     for entry in &results {
//!         println!("{}: {}", entry.title, entry.entry_url);
//!     }
//!
//!     if let Some(entry) = results.first() {
//!         let details = scraper.details(&entry.entry_url).await?;
//!
//!         // Resolve the first download button to its public locations
//!         if let Some(button) = details.download_links.first() {
//!             for option in scraper.resolve_downloads(&button.redirector_url).await? {
//!                 println!("{} -> {}", option.label, option.public_download_url);
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Raw internal URLs
//!
//! The portal never hands out final file locations. Redirector pages
//! embed internal tokens like `…/server11/1:/file.mp4`; the
//! transformation engine rewrites them onto the public cloud host and
//! classifies the provider. Unrecognized tokens are an error, never
//! guessed at.

mod cache;
mod client;
mod error;
pub mod parser;
mod scraper;
mod transform;
mod types;
pub mod url;

// Re-export client types
pub use client::{CinesubzClient, ClientConfig, FetchedPage};

// Re-export error types
pub use error::{CinesubzError, Result};

// Re-export parser functions
pub use parser::{parse_movie_details, parse_redirector_targets, parse_search_results};

// Re-export main scraper API
pub use scraper::CinesubzScraper;

// Re-export the transformation engine
pub use transform::{
    Rewrite, ServerIndexRule, TransformEngine, TransformRule, SONIC_CLOUD_HOST,
};

// Re-export data types
pub use types::{
    DownloadButton, HealthStatus, MediaType, MovieDetails, MovieInfo, Provider,
    ResolvedDownload, SearchResult, ServiceStatus,
};

// Re-export URL helper functions for convenience
pub use url::{build_search_url, DEFAULT_BASE_URL};
