//! End-to-end pipeline walk against the live site
//!
//! Run with: cargo run --example resolve_links -p cinesubz-core

use cinesubz_core::CinesubzScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scraper = CinesubzScraper::new()?;

    println!("Searching for 'Avatar'...\n");

    let results = scraper.search("Avatar").await?;
    if results.is_empty() {
        println!("No results found!");
        return Ok(());
    }

    println!("Found {} results:\n", results.len());
    for (i, entry) in results.iter().take(5).enumerate() {
        println!("{}. {} [{:?}]", i + 1, entry.title, entry.media_type);
        println!("   {}", entry.entry_url);
        if !entry.rating.is_empty() {
            println!("   Rating: {}", entry.rating);
        }
        println!();
    }

    let entry = &results[0];
    println!("Fetching details for: {}\n", entry.title);

    let details = scraper.details(&entry.entry_url).await?;
    println!("Year: {}", details.info.year);
    println!("Genres: {}", details.info.genres.join(", "));
    println!("Download buttons: {}\n", details.download_links.len());

    for button in &details.download_links {
        println!("Resolving {} ({})...", button.quality_label, button.redirector_url);
        match scraper.resolve_downloads(&button.redirector_url).await {
            Ok(options) => {
                for option in options {
                    println!("  {} -> {}", option.label, option.public_download_url);
                }
            }
            Err(e) => println!("  failed: {}", e),
        }
    }

    Ok(())
}
