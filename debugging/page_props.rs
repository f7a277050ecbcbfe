//! Open one title through the HTTP page source and print every raw region plus the built record.
//! Usage:
//!   cargo run --bin page_props -- "<title>"
//! Honors WATCHLIST_SEARCH_BASE and WATCHLIST_SETTLE_MS (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde_json::json;
use std::env;
use watchlist::builder::{build_record, RawTitlePage};
use watchlist::config::AppConfig;
use watchlist::duration;
use watchlist::page::{HttpPageSource, PageTextSource};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let title = env::args()
        .nth(1)
        .context("usage: page_props <title>")?;
    let config = AppConfig::from_env()?;

    let mut source = HttpPageSource::new(&config.search_base, config.settle)?;
    source
        .open_title(&title)
        .await
        .with_context(|| format!("Failed to open '{}'", title))?;

    let raw = RawTitlePage {
        rating_text: source.rating_text().await,
        summary_text: source.summary_text().await.unwrap_or_default(),
        subtext: source.subtext_line().await.unwrap_or_default(),
        series_heading: source.series_heading_text().await,
        season_nav: source.season_nav_text().await,
        credit_blocks: source.credit_blocks().await,
    };

    let regions = json!({
        "rating": raw.rating_text,
        "summary": raw.summary_text,
        "subtext": raw.subtext,
        "series_heading": raw.series_heading,
        "season_nav": raw.season_nav,
        "credits": raw.credit_blocks,
    });
    println!("Raw regions for '{}':", title);
    println!("{}", serde_json::to_string_pretty(&regions)?);

    match build_record(&raw) {
        Ok(record) => {
            let parsed = duration::parse(&record.duration);
            println!("\nRecord:");
            println!("{}", serde_json::to_string_pretty(&record)?);
            println!(
                "\nDuration: {} episode(s) x {} min = {} min",
                parsed.episodes, parsed.per_episode_minutes, parsed.total_minutes
            );
        }
        Err(e) => println!("\nNo record: {}", e),
    }
    Ok(())
}
