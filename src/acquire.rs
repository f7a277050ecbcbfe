use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::builder::{build_record, RawTitlePage};
use crate::cache::TitleCache;
use crate::error::AcquireError;
use crate::page::PageTextSource;
use crate::record::TitleRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct TitleFailure {
    pub title: String,
    pub error: AcquireError,
}

/// Outcome of one acquisition batch: every title ends up in exactly one half.
#[derive(Debug, Default)]
pub struct Acquisition {
    pub records: TitleCache,
    pub failures: Vec<TitleFailure>,
}

/// Candidate titles that are not cached yet, deduplicated, in candidate order.
pub fn work_set<'a>(candidates: &'a [String], cached: &TitleCache) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .filter(|t| {
            if cached.contains(t) {
                info!("'{}' data is cached", t);
                return false;
            }
            seen.insert(*t)
        })
        .collect()
}

/// Fetches and builds a record for every uncached title, one page at a time.
///
/// A failing title is recorded and skipped; the batch always runs to the end.
pub async fn acquire_titles(
    source: &mut dyn PageTextSource,
    candidates: &[String],
    cached: &TitleCache,
) -> Acquisition {
    let titles = work_set(candidates, cached);
    info!("Looking up {} new titles", titles.len());

    let mut outcome = Acquisition::default();
    for (i, title) in titles.iter().enumerate() {
        info!("[{}/{}] Fetching '{}'", i + 1, titles.len(), title);
        match acquire_one(source, title).await {
            Ok(record) => {
                debug!(
                    title = %title,
                    kind = record.kind.label(),
                    score = ?record.score,
                    minutes = record.total_minutes(),
                    "Built record"
                );
                outcome.records.insert(*title, record);
            }
            Err(error) => {
                warn!("Skipping '{}' ({}): {}", title, error.kind(), error);
                outcome.failures.push(TitleFailure {
                    title: title.to_string(),
                    error,
                });
            }
        }
    }

    info!(
        "Acquired {} titles, {} failed",
        outcome.records.len(),
        outcome.failures.len()
    );
    outcome
}

async fn acquire_one(
    source: &mut dyn PageTextSource,
    title: &str,
) -> Result<TitleRecord, AcquireError> {
    source.open_title(title).await?;
    let page = read_page(&*source).await?;
    build_record(&page)
}

async fn read_page(source: &dyn PageTextSource) -> Result<RawTitlePage, AcquireError> {
    let subtext = source
        .subtext_line()
        .await
        .ok_or_else(|| AcquireError::MalformedPage("no subtext line".to_string()))?;
    Ok(RawTitlePage {
        rating_text: source.rating_text().await,
        summary_text: source.summary_text().await.unwrap_or_default(),
        subtext,
        series_heading: source.series_heading_text().await,
        season_nav: source.season_nav_text().await,
        credit_blocks: source.credit_blocks().await,
    })
}
