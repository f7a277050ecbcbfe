use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::acquire::{acquire_titles, TitleFailure};
use crate::cache::TitleCache;
use crate::config::AppConfig;
use crate::display;
use crate::page::{HttpPageSource, PageTextSource};
use crate::sort::{sort_titles, SortColumn, SortState};

#[derive(Debug)]
pub struct Refresh {
    pub cache: TitleCache,
    pub failures: Vec<TitleFailure>,
}

pub async fn run(config: AppConfig) -> Result<()> {
    let mut candidates = config.titles.clone();
    if let Some(path) = &config.list_path {
        candidates.extend(read_watch_list(path)?);
    }
    info!("Found {} titles on the watch list", candidates.len());

    let cache = if config.fetch {
        let mut source = HttpPageSource::new(&config.search_base, config.settle)?;
        let refresh = refresh_cache(&mut source, &candidates, &config.cache_path).await?;
        for failure in &refresh.failures {
            warn!("Not listed: '{}' ({})", failure.title, failure.error);
        }
        refresh.cache
    } else {
        TitleCache::load(&config.cache_path)?
    };

    let order = view_order(&cache, &config.sorts);
    let rows = display::project(&cache, &order);
    print!("{}", display::render(&config.user, &rows));
    Ok(())
}

/// Loads the cache, fetches every uncached candidate, and rewrites the cache once.
pub async fn refresh_cache(
    source: &mut dyn PageTextSource,
    candidates: &[String],
    cache_path: &Path,
) -> Result<Refresh> {
    let cached = TitleCache::load(cache_path)?;
    let acquired = acquire_titles(source, candidates, &cached).await;
    let cache = TitleCache::merge(cached, acquired.records);
    cache.save(cache_path)?;
    Ok(Refresh {
        cache,
        failures: acquired.failures,
    })
}

/// Starts from the score view, highest first, then applies each requested sort in turn.
pub fn view_order(cache: &TitleCache, sorts: &[SortColumn]) -> Vec<String> {
    let (mut order, _) = sort_titles(cache, SortColumn::Score, SortState::default());
    let mut state = SortState::default();
    for column in sorts {
        let (next_order, next_state) = sort_titles(cache, *column, state);
        order = next_order;
        state = next_state;
    }
    order
}

/// One title per line; blank lines and `#` comments are skipped.
pub fn read_watch_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read watch list {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}
