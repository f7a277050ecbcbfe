use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::debug;

use crate::error::AcquireError;

/// One navigable session over film database detail pages.
///
/// `open_title` loads the first search match for a title; the readers return
/// the rendered text of a region of the loaded page, or `None` when the page
/// has no such region.
#[async_trait]
pub trait PageTextSource: Send + Sync {
    async fn open_title(&mut self, title: &str) -> Result<(), AcquireError>;
    async fn rating_text(&self) -> Option<String>;
    async fn summary_text(&self) -> Option<String>;
    async fn subtext_line(&self) -> Option<String>;
    async fn series_heading_text(&self) -> Option<String>;
    async fn season_nav_text(&self) -> Option<String>;
    async fn credit_blocks(&self) -> Vec<String>;
}

const FIRST_RESULT: &str = "div.findSection table.findList tr td.result_text a";
const RATING: &str = ".ratingValue";
const SUMMARY: &str = ".summary_text";
const SUBTEXT: &str = ".subtext";
const SERIES_HEADING: &str = ".bp_sub_heading";
const SEASON_NAV: &str = ".seasons-and-year-nav";
const CREDITS: &str = ".credit_summary_item";

/// Page source over plain HTTP, reading regions with CSS selectors.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    base_url: String,
    settle: Duration,
    current: Option<String>,
}

impl HttpPageSource {
    pub fn new(base_url: &str, settle: Duration) -> Result<Self> {
        let user_agent = format!("watchlist/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build page HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            settle,
            current: None,
        })
    }

    #[cfg(test)]
    fn from_html(html: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: String::new(),
            settle: Duration::ZERO,
            current: Some(html.into()),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, AcquireError> {
        let res = self
            .client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.8")
            .send()
            .await
            .map_err(|e| AcquireError::Unavailable(format!("{url}: {e}")))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| AcquireError::Unavailable(format!("{url}: {e}")))?;
        if !status.is_success() {
            return Err(AcquireError::Unavailable(format!("{url} -> {status}")));
        }
        Ok(text)
    }

    // Every page load is followed by one settle delay.
    async fn navigate(&self, url: &str) -> Result<String, AcquireError> {
        let text = self.get_text(url).await?;
        tokio::time::sleep(self.settle).await;
        Ok(text)
    }

    fn select_texts(&self, selector: &str) -> Vec<String> {
        let Some(html) = self.current.as_deref() else {
            return Vec::new();
        };
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        Html::parse_document(html)
            .select(&selector)
            .map(rendered_text)
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn select_first(&self, selector: &str) -> Option<String> {
        self.select_texts(selector).into_iter().next()
    }
}

#[async_trait]
impl PageTextSource for HttpPageSource {
    async fn open_title(&mut self, title: &str) -> Result<(), AcquireError> {
        self.current = None;
        let search_url = format!(
            "{}/find?q={}&s=tt",
            self.base_url,
            urlencoding::encode(title)
        );
        let results = self.navigate(&search_url).await?;
        let href = first_result_href(&results).ok_or_else(|| AcquireError::NotFound(title.to_string()))?;
        let detail_url = if href.starts_with("http") {
            href
        } else {
            format!("{}{}", self.base_url, href)
        };
        debug!(title = %title, url = %detail_url, "Opening detail page");
        let page = self.navigate(&detail_url).await?;
        self.current = Some(page);
        Ok(())
    }

    async fn rating_text(&self) -> Option<String> {
        self.select_first(RATING)
    }

    async fn summary_text(&self) -> Option<String> {
        self.select_first(SUMMARY)
    }

    async fn subtext_line(&self) -> Option<String> {
        self.select_first(SUBTEXT)
    }

    async fn series_heading_text(&self) -> Option<String> {
        self.select_first(SERIES_HEADING)
    }

    async fn season_nav_text(&self) -> Option<String> {
        self.select_first(SEASON_NAV)
    }

    async fn credit_blocks(&self) -> Vec<String> {
        self.select_texts(CREDITS)
    }
}

fn first_result_href(html: &str) -> Option<String> {
    let selector = Selector::parse(FIRST_RESULT).ok()?;
    Html::parse_document(html)
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|h| h.to_string())
}

// Collapses whitespace runs the way a browser renders inline text.
fn rendered_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
