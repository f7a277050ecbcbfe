//! Watch-time arithmetic over the duration text stored on each record.
//!
//! Movies carry the runtime as shown on the page ("2h 30min"). Series carry
//! "<episodes> (<n> Seasons in <year>), <runtime> per episode", where the
//! episode part may be the unknown-count marker.
use once_cell::sync::Lazy;
use regex::Regex;

/// Written in place of the episode count when the series heading has none.
pub const UNKNOWN_EPISODES: &str = "Some episodes";

static EPISODE_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*episodes?").unwrap());
static HOURS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)h").unwrap());
static MINUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)min").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDuration {
    pub episodes: u32,
    pub per_episode_minutes: u32,
    pub total_minutes: u32,
}

pub fn parse(text: &str) -> ParsedDuration {
    let episodes = episode_count(text);
    let per_episode_minutes = per_episode_minutes(text);
    ParsedDuration {
        episodes,
        per_episode_minutes,
        total_minutes: per_episode_minutes.saturating_mul(episodes),
    }
}

pub fn total_minutes(text: &str) -> u32 {
    parse(text).total_minutes
}

fn episode_count(text: &str) -> u32 {
    if !text.contains("episode") {
        return 1;
    }
    if text.contains(UNKNOWN_EPISODES) {
        return 0;
    }
    first_number(&EPISODE_COUNT, text).unwrap_or_else(|| {
        tracing::warn!("No episode count in '{}', counting 0 episodes", text);
        0
    })
}

fn per_episode_minutes(text: &str) -> u32 {
    let hours = first_number(&HOURS, text).unwrap_or(0);
    let minutes = first_number(&MINUTES, text).unwrap_or(0);
    hours.saturating_mul(60).saturating_add(minutes)
}

fn first_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
