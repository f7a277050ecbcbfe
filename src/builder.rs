//! Turns the raw region texts of one detail page into a [`TitleRecord`].
//!
//! The page layout gives no structured data. The subtext line is
//! `[rating label |] runtime | genres | release`, a series page additionally
//! has an episode heading and a season navigation bar, and everything else
//! is read positionally from those strings.
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::duration::UNKNOWN_EPISODES;
use crate::error::AcquireError;
use crate::record::{parse_score, MediaKind, TitleRecord};

const SUBTEXT_SEPARATOR: &str = " | ";
const RATING_DELIMITER: &str = "/10";
const RELEASE_DATE_FORMAT: &str = "%d %B %Y";

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Literal text of the regions read from one detail page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTitlePage {
    pub rating_text: Option<String>,
    pub summary_text: String,
    pub subtext: String,
    /// Only present on series pages, e.g. "62 episodes".
    pub series_heading: Option<String>,
    /// Season/year navigation bar of a series page, e.g. "Seasons 5 4 3 2 1 Years 2013 ...".
    pub season_nav: Option<String>,
    pub credit_blocks: Vec<String>,
}

#[derive(Debug, PartialEq)]
struct Subtext<'a> {
    runtime: &'a str,
    genres: &'a str,
    release: &'a str,
}

pub fn build_record(page: &RawTitlePage) -> Result<TitleRecord, AcquireError> {
    let subtext = split_subtext(&page.subtext)?;

    let score = page
        .rating_text
        .as_deref()
        .and_then(|t| t.split(RATING_DELIMITER).next())
        .and_then(parse_score);

    let (kind, duration, released) = match page.series_heading.as_deref() {
        None => (
            MediaKind::Movie,
            subtext.runtime.to_string(),
            movie_year(subtext.release),
        ),
        Some(heading) => series_fields(heading, page.season_nav.as_deref(), &subtext),
    };

    let genres = subtext
        .genres
        .split(", ")
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();

    let credits = page
        .credit_blocks
        .iter()
        .map(|block| credit_line(block))
        .collect();

    Ok(TitleRecord {
        kind,
        score,
        summary: page.summary_text.trim().to_string(),
        duration,
        credits,
        genres,
        released,
    })
}

fn split_subtext(subtext: &str) -> Result<Subtext<'_>, AcquireError> {
    // Rendered text loses the space after a trailing separator, which still
    // marks an empty release field.
    let line = subtext.trim();
    let (body, empty_tail) = match line.strip_suffix(SUBTEXT_SEPARATOR.trim_end()) {
        Some(body) => (body.trim_end(), true),
        None => (line, false),
    };
    let mut tokens: Vec<&str> = body.split(SUBTEXT_SEPARATOR).collect();
    if empty_tail {
        tokens.push("");
    }
    // A leading content rating ("R", "PG-13", "TV-MA") shifts every field by one.
    let starts_numeric = tokens
        .first()
        .and_then(|t| t.chars().next())
        .is_some_and(|c| c.is_ascii_digit());
    if !starts_numeric {
        tokens.remove(0);
    }
    match tokens.as_slice() {
        [runtime, genres, release, ..] => Ok(Subtext {
            runtime: runtime.trim(),
            genres: genres.trim(),
            release: release.trim(),
        }),
        _ => Err(AcquireError::MalformedPage(format!(
            "subtext '{}' has {} fields, expected at least 3",
            subtext.trim(),
            tokens.len()
        ))),
    }
}

fn movie_year(release: &str) -> String {
    let date = release.split(" (").next().unwrap_or(release).trim();
    if let Ok(parsed) = NaiveDate::parse_from_str(date, RELEASE_DATE_FORMAT) {
        return format!("{:04}", parsed.year());
    }
    let tail: String = {
        let chars: Vec<char> = date.chars().collect();
        chars[chars.len().saturating_sub(4)..].iter().collect()
    };
    if !tail.chars().all(|c| c.is_ascii_digit()) || tail.len() != 4 {
        warn!("Release date '{}' has no trailing year, keeping '{}'", date, tail);
    }
    tail
}

fn series_fields(
    heading: &str,
    season_nav: Option<&str>,
    subtext: &Subtext<'_>,
) -> (MediaKind, String, String) {
    let heading = heading.trim();
    let episodes = if heading.contains("episodes") {
        heading
    } else {
        UNKNOWN_EPISODES
    };

    let numbers = integers(season_nav.unwrap_or(heading));
    let seasons = numbers.first().copied().unwrap_or(0);
    // Latest season year is the largest number on the bar. An episode or season
    // count above any year would win here.
    let latest_season_year = numbers.iter().copied().max().unwrap_or(0);

    let duration = if numbers.is_empty() {
        warn!("No season numbers in '{}', leaving them out", heading);
        format!("{}, {} per episode", episodes, subtext.runtime)
    } else {
        format!(
            "{} ({} Seasons in {}), {} per episode",
            episodes, seasons, latest_season_year, subtext.runtime
        )
    };

    let released = match integers(subtext.release).first() {
        Some(year) => year.to_string(),
        None => {
            warn!("No year in series release text '{}'", subtext.release);
            String::new()
        }
    };

    (
        MediaKind::Series {
            seasons,
            latest_season_year,
        },
        duration,
        released,
    )
}

fn integers(text: &str) -> Vec<u32> {
    INTEGER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

fn credit_line(block: &str) -> String {
    block.split('|').next().unwrap_or(block).trim().to_string()
}
