use serde::{Deserialize, Deserializer, Serialize};

use crate::duration;

/// Movie or series, with season data only where it means something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MediaKind {
    Movie,
    #[serde(alias = "Serie")]
    Series {
        #[serde(default)]
        seasons: u32,
        #[serde(default)]
        latest_season_year: u32,
    },
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Series { .. } => "Series",
        }
    }

    pub fn season_count(&self) -> Option<u32> {
        match self {
            MediaKind::Movie => None,
            MediaKind::Series { seasons, .. } => Some(*seasons),
        }
    }
}

/// Enriched metadata for one watch-list title. The title name is the cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRecord {
    #[serde(flatten)]
    pub kind: MediaKind,
    #[serde(default, deserialize_with = "score_from_number_or_text")]
    pub score: Option<f32>,
    #[serde(default)]
    pub summary: String,
    pub duration: String,
    #[serde(default)]
    pub credits: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub released: String,
}

impl TitleRecord {
    /// Total watch time, always recomputed from the duration text.
    pub fn total_minutes(&self) -> u32 {
        duration::total_minutes(&self.duration)
    }

    pub fn released_year(&self) -> Option<u32> {
        self.released.trim().parse().ok()
    }
}

pub(crate) fn parse_score(text: &str) -> Option<f32> {
    text.trim()
        .replace(',', ".")
        .parse::<f32>()
        .ok()
        .filter(|s| (0.0..=10.0).contains(s))
}

// Older cache files stored the score as the scraped text ("7.7").
fn score_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Number(f32),
        Text(String),
    }

    Ok(match Option::<RawScore>::deserialize(deserializer)? {
        Some(RawScore::Number(n)) => Some(n),
        Some(RawScore::Text(t)) => parse_score(&t),
        None => None,
    })
}
