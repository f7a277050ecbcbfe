use anyhow::bail;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::cache::TitleCache;
use crate::record::TitleRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Type,
    Score,
    Duration,
    ReleaseYear,
}

impl FromStr for SortColumn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "type" => Ok(SortColumn::Type),
            "score" => Ok(SortColumn::Score),
            "duration" => Ok(SortColumn::Duration),
            "year" | "release" | "released" | "release-year" => Ok(SortColumn::ReleaseYear),
            other => bail!(
                "unknown sort column '{}' (expected type, score, duration or year)",
                other
            ),
        }
    }
}

/// Direction the next sort on each column will use; `true` is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub type_desc: bool,
    pub score_desc: bool,
    pub duration_desc: bool,
    pub year_desc: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            type_desc: false,
            score_desc: true,
            duration_desc: false,
            year_desc: false,
        }
    }
}

impl SortState {
    fn flag(&mut self, column: SortColumn) -> &mut bool {
        match column {
            SortColumn::Type => &mut self.type_desc,
            SortColumn::Score => &mut self.score_desc,
            SortColumn::Duration => &mut self.duration_desc,
            SortColumn::ReleaseYear => &mut self.year_desc,
        }
    }
}

/// Orders the cached titles by `column` and returns the state for the next request.
///
/// The sort is stable in both directions, so equal keys keep cache order.
pub fn sort_titles(
    cache: &TitleCache,
    column: SortColumn,
    state: SortState,
) -> (Vec<String>, SortState) {
    let mut next = state;
    let descending = {
        let flag = next.flag(column);
        let current = *flag;
        *flag = !current;
        current
    };
    if column != SortColumn::Score {
        next.score_desc = true;
    }

    // Keys are computed once per call; duration minutes are never reused across calls.
    let mut keyed: Vec<(&str, SortKey)> = cache
        .iter()
        .map(|(name, record)| (name, SortKey::of(record, column)))
        .collect();
    keyed.sort_by(|(_, a), (_, b)| {
        let ord = a.compare(b);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });

    (keyed.into_iter().map(|(n, _)| n.to_string()).collect(), next)
}

enum SortKey {
    Label(&'static str),
    Number(f64),
}

impl SortKey {
    fn of(record: &TitleRecord, column: SortColumn) -> Self {
        match column {
            SortColumn::Type => SortKey::Label(record.kind.label()),
            SortColumn::Score => SortKey::Number(record.score.map_or(f64::NEG_INFINITY, f64::from)),
            SortColumn::Duration => SortKey::Number(f64::from(record.total_minutes())),
            SortColumn::ReleaseYear => {
                SortKey::Number(record.released_year().map_or(f64::NEG_INFINITY, f64::from))
            }
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Label(a), SortKey::Label(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MediaKind;

    fn record(kind: MediaKind, score: Option<f32>, duration: &str, released: &str) -> TitleRecord {
        TitleRecord {
            kind,
            score,
            summary: String::new(),
            duration: duration.to_string(),
            credits: vec![],
            genres: vec![],
            released: released.to_string(),
        }
    }

    fn series() -> MediaKind {
        MediaKind::Series {
            seasons: 2,
            latest_season_year: 2020,
        }
    }

    fn sample() -> TitleCache {
        [
            ("Pixels", record(MediaKind::Movie, Some(5.6), "1h 45min", "2015")),
            ("Dark", record(series(), Some(8.8), "26 episodes (3 Seasons in 2020), 1h per episode", "2017")),
            ("The Matrix", record(MediaKind::Movie, Some(8.7), "2h 16min", "1999")),
            ("Explained", record(series(), None, "Some episodes (2 Seasons in 2019), 20min per episode", "2018")),
        ]
        .into_iter()
        .map(|(n, r)| (n.to_string(), r))
        .collect()
    }

    #[test]
    fn score_toggles_descending_then_ascending() {
        let cache = sample();
        let (first, state) = sort_titles(&cache, SortColumn::Score, SortState::default());
        assert_eq!(first, vec!["Dark", "The Matrix", "Pixels", "Explained"]);
        let (second, _) = sort_titles(&cache, SortColumn::Score, state);
        assert_eq!(second, vec!["Explained", "Pixels", "The Matrix", "Dark"]);
    }

    #[test]
    fn other_column_resets_score_to_highest_first() {
        let cache = sample();
        let (_, state) = sort_titles(&cache, SortColumn::Score, SortState::default());
        assert!(!state.score_desc);
        let (_, state) = sort_titles(&cache, SortColumn::Type, state);
        assert!(state.score_desc);
        assert!(state.type_desc);
        let (names, _) = sort_titles(&cache, SortColumn::Score, state);
        assert_eq!(names[0], "Dark");
    }

    #[test]
    fn duration_is_numeric_not_lexical() {
        let cache: TitleCache = [
            ("Short", record(MediaKind::Movie, None, "2h 5min", "2000")),
            ("Long", record(MediaKind::Movie, None, "1h 55min", "2000")),
            ("Longest", record(MediaKind::Movie, None, "10h", "2000")),
        ]
        .into_iter()
        .map(|(n, r)| (n.to_string(), r))
        .collect();
        let (names, state) = sort_titles(&cache, SortColumn::Duration, SortState::default());
        assert_eq!(names, vec!["Long", "Short", "Longest"]);
        let (names, _) = sort_titles(&cache, SortColumn::Duration, state);
        assert_eq!(names, vec!["Longest", "Short", "Long"]);
    }

    #[test]
    fn series_duration_uses_episode_totals() {
        let (names, _) = sort_titles(&sample(), SortColumn::Duration, SortState::default());
        assert_eq!(names, vec!["Explained", "Pixels", "The Matrix", "Dark"]);
    }

    #[test]
    fn type_sort_is_stable_both_ways() {
        let cache = sample();
        let (asc, state) = sort_titles(&cache, SortColumn::Type, SortState::default());
        assert_eq!(asc, vec!["Pixels", "The Matrix", "Dark", "Explained"]);
        let (desc, _) = sort_titles(&cache, SortColumn::Type, state);
        assert_eq!(desc, vec!["Dark", "Explained", "Pixels", "The Matrix"]);
    }

    #[test]
    fn release_year_numeric_with_unparsable_lowest() {
        let mut cache = sample();
        cache.insert("Unknown", record(MediaKind::Movie, None, "1h", ""));
        let (names, _) = sort_titles(&cache, SortColumn::ReleaseYear, SortState::default());
        assert_eq!(names, vec!["Unknown", "The Matrix", "Pixels", "Dark", "Explained"]);
    }

    #[test]
    fn parses_column_names() {
        assert_eq!("Score".parse::<SortColumn>().unwrap(), SortColumn::Score);
        assert_eq!("year".parse::<SortColumn>().unwrap(), SortColumn::ReleaseYear);
        assert!("rating".parse::<SortColumn>().is_err());
    }
}
