use std::fmt::Write;

use crate::cache::TitleCache;

pub const COLUMNS: [&str; 8] = [
    "Title",
    "Type",
    "Score",
    "Genre",
    "Duration",
    "Release Year",
    "Credits",
    "Summary",
];

/// One table row, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub title: String,
    pub kind: String,
    pub score: String,
    pub genres: String,
    pub duration: String,
    pub released: String,
    pub credits: String,
    pub summary: String,
    /// Lines the credits cell needs, at least one.
    pub height: usize,
}

/// Projects the records named in `order` into display rows, skipping unknown names.
pub fn project(cache: &TitleCache, order: &[String]) -> Vec<DisplayRow> {
    order
        .iter()
        .filter_map(|name| cache.get(name).map(|record| (name, record)))
        .map(|(name, record)| DisplayRow {
            title: name.clone(),
            kind: record.kind.label().to_string(),
            score: match record.score {
                Some(s) => format!("{:.1}/10", s),
                None => "N/A/10".to_string(),
            },
            genres: record.genres.join(", "),
            duration: record.duration.clone(),
            released: record.released.clone(),
            credits: record.credits.join("\n"),
            summary: record.summary.clone(),
            height: record.credits.len().max(1),
        })
        .collect()
}

const WIDTHS: [usize; 6] = [32, 7, 8, 30, 54, 12];

/// Plain-text rendering: the six short columns on one line, credits and summary indented below.
pub fn render(user: &str, rows: &[DisplayRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome, {user}");
    let _ = writeln!(out, "Watch list of {user} ({} titles)", rows.len());
    out.push('\n');

    let header: Vec<String> = COLUMNS[..6]
        .iter()
        .zip(WIDTHS)
        .map(|(c, w)| pad(c, w))
        .collect();
    let _ = writeln!(out, "{}", header.join(" ").trim_end());
    let _ = writeln!(out, "{}", "-".repeat(WIDTHS.iter().sum::<usize>() + WIDTHS.len() - 1));

    for row in rows {
        let cells = [
            &row.title,
            &row.kind,
            &row.score,
            &row.genres,
            &row.duration,
            &row.released,
        ];
        let line: Vec<String> = cells.iter().zip(WIDTHS).map(|(c, w)| pad(c, w)).collect();
        let _ = writeln!(out, "{}", line.join(" ").trim_end());
        for credit in row.credits.lines() {
            let _ = writeln!(out, "    {credit}");
        }
        if !row.summary.is_empty() {
            let _ = writeln!(out, "    {}", row.summary);
        }
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        format!("{text}{}", " ".repeat(width - count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MediaKind, TitleRecord};

    fn cache() -> TitleCache {
        let mut cache = TitleCache::new();
        cache.insert(
            "Sherlock",
            TitleRecord {
                kind: MediaKind::Series {
                    seasons: 4,
                    latest_season_year: 2017,
                },
                score: Some(9.1),
                summary: "A modern update finds the famous sleuth in London.".to_string(),
                duration: "15 episodes (4 Seasons in 2017), 1h 28min per episode".to_string(),
                credits: vec![
                    "Creators: Mark Gatiss, Steven Moffat".to_string(),
                    "Stars: Benedict Cumberbatch, Martin Freeman".to_string(),
                ],
                genres: vec!["Crime".to_string(), "Drama".to_string(), "Mystery".to_string()],
                released: "2010".to_string(),
            },
        );
        cache.insert(
            "Pixels",
            TitleRecord {
                kind: MediaKind::Movie,
                score: None,
                summary: String::new(),
                duration: "1h 45min".to_string(),
                credits: vec![],
                genres: vec!["Comedy".to_string()],
                released: "2015".to_string(),
            },
        );
        cache
    }

    #[test]
    fn projects_display_fields_in_requested_order() {
        let order = vec!["Pixels".to_string(), "Missing".to_string(), "Sherlock".to_string()];
        let rows = project(&cache(), &order);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Pixels");
        assert_eq!(rows[0].score, "N/A/10");
        assert_eq!(rows[0].height, 1);
        assert_eq!(rows[1].kind, "Series");
        assert_eq!(rows[1].score, "9.1/10");
        assert_eq!(rows[1].genres, "Crime, Drama, Mystery");
        assert_eq!(
            rows[1].credits,
            "Creators: Mark Gatiss, Steven Moffat\nStars: Benedict Cumberbatch, Martin Freeman"
        );
        assert_eq!(rows[1].height, 2);
    }

    #[test]
    fn whole_scores_keep_one_decimal() {
        let mut cache = cache();
        let mut whole = cache.get("Pixels").unwrap().clone();
        whole.score = Some(8.0);
        cache.insert("Explained", whole);
        let rows = project(&cache, &["Explained".to_string()]);
        assert_eq!(rows[0].score, "8.0/10");
    }

    #[test]
    fn render_lists_every_row() {
        let order = vec!["Sherlock".to_string(), "Pixels".to_string()];
        let text = render("Simon", &project(&cache(), &order));
        assert!(text.starts_with("Welcome, Simon\n"));
        assert!(text.contains("Watch list of Simon (2 titles)"));
        let sherlock = text.find("Sherlock").unwrap();
        let pixels = text.find("Pixels").unwrap();
        assert!(sherlock < pixels);
        assert!(text.contains("    Stars: Benedict Cumberbatch, Martin Freeman"));
    }
}
