use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::sort::SortColumn;

const DEFAULT_CACHE_PATH: &str = "./data/list.json";
const DEFAULT_SEARCH_BASE: &str = "https://www.imdb.com";
const DEFAULT_SETTLE_MS: u64 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub cache_path: PathBuf,
    pub list_path: Option<PathBuf>,
    pub search_base: String,
    pub settle: Duration,
    pub user: String,
    pub titles: Vec<String>,
    pub sorts: Vec<SortColumn>,
    pub fetch: bool,
}

impl AppConfig {
    /// Environment first, then command-line flags on top.
    pub fn load<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::from_env()?;
        config.apply_args(args)?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        let settle_ms = match env::var("WATCHLIST_SETTLE_MS") {
            Ok(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("WATCHLIST_SETTLE_MS must be milliseconds, got '{}'", v))?,
            Err(_) => DEFAULT_SETTLE_MS,
        };
        Ok(Self {
            cache_path: non_empty_var("WATCHLIST_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH)),
            list_path: non_empty_var("WATCHLIST_FILE").map(PathBuf::from),
            search_base: non_empty_var("WATCHLIST_SEARCH_BASE")
                .unwrap_or_else(|| DEFAULT_SEARCH_BASE.to_string()),
            settle: Duration::from_millis(settle_ms),
            user: non_empty_var("WATCHLIST_USER").unwrap_or_else(|| "you".to_string()),
            titles: Vec::new(),
            sorts: Vec::new(),
            fetch: true,
        })
    }

    fn apply_args<I>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--list" => self.list_path = Some(PathBuf::from(flag_value(&mut args, "--list")?)),
                "--cache" => self.cache_path = PathBuf::from(flag_value(&mut args, "--cache")?),
                "--sort" => self.sorts.push(flag_value(&mut args, "--sort")?.parse()?),
                "--no-fetch" => self.fetch = false,
                flag if flag.starts_with("--") => bail!("unknown flag '{}'", flag),
                _ => self.titles.push(arg.clone()),
            }
        }
        Ok(())
    }
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{} needs a value", flag))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AppConfig {
        AppConfig {
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            list_path: None,
            search_base: DEFAULT_SEARCH_BASE.to_string(),
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            user: "you".to_string(),
            titles: Vec::new(),
            sorts: Vec::new(),
            fetch: true,
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_override_and_titles_collect() {
        let mut config = base();
        config
            .apply_args(args(&[
                "--cache",
                "/tmp/list.json",
                "--sort",
                "duration",
                "Dark",
                "--sort",
                "duration",
                "The Matrix",
                "--no-fetch",
            ]))
            .unwrap();
        assert_eq!(config.cache_path, PathBuf::from("/tmp/list.json"));
        assert_eq!(config.sorts, vec![SortColumn::Duration, SortColumn::Duration]);
        assert_eq!(config.titles, vec!["Dark", "The Matrix"]);
        assert!(!config.fetch);
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(base().apply_args(args(&["--sort", "rating"])).is_err());
        assert!(base().apply_args(args(&["--list"])).is_err());
        assert!(base().apply_args(args(&["--verbose"])).is_err());
    }
}
