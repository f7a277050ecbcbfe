use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::record::TitleRecord;

/// Title records keyed by display name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleCache {
    entries: Vec<(String, TitleRecord)>,
}

impl TitleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&TitleRecord> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TitleRecord)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Adds a record unless the name is empty or already taken.
    pub fn insert(&mut self, name: impl Into<String>, record: TitleRecord) -> bool {
        let name = name.into();
        if name.trim().is_empty() {
            warn!("Refusing to cache a record without a title");
            return false;
        }
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, record));
        true
    }

    /// Key-wise union where an entry already in `existing` is never replaced.
    pub fn merge(existing: TitleCache, incoming: TitleCache) -> TitleCache {
        let mut merged = existing;
        let mut taken: HashSet<String> = merged.names().map(str::to_string).collect();
        for (name, record) in incoming.entries {
            if taken.insert(name.clone()) {
                merged.entries.push((name, record));
            }
        }
        merged
    }

    /// Reads the cache file. A missing file is an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No cache at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read cache {}", path.display()))
            }
        };
        let raw: Map<String, Value> = serde_json::from_str(&text)
            .with_context(|| format!("Cache {} is not a JSON object", path.display()))?;

        let mut cache = Self::new();
        for (name, value) in raw {
            match serde_json::from_value::<TitleRecord>(value) {
                Ok(record) => {
                    cache.insert(name, record);
                }
                Err(e) => warn!("Dropping unreadable cache entry '{}': {}", name, e),
            }
        }
        Ok(cache)
    }

    /// Rewrites the whole cache file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut out = Map::new();
        for (name, record) in &self.entries {
            out.insert(name.clone(), serde_json::to_value(record)?);
        }
        let text = serde_json::to_string_pretty(&Value::Object(out))?;
        fs::write(path, text).with_context(|| format!("Failed to write cache {}", path.display()))?;
        info!("Cached {} titles to {}", self.entries.len(), path.display());
        Ok(())
    }
}

impl FromIterator<(String, TitleRecord)> for TitleCache {
    fn from_iter<I: IntoIterator<Item = (String, TitleRecord)>>(iter: I) -> Self {
        let mut cache = Self::new();
        for (name, record) in iter {
            cache.insert(name, record);
        }
        cache
    }
}
