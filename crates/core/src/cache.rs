//! Word → pronunciation cache for remote dictionary lookups.
//!
//! Both hits and confirmed misses are cached so a word is never fetched
//! twice. Entries are insert-once; the cache only shrinks on [`clear`].
//! It can be persisted as JSON between runs.
//!
//! [`clear`]: PronunciationCache::clear

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};

/// Get the cache directory.
///
/// Uses `IPASCRIBE_CACHE_DIR` env var if set, otherwise `~/.cache/ipascribe`.
pub fn cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("IPASCRIBE_CACHE_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".cache").join("ipascribe")
}

/// Default location of the persisted remote cache.
pub fn default_cache_file() -> PathBuf {
    cache_dir().join("remote.json")
}

/// Atomically write data to a file via temp file + rename.
fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = target.with_extension("tmp");
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, target)?;
    Ok(())
}

fn cache_key(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Thread-safe insert-once pronunciation cache.
#[derive(Debug, Default)]
pub struct PronunciationCache {
    entries: RwLock<HashMap<String, Option<String>>>,
}

impl PronunciationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(entry)` when the word has been looked up before; the entry is
    /// `None` for a cached miss.
    pub fn get(&self, word: &str) -> Option<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&cache_key(word)).cloned()
    }

    /// Record a lookup result. An existing entry is never replaced; the
    /// value that ends up stored is returned.
    pub fn insert(&self, word: &str, pronunciation: Option<String>) -> Option<String> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries
            .entry(cache_key(word))
            .or_insert(pronunciation)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).clear();
        log::debug!("Cleared pronunciation cache");
    }

    /// Load a cache persisted with [`save`](Self::save). A missing file
    /// gives an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cache: {}", path.display()))?;
        let entries: HashMap<String, Option<String>> = serde_json::from_str(&data)
            .with_context(|| format!("Invalid cache file: {}", path.display()))?;
        log::info!("Loaded {} cached pronunciations from {}", entries.len(), path.display());
        Ok(Self {
            entries: RwLock::new(entries),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            serde_json::to_string(&*entries)?
        };
        atomic_write(path, json.as_bytes())
            .with_context(|| format!("Failed to write cache: {}", path.display()))?;
        log::debug!("Saved pronunciation cache to {}", path.display());
        Ok(())
    }
}
