//! Disk-backed cache store
//!
//! Each entry is a JSON file in an XDG-compliant cache directory
//! (`~/.cache/tickerboard/` on Linux). Keys are usually full URLs, so file
//! names are derived from a sanitized prefix plus a hash of the key, and the
//! key itself is stored in the file and checked on read.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use super::{CacheEntry, CacheError, KeyValueStore};

/// Longest sanitized key prefix used in a file name
const MAX_STEM_LEN: usize = 48;

/// Hex digits of the key digest kept in a file name
const DIGEST_HEX_LEN: usize = 16;

/// On-disk record wrapping an entry with the key it belongs to
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    #[serde(flatten)]
    entry: CacheEntry,
}

/// Stores cache entries as JSON files on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the XDG cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "tickerboard")?;
        Some(Self {
            cache_dir: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to the cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        let stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .take(MAX_STEM_LEN)
            .collect();
        self.cache_dir
            .join(format!("{}-{}.json", stem, key_digest(key)))
    }
}

/// Leading hex digits of the key's SHA-256, stable across builds and platforms
fn key_digest(key: &str) -> String {
    let mut digest = hex::encode(Sha256::digest(key.as_bytes()));
    digest.truncate(DIGEST_HEX_LEN);
    digest
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let content = fs::read_to_string(self.cache_path(key)).ok()?;
        let stored: StoredEntry = serde_json::from_str(&content).ok()?;
        (stored.key == key).then_some(stored.entry)
    }

    fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir)?;

        let stored = StoredEntry {
            key: key.to_string(),
            entry: entry.clone(),
        };
        let json = serde_json::to_string(&stored)?;

        fs::write(self.cache_path(key), json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
