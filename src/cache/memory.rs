//! In-memory cache store

use std::collections::HashMap;
use std::sync::Mutex;

use super::{CacheEntry, CacheError, KeyValueStore};

/// Keeps cache entries in a process-local map
///
/// Used for `--no-cache` runs and as the test double for [`super::FileStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        // Recover the map from a poisoned lock.
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_string(), entry.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.clear();
        Ok(())
    }
}
