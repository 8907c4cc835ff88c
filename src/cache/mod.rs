//! Key-value cache for fetched JSON payloads
//!
//! The fetcher never touches storage directly; it goes through the
//! [`KeyValueStore`] trait so the disk-backed [`FileStore`] can be swapped for
//! the in-memory [`MemoryStore`] (used by `--no-cache` and by tests).
//! Entries carry the time they were written; freshness is decided by the
//! reader, so a store never expires anything on its own.

mod file;
mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A cached payload and the moment it was stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Parsed JSON exactly as the upstream API returned it
    pub payload: Value,
    /// When the payload was stored
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time
    pub fn now(payload: Value) -> Self {
        Self {
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Returns true while the entry is younger than `window`
    ///
    /// Entries stamped in the future (clock changes) are treated as stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        let age = now - self.timestamp;
        age >= chrono::Duration::zero() && age < window
    }
}

/// Errors raised by cache stores
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the backing storage failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The entry could not be serialized
    #[error("Cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage for cache entries keyed by string
///
/// `get` returns `None` for missing keys and for anything it cannot decode,
/// so stale or foreign records written by an older format fall through to a
/// fresh fetch.
pub trait KeyValueStore: Send + Sync {
    /// Looks up the entry stored under `key`
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Stores `entry` under `key`, replacing any previous value
    fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError>;

    /// Removes every entry
    fn clear(&self) -> Result<(), CacheError>;
}
