//! Runtime configuration
//!
//! Every field has a default, so a missing or partial `config.json` is fine.
//! The file lives in the XDG config directory (`~/.config/tickerboard/` on
//! Linux) unless `--config` points elsewhere.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::data::Watchlist;
use crate::fetch::{default_routes, AccessRoute};

/// Longest accepted refresh interval (one day)
pub const MAX_REFRESH_SECS: u64 = 24 * 60 * 60;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value is out of range
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Age after which a cached payload is refetched
    pub freshness_secs: u64,
    /// Per-attempt request timeout
    pub timeout_secs: u64,
    /// Interval between automatic dashboard refreshes
    pub refresh_secs: u64,
    /// Access routes in preference order
    pub routes: Vec<AccessRoute>,
    /// Tracked instruments
    pub watchlist: Watchlist,
    /// Show static placeholder values for unavailable instruments
    pub placeholders: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            freshness_secs: 300,
            timeout_secs: 10,
            refresh_secs: 300,
            routes: default_routes(),
            watchlist: Watchlist::default(),
            placeholders: false,
        }
    }
}

impl Config {
    /// Path of the default config file, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tickerboard").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads configuration
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// when the file is present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Reads and validates a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the fetcher cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.routes.is_empty() {
            return Err(ConfigError::Invalid("at least one route is required".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        if self.refresh_secs == 0 || self.refresh_secs > MAX_REFRESH_SECS {
            return Err(ConfigError::Invalid(format!(
                "refresh_secs must be between 1 and {}",
                MAX_REFRESH_SECS
            )));
        }
        Ok(())
    }

    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::RouteKind;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("config.json");
        fs::write(&path, content).expect("Should write config");
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.freshness(), Duration::from_secs(300));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
        assert_eq!(config.routes.len(), 3);
        assert!(!config.placeholders);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let (_dir, path) = write_config(r#"{"refresh_secs": 600, "placeholders": true}"#);

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.refresh_secs, 600);
        assert!(config.placeholders);
        assert_eq!(config.freshness_secs, 300);
        assert_eq!(config.watchlist, Watchlist::default());
    }

    #[test]
    fn test_custom_routes() {
        let (_dir, path) = write_config(
            r#"{"routes": [{"name": "relay", "type": "prefix", "prefix": "https://r.test/", "encode": false}]}"#,
        );

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.routes.len(), 1);
        assert!(matches!(config.routes[0].kind, RouteKind::Prefix { encode: false, .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let (_dir, path) = write_config("{not json");
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_explicit_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.json")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_empty_routes_rejected() {
        let (_dir, path) = write_config(r#"{"routes": []}"#);
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = Config {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_refresh_bounds() {
        let at_max = Config {
            refresh_secs: MAX_REFRESH_SECS,
            ..Default::default()
        };
        assert!(at_max.validate().is_ok());

        let (_dir, path) = write_config(r#"{"refresh_secs": 18446744073709551615}"#);
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Invalid(_))));
    }
}
