//! Command-line interface parsing for tickerboard
//!
//! This module handles parsing of CLI arguments using clap and folding them
//! into the loaded [`Config`].

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{Config, MAX_REFRESH_SECS};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The refresh interval is zero or longer than a day
    #[error("Invalid refresh interval: '{0}'. Use a whole number of seconds from 1 to 86400")]
    InvalidRefresh(u64),

    /// A flag only makes sense together with another one
    #[error("--{0} requires --{1}")]
    Requires(&'static str, &'static str),
}

/// tickerboard - Stock, crypto and currency quotes in the terminal
#[derive(Parser, Debug)]
#[command(name = "tickerboard")]
#[command(about = "Stock, crypto and currency quotes from key-less public APIs")]
#[command(version)]
pub struct Cli {
    /// Fetch once, print a table to stdout and exit
    #[arg(long)]
    pub once: bool,

    /// Clear the quote cache before the first load
    #[arg(long)]
    pub clear_cache: bool,

    /// Keep cached quotes in memory only
    #[arg(long)]
    pub no_cache: bool,

    /// Seconds between automatic refreshes
    #[arg(long, value_name = "SECS")]
    pub refresh: Option<u64>,

    /// Show placeholder values for instruments without live data
    #[arg(long)]
    pub placeholders: bool,

    /// Path to a JSON config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also log warnings to stderr (only with --once)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where cached payloads are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// JSON files in the user cache directory
    #[default]
    Disk,
    /// Process memory, gone on exit
    Memory,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    /// Print once and exit instead of running the dashboard
    pub once: bool,
    /// Clear the cache before the first load
    pub clear_cache: bool,
    pub cache_mode: CacheMode,
    /// Refresh interval override in seconds
    pub refresh_secs: Option<u64>,
    /// Force placeholders on
    pub placeholders: bool,
    /// Explicit config file path
    pub config_path: Option<PathBuf>,
    /// Mirror warnings to stderr
    pub verbose: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a value is out of range or a flag is missing its companion
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if let Some(secs) = cli.refresh {
            if secs == 0 || secs > MAX_REFRESH_SECS {
                return Err(CliError::InvalidRefresh(secs));
            }
        }
        if cli.verbose && !cli.once {
            return Err(CliError::Requires("verbose", "once"));
        }

        Ok(StartupConfig {
            once: cli.once,
            clear_cache: cli.clear_cache,
            cache_mode: if cli.no_cache {
                CacheMode::Memory
            } else {
                CacheMode::Disk
            },
            refresh_secs: cli.refresh,
            placeholders: cli.placeholders,
            config_path: cli.config.clone(),
            verbose: cli.verbose,
        })
    }

    /// Applies CLI overrides on top of file configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(secs) = self.refresh_secs {
            config.refresh_secs = secs;
        }
        if self.placeholders {
            config.placeholders = true;
        }
    }
}
