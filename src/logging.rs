//! Tracing setup
//!
//! The dashboard owns the terminal, so logs go to a daily rolling file in the
//! user data directory (`~/.local/share/tickerboard/logs/` on Linux).
//! `RUST_LOG` overrides the default filter.

use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "tickerboard=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    /// No home directory to put the log file in
    #[error("Could not determine a log directory")]
    NoLogDir,

    #[error("Failed to create log directory: {0}")]
    Io(#[from] std::io::Error),

    /// A global subscriber is already installed
    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Directory holding the log files
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tickerboard").map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Installs the global subscriber
///
/// With `stderr_warnings`, warnings and errors are mirrored to stderr (used
/// by `--once`, which does not take over the terminal). The returned guard
/// must be held until exit so buffered lines are flushed.
pub fn init(stderr_warnings: bool) -> Result<WorkerGuard, LoggingError> {
    let dir = log_dir().ok_or(LoggingError::NoLogDir)?;
    std::fs::create_dir_all(&dir)?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
        &dir,
        "tickerboard.log",
    ));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);

    let stderr_layer = stderr_warnings.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(tracing_subscriber::filter::LevelFilter::WARN)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(guard)
}
