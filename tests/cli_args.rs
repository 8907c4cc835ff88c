//! Integration tests for CLI argument handling
//!
//! Tests flag parsing and startup validation from the command line.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tickerboard"))
        .args(args)
        .output()
        .expect("Failed to execute tickerboard")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tickerboard"), "Help should mention tickerboard");
    assert!(stdout.contains("--once"), "Help should mention --once flag");
    assert!(stdout.contains("--clear-cache"), "Help should mention --clear-cache flag");
}

#[test]
fn test_zero_refresh_prints_error_and_exits() {
    let output = run_cli(&["--refresh", "0"]);
    assert!(!output.status.success(), "Expected zero refresh to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid refresh interval"),
        "Should print error message about the interval: {}",
        stderr
    );
}

#[test]
fn test_verbose_without_once_is_rejected() {
    let output = run_cli(&["--verbose"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--verbose requires --once"), "{}", stderr);
}

#[test]
fn test_missing_config_file_is_reported() {
    let output = run_cli(&["--once", "--config", "/nonexistent/tickerboard/config.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config"), "{}", stderr);
}

#[test]
fn test_non_numeric_refresh_is_rejected_by_parser() {
    let output = run_cli(&["--refresh", "soon"]);
    assert!(!output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use tickerboard::cli::{CacheMode, Cli, StartupConfig};
    use tickerboard::config::Config;

    #[test]
    fn test_cli_no_args_is_interactive() {
        let cli = Cli::parse_from(["tickerboard"]);
        let startup = StartupConfig::from_cli(&cli).unwrap();
        assert!(!startup.once);
        assert_eq!(startup.cache_mode, CacheMode::Disk);
    }

    #[test]
    fn test_cli_once_with_verbose() {
        let cli = Cli::parse_from(["tickerboard", "--once", "--verbose"]);
        let startup = StartupConfig::from_cli(&cli).unwrap();
        assert!(startup.once);
        assert!(startup.verbose);
    }

    #[test]
    fn test_refresh_override_reaches_config() {
        let cli = Cli::parse_from(["tickerboard", "--refresh", "600"]);
        let startup = StartupConfig::from_cli(&cli).unwrap();
        let mut config = Config::default();
        startup.apply(&mut config);
        assert_eq!(config.refresh_interval().as_secs(), 600);
    }
}
