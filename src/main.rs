//! tickerboard - Stock, crypto and currency quotes in the terminal
//!
//! A terminal dashboard that shows quotes from key-less public APIs, with a
//! clock, periodic refresh and a short-lived local cache.

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use tickerboard::app::{App, AppState};
use tickerboard::cache::{FileStore, KeyValueStore, MemoryStore};
use tickerboard::cli::{CacheMode, Cli, StartupConfig};
use tickerboard::config::Config;
use tickerboard::dashboard::Dashboard;
use tickerboard::fetch::HttpTransport;
use tickerboard::refresh::RefreshTicker;
use tickerboard::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match app.state {
        AppState::Loading => ui::render_loading(frame),
        AppState::Dashboard => ui::render_dashboard(frame, app),
    }
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Picks the cache store for this run
fn open_store(mode: CacheMode) -> Arc<dyn KeyValueStore> {
    match mode {
        CacheMode::Disk => match FileStore::new() {
            Some(store) => Arc::new(store),
            None => {
                warn!("no cache directory available, caching in memory");
                Arc::new(MemoryStore::new())
            }
        },
        CacheMode::Memory => Arc::new(MemoryStore::new()),
    }
}

/// Runs the interactive dashboard until the user quits
async fn run_dashboard(
    dashboard: Dashboard,
    refresh_interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(dashboard);
    let mut ticker = RefreshTicker::spawn(refresh_interval);

    // First load runs in the background like every later one
    app.request_refresh();

    // Main event loop
    loop {
        app.start_pending();
        app.poll_load();

        // Render UI (also advances the clock)
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if ticker.poll() {
            info!("scheduled refresh");
            app.request_refresh();
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    ticker.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let startup = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let mut config = Config::load(startup.config_path.as_deref())?;
    startup.apply(&mut config);
    config.validate()?;

    // Logging is best effort; the dashboard works without it
    let _log_guard = match logging::init(startup.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            if startup.once {
                eprintln!("Warning: logging disabled: {}", e);
            }
            None
        }
    };

    let store = open_store(startup.cache_mode);
    let dashboard = Dashboard::from_config(&config, Arc::new(HttpTransport::new()), store);

    if startup.clear_cache {
        if let Err(e) = dashboard.clear_cache() {
            warn!(error = %e, "failed to clear cache");
        }
    }

    if startup.once {
        let snapshot = dashboard.load().await;
        print!("{}", ui::render_snapshot(&snapshot));
        return Ok(());
    }

    run_dashboard(dashboard, config.refresh_interval()).await
}
