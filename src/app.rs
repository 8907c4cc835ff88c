//! Application state management for tickerboard
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, and the transition from the loading screen to the dashboard.
//! Loads run on a spawned task and report back over a channel, so the main
//! loop keeps drawing and reading keys while requests are in flight.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tracing::debug;

use crate::dashboard::{Dashboard, Snapshot};

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching data
    Loading,
    /// Quote panels
    Dashboard,
}

/// Work requested by a key press, performed by the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Reload through the cache
    Refresh,
    /// Empty the cache, then reload
    ClearAndReload,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Most recent load result
    pub snapshot: Option<Snapshot>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Action to run on the next loop iteration
    pub pending: Option<PendingAction>,
    /// Whether a load is currently running
    pub loading: bool,
    dashboard: Dashboard,
    /// Finished loads, sent by the spawned load task
    loaded_tx: mpsc::Sender<Snapshot>,
    loaded_rx: mpsc::Receiver<Snapshot>,
}

impl App {
    /// Creates a new App in the loading state
    pub fn new(dashboard: Dashboard) -> Self {
        let (loaded_tx, loaded_rx) = mpsc::channel(1);
        Self {
            state: AppState::Loading,
            snapshot: None,
            should_quit: false,
            show_help: false,
            pending: None,
            loading: false,
            dashboard,
            loaded_tx,
            loaded_rx,
        }
    }

    /// Time of the last completed load
    pub fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.snapshot.as_ref().map(|s| s.refreshed_at)
    }

    /// Spawns the queued action unless a load is already running
    ///
    /// Must be called from within a tokio runtime. Returns whether a load
    /// was started; a queued action waits for the running load to finish.
    pub fn start_pending(&mut self) -> bool {
        if self.loading {
            return false;
        }
        let Some(action) = self.pending.take() else {
            return false;
        };

        debug!(?action, "starting load");
        self.loading = true;
        let dashboard = self.dashboard.clone();
        let loaded_tx = self.loaded_tx.clone();
        tokio::spawn(async move {
            let snapshot = match action {
                PendingAction::Refresh => dashboard.load().await,
                PendingAction::ClearAndReload => dashboard.clear_and_reload().await,
            };
            let _ = loaded_tx.send(snapshot).await;
        });
        true
    }

    /// Applies a finished load without blocking; returns whether one arrived
    pub fn poll_load(&mut self) -> bool {
        match self.loaded_rx.try_recv() {
            Ok(snapshot) => {
                self.finish_load(snapshot);
                true
            }
            Err(_) => false,
        }
    }

    /// Queues a refresh unless a stronger action is already queued
    pub fn request_refresh(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(PendingAction::Refresh);
        }
    }

    fn finish_load(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        self.loading = false;
        self.state = AppState::Dashboard;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `r`: Refresh (served from cache while fresh)
    /// - `c`: Clear the cache and reload
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {} // Ignore other keys when help is shown
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Dashboard => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('r') => {
                    self.request_refresh();
                }
                KeyCode::Char('c') => {
                    self.pending = Some(PendingAction::ClearAndReload);
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }
}
