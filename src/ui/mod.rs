//! UI rendering module for tickerboard
//!
//! Terminal screens use ratatui; `--once` output goes through the plain-text
//! renderer. Both share the formatting in [`format`].

pub mod dashboard;
pub mod format;
pub mod help_overlay;
pub mod text;

pub use dashboard::{render as render_dashboard, render_loading};
pub use help_overlay::render as render_help_overlay;
pub use text::render_snapshot;
