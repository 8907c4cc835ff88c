//! tickerboard library
//!
//! Exposes the fetcher, providers and CLI modules for use in integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod fetch;
pub mod logging;
pub mod quote;
pub mod refresh;
pub mod ui;
