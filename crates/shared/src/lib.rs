//! Shared library for the market scraper.
//!
//! This crate provides common functionality used by the scraper crate:
//! - Configuration management
//! - Output data models
//! - Record sinks (JSON files or SQLite)
//! - File path utilities
//! - Logging infrastructure

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod paths;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use logging::LogConfig;
pub use models::*;
pub use paths::DataPaths;
pub use store::{DatabaseSink, JsonFileSink, OutputSink, Sink};

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
