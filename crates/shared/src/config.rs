//! Configuration management for the market scraper.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use crate::models::{SourceRef, WalkerKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Database settings
    pub database: DatabaseConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Scraped site identity
    pub source: SourceConfig,

    /// Upstream API settings
    pub api: ApiConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Events scraped by the binary, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetConfig>,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path (relative to data directory or absolute)
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Identity of the scraped site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source name, used in merge keys and output file names
    pub name: String,

    /// Source id
    pub id: String,

    /// Base URL canonical match links are built on
    pub home_link: String,
}

impl SourceConfig {
    pub fn source_ref(&self) -> SourceRef {
        SourceRef {
            name: self.name.clone(),
            id: self.id.clone(),
        }
    }
}

/// Upstream API configuration
///
/// URL templates use `{event_id}`, `{competition_id}`, `{match_id}` and
/// `{group_id}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Event listing holding matches directly (`{"events": [...]}`)
    pub event_url: String,

    /// Event listing holding competitions (`[...]`)
    pub event_competitions_url: String,

    /// Matches of one competition
    pub competition_events_url: String,

    /// Match detail
    pub match_url: String,

    /// Detail groups of one match
    pub group_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Fixed request headers
    pub headers: HeaderConfig,
}

/// Header set sent with every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    pub authority: String,
    pub accept: String,
    pub content_type: String,
    pub referer: String,
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write JSON files instead of database rows
    pub developer_testing: bool,

    /// JSON output directory (relative to data directory or absolute)
    pub testing_dir: String,

    /// Hours added to the local kickoff time
    pub kickoff_offset_hours: i64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            developer_testing: false,
            testing_dir: "testing_data".to_string(),
            kickoff_offset_hours: 0,
        }
    }
}

/// One event to scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Sport/source tag, e.g. `soccer`
    pub source_type: String,

    /// Upstream event id
    pub event_id: u64,

    /// Listing layout of the event
    #[serde(default = "default_walker")]
    pub walker: WalkerKind,
}

fn default_walker() -> WalkerKind {
    WalkerKind::Direct
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            database: DatabaseConfig {
                path: "markets.db".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            source: SourceConfig {
                name: "example".to_string(),
                id: "123".to_string(),
                home_link: "https://www.example.com".to_string(),
            },
            api: ApiConfig {
                event_url: "https://www.example.com/Competitions/{event_id}?displayType=default"
                    .to_string(),
                event_competitions_url: "https://www.example.com/{event_id}/?displayType=default"
                    .to_string(),
                competition_events_url:
                    "https://www.example.com/Competitions/{competition_id}/Events?displayType=default"
                        .to_string(),
                match_url: "https://www.example.com/Events/{match_id}/?displayWinnersPriceMkt=true"
                    .to_string(),
                group_url: "https://www.example.com/Events/{match_id}/{group_id}".to_string(),
                timeout_secs: 30,
                headers: HeaderConfig {
                    authority: "www.example.com".to_string(),
                    accept: "application/json".to_string(),
                    content_type: "application/json".to_string(),
                    referer: "https://www.example.com".to_string(),
                    user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/102.0.0.0 Safari/537.36".to_string(),
                },
            },
            output: OutputConfig::default(),
            targets: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            targets = config.targets.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the absolute path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the database file
    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.database.path)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the absolute path for test-mode JSON output
    pub fn testing_dir(&self) -> PathBuf {
        self.resolve(&self.output.testing_dir)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}
