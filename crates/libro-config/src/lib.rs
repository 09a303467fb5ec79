//! Configuration management for libro
//!
//! This module handles loading, validation, and management of
//! libro configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Remote spreadsheet exports the ledger is built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// CSV export of the transaction sheet
    #[serde(default)]
    pub transactions_url: String,
    /// CSV export of the debit line sheet
    #[serde(default)]
    pub debits_url: String,
    /// CSV export of the credit line sheet
    #[serde(default)]
    pub credits_url: String,
    /// User agent sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            transactions_url: String::new(),
            debits_url: String::new(),
            credits_url: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("libro/{}", env!("CARGO_PKG_VERSION"))
}

/// Journal view settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JournalConfig {
    /// Period applied to the journal when the caller gives no range
    #[serde(default)]
    pub default_period: Period,
}

/// Journal period enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Current month
    Month,
    /// Current calendar quarter
    Quarter,
    /// Current year
    Year,
    /// Every transaction
    All,
    /// Caller supplied start and end
    Custom,
}

impl Default for Period {
    fn default() -> Self {
        Period::All
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Month => write!(f, "month"),
            Period::Quarter => write!(f, "quarter"),
            Period::Year => write!(f, "year"),
            Period::All => write!(f, "all"),
            Period::Custom => write!(f, "custom"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Spreadsheet sources
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Journal settings
    #[serde(default)]
    pub journal: JournalConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            },
            _ => ConfigError::Unreadable {
                path: path.to_string_lossy().to_string(),
                message: e.to_string(),
            },
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        let sources = [
            ("sources.transactions_url", &self.sources.transactions_url),
            ("sources.debits_url", &self.sources.debits_url),
            ("sources.credits_url", &self.sources.credits_url),
        ];

        for (field, url) in sources {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingSource {
                    field: field.to_string(),
                });
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidSourceUrl {
                    field: field.to_string(),
                    url: url.clone(),
                });
            }
        }

        if self.sources.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel {
                level: self.logging.level.clone(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
