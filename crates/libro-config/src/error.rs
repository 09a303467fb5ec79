//! Error types for libro-config

use serde::Serialize;
use thiserror::Error;

use crate::LOG_LEVELS;

/// Stable codes for configuration failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigErrorCode {
    FileNotFound,
    Unreadable,
    InvalidYaml,
    MissingSource,
    InvalidSourceUrl,
    EmptyUserAgent,
    InvalidLogLevel,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ConfigErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ConfigErrorCode::Unreadable => "UNREADABLE",
            ConfigErrorCode::InvalidYaml => "INVALID_YAML",
            ConfigErrorCode::MissingSource => "MISSING_SOURCE",
            ConfigErrorCode::InvalidSourceUrl => "INVALID_SOURCE_URL",
            ConfigErrorCode::EmptyUserAgent => "EMPTY_USER_AGENT",
            ConfigErrorCode::InvalidLogLevel => "INVALID_LOG_LEVEL",
        };
        f.write_str(code)
    }
}

/// A configuration failure flattened for display
#[derive(Debug, Clone, Serialize)]
pub struct ConfigErrorDetails {
    pub code: ConfigErrorCode,
    pub message: String,
    /// Config key at fault, e.g. `sources.debits_url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        for suggestion in &self.suggestions {
            write!(f, "\n  - {}", suggestion)?;
        }
        Ok(())
    }
}

/// Why a libro config could not be loaded
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot read config file {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Invalid YAML: {message}")]
    InvalidYaml { message: String },

    #[error("No sheet URL configured for {field}")]
    MissingSource { field: String },

    #[error("{field} is not an http(s) URL: '{url}'")]
    InvalidSourceUrl { field: String, url: String },

    #[error("sources.user_agent must not be empty")]
    EmptyUserAgent,

    #[error("Unknown log level '{level}'")]
    InvalidLogLevel { level: String },
}

impl ConfigError {
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::Unreadable { .. } => ConfigErrorCode::Unreadable,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::MissingSource { .. } => ConfigErrorCode::MissingSource,
            ConfigError::InvalidSourceUrl { .. } => ConfigErrorCode::InvalidSourceUrl,
            ConfigError::EmptyUserAgent => ConfigErrorCode::EmptyUserAgent,
            ConfigError::InvalidLogLevel { .. } => ConfigErrorCode::InvalidLogLevel,
        }
    }

    /// Config key the error points at, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MissingSource { field } | ConfigError::InvalidSourceUrl { field, .. } => {
                Some(field.as_str())
            }
            ConfigError::EmptyUserAgent => Some("sources.user_agent"),
            ConfigError::InvalidLogLevel { .. } => Some("logging.level"),
            _ => None,
        }
    }

    /// How to fix the config, in terms of libro's own keys
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ConfigError::FileNotFound { path } => vec![
                format!("Create {} from the bundled template (Config::generate_default).", path),
            ],
            ConfigError::Unreadable { .. } => vec![
                "Check the file permissions of the config file.".to_string(),
            ],
            ConfigError::InvalidYaml { .. } => vec![
                "Compare the file against the bundled template; sources, journal and logging are mappings.".to_string(),
            ],
            ConfigError::MissingSource { field } => vec![
                format!("Set {} to the CSV export URL of that sheet.", field),
                "All three sheets (transactions, debits, credits) need a URL.".to_string(),
            ],
            ConfigError::InvalidSourceUrl { field, .. } => vec![
                format!("Publish the sheet as CSV and paste its https:// link into {}.", field),
            ],
            ConfigError::EmptyUserAgent => vec![
                "Remove sources.user_agent to use the default libro/<version>.".to_string(),
            ],
            ConfigError::InvalidLogLevel { .. } => vec![
                format!("Set logging.level to one of: {}.", LOG_LEVELS.join(", ")),
            ],
        }
    }

    pub fn to_details(&self) -> ConfigErrorDetails {
        ConfigErrorDetails {
            code: self.code(),
            message: self.to_string(),
            field: self.field().map(str::to_string),
            suggestions: self.suggestions(),
        }
    }
}

/// Result type with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
