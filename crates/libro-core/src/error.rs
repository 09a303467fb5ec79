//! Error types for libro-core
//!
//! Fatal load failures are `CoreError`s. Everything the engine finds in the
//! data itself (rejected rows, orphan lines, imbalanced entries) is an
//! `Issue` returned alongside the report.

use libro_config::ConfigError;
use libro_parser::{LedgerLine, ParseError, RecordKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DuplicateTransaction;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A sheet could not be fetched
    IngestionError,
    /// Invalid configuration
    ConfigError,
    /// A row could not be typed
    ParseError,
    /// A line refers to an unknown transaction
    OrphanReference,
    /// Debits and credits of an entry differ
    Imbalance,
    /// Duplicate entry
    DuplicateEntry,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::IngestionError => write!(f, "INGESTION_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::OrphanReference => write!(f, "ORPHAN_REFERENCE"),
            ErrorCode::Imbalance => write!(f, "IMBALANCE"),
            ErrorCode::DuplicateEntry => write!(f, "DUPLICATE_ENTRY"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - shown with the data, nothing is dropped
    Warning,
    /// Error - a record was left out
    Error,
    /// Critical - nothing could be produced
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Detailed error information for the display layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

// ==================== Transport ====================

/// Failure to obtain the text of one sheet
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("unreadable body: {0}")]
    Body(String),

    #[error("sheet not available: {0}")]
    Unavailable(String),
}

/// A fetch failure tagged with the sheet it belongs to
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{kind}: {error}")]
pub struct FetchFailure {
    pub kind: RecordKind,
    pub error: FetchError,
}

fn join_failures(failures: &[FetchFailure]) -> String {
    failures.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("; ")
}

// ==================== Core error ====================

/// Main error type for libro-core
#[derive(Error, Debug)]
pub enum CoreError {
    /// One or more sheets could not be fetched; no report is produced
    #[error("Ingestion failed: {}", join_failures(.failures))]
    Ingestion { failures: Vec<FetchFailure> },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Ingestion { .. } => ErrorCode::IngestionError,
            CoreError::Config(_) => ErrorCode::ConfigError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Ingestion { .. } => ErrorSeverity::Error,
            CoreError::Config(_) => ErrorSeverity::Critical,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Ingestion { failures } => {
                details = details.with_detail(serde_json::json!({ "failures": failures }));
                details = details.with_suggestion(
                    "Check that every sheet is published as CSV and reachable.".to_string()
                );
                details = details.with_suggestion(
                    "Reload to retry; partial results are never shown.".to_string()
                );
            }
            CoreError::Config(error) => {
                let config = error.to_details();
                if let Some(field) = config.field {
                    details = details.with_detail(serde_json::json!({ "field": field }));
                }
                for suggestion in config.suggestions {
                    details = details.with_suggestion(suggestion);
                }
            }
            CoreError::InternalError { .. } => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Data issues ====================

/// A problem found in the data of a successful load
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", content = "detail", rename_all = "snake_case")]
pub enum Issue {
    /// A row was rejected by the normalizer
    Parse(ParseError),
    /// A line whose transaction id matches no transaction.
    /// It is left out of the journal but still counted in its account.
    OrphanReference(LedgerLine),
    /// An entry whose debits and credits differ
    Imbalance {
        transaction_id: String,
        line: u64,
        difference: Decimal,
    },
    /// Several transaction rows share one identifier
    DuplicateTransaction(DuplicateTransaction),
}

impl Issue {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Issue::Parse(_) => ErrorCode::ParseError,
            Issue::OrphanReference(_) => ErrorCode::OrphanReference,
            Issue::Imbalance { .. } => ErrorCode::Imbalance,
            Issue::DuplicateTransaction(_) => ErrorCode::DuplicateEntry,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Issue::Parse(_) => ErrorSeverity::Error,
            Issue::OrphanReference(_) => ErrorSeverity::Warning,
            Issue::Imbalance { .. } => ErrorSeverity::Warning,
            Issue::DuplicateTransaction(_) => ErrorSeverity::Warning,
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::Parse(error) => write!(f, "{}", error),
            Issue::OrphanReference(line) => write!(
                f,
                "{} line {}: {} of {} to '{}' references unknown transaction '{}'",
                line.side.record_kind(),
                line.line,
                line.side,
                line.amount,
                line.account,
                line.transaction_id
            ),
            Issue::Imbalance { transaction_id, line, difference } => write!(
                f,
                "transactions line {}: entry '{}' is off by {}",
                line, transaction_id, difference
            ),
            Issue::DuplicateTransaction(duplicate) => write!(
                f,
                "transaction id '{}' used on lines {:?}",
                duplicate.id, duplicate.lines
            ),
        }
    }
}

/// Issue logger trait
pub trait IssueLogger: Send + Sync {
    /// Log a data issue
    fn log_issue(&self, issue: &Issue);
    /// Log a fatal error
    fn log_error(&self, error: &CoreError);
}

/// Default issue logger using log crate
#[derive(Debug, Default)]
pub struct DefaultIssueLogger;

impl IssueLogger for DefaultIssueLogger {
    fn log_issue(&self, issue: &Issue) {
        match issue.severity() {
            ErrorSeverity::Info => log::info!(target: "libro::issues", "[{}] {}", issue.code(), issue),
            ErrorSeverity::Warning => log::warn!(target: "libro::issues", "[{}] {}", issue.code(), issue),
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                log::error!(target: "libro::issues", "[{}] {}", issue.code(), issue)
            }
        }
    }

    fn log_error(&self, error: &CoreError) {
        log::error!(
            target: "libro::error",
            "ERROR [{}] {}",
            error.code(),
            error.to_details()
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use libro_parser::Side;
    use rust_decimal_macros::dec;

    fn orphan() -> LedgerLine {
        LedgerLine {
            side: Side::Debit,
            transaction_id: "99".to_string(),
            account: "Caja".to_string(),
            amount: dec!(100),
            result_class: String::new(),
            type_class: String::new(),
            line: 4,
        }
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::IngestionError.to_string(), "INGESTION_ERROR");
        assert_eq!(ErrorCode::OrphanReference.to_string(), "ORPHAN_REFERENCE");
        assert_eq!(ErrorCode::ParseError.to_string(), "PARSE_ERROR");
    }

    #[test]
    fn test_error_severity_order() {
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_ingestion_error_lists_every_failure() {
        let error = CoreError::Ingestion {
            failures: vec![
                FetchFailure {
                    kind: RecordKind::Debits,
                    error: FetchError::Http { status: 404, body: "Not Found".to_string() },
                },
                FetchFailure {
                    kind: RecordKind::Credits,
                    error: FetchError::Network("connection refused".to_string()),
                },
            ],
        };

        let message = error.to_string();
        assert!(message.contains("debits: HTTP 404"));
        assert!(message.contains("credits: network error"));
        assert_eq!(error.code(), ErrorCode::IngestionError);

        let details = error.to_details();
        assert!(details.details.is_some());
        assert_eq!(details.suggestions.len(), 2);
    }

    #[test]
    fn test_config_error_conversion() {
        let error: CoreError = ConfigError::MissingSource {
            field: "sources.debits_url".to_string(),
        }
        .into();
        assert_eq!(error.code(), ErrorCode::ConfigError);
        assert_eq!(error.severity(), ErrorSeverity::Critical);

        let details = error.to_details();
        assert_eq!(details.details, Some(serde_json::json!({ "field": "sources.debits_url" })));
        assert_eq!(details.suggestions.len(), 2);
    }

    #[test]
    fn test_issue_codes_and_severity() {
        let issue = Issue::OrphanReference(orphan());
        assert_eq!(issue.code(), ErrorCode::OrphanReference);
        assert_eq!(issue.severity(), ErrorSeverity::Warning);
        assert_eq!(
            issue.to_string(),
            "debits line 4: debit of 100 to 'Caja' references unknown transaction '99'"
        );

        let issue = Issue::Parse(ParseError::InvalidAmount {
            kind: RecordKind::Credits,
            line: 7,
            value: "abc".to_string(),
        });
        assert_eq!(issue.severity(), ErrorSeverity::Error);
        assert_eq!(issue.to_string(), "credits line 7: invalid amount 'abc'");
    }

    #[test]
    fn test_issue_serializes_with_tag() {
        let issue = Issue::Imbalance {
            transaction_id: "2".to_string(),
            line: 3,
            difference: dec!(80),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["issue"], "imbalance");
        assert_eq!(json["detail"]["transaction_id"], "2");
    }
}
