//! Error types for libro-parser

use serde::Serialize;
use thiserror::Error;

use crate::types::RecordKind;

/// A row that could not be turned into a typed record.
///
/// Every variant carries the sheet it came from and its 1-based line.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParseError {
    #[error("{kind} line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        kind: RecordKind,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{kind} line {line}: empty {column}")]
    EmptyField {
        kind: RecordKind,
        line: u64,
        column: &'static str,
    },

    #[error("{kind} line {line}: invalid amount '{value}'")]
    InvalidAmount {
        kind: RecordKind,
        line: u64,
        value: String,
    },

    #[error("{kind} line {line}: negative amount '{value}'")]
    NegativeAmount {
        kind: RecordKind,
        line: u64,
        value: String,
    },

    #[error("{kind} line {line}: amount '{value}' exceeds {max_digits} integer digits or {max_precision} significant digits")]
    AmountOutOfRange {
        kind: RecordKind,
        line: u64,
        value: String,
        max_digits: usize,
        max_precision: usize,
    },

    #[error("{kind} line {line}: invalid date '{value}', expected DD/MM/YYYY")]
    InvalidDate {
        kind: RecordKind,
        line: u64,
        value: String,
    },

    #[error("{kind} line {line}: invalid sequence number '{value}'")]
    InvalidSequence {
        kind: RecordKind,
        line: u64,
        value: String,
    },

    #[error("{kind} line {line}: malformed row: {message}")]
    Malformed {
        kind: RecordKind,
        line: u64,
        message: String,
    },
}

impl ParseError {
    /// Sheet the rejected row belongs to
    pub fn kind(&self) -> RecordKind {
        match self {
            ParseError::ColumnCount { kind, .. }
            | ParseError::EmptyField { kind, .. }
            | ParseError::InvalidAmount { kind, .. }
            | ParseError::NegativeAmount { kind, .. }
            | ParseError::AmountOutOfRange { kind, .. }
            | ParseError::InvalidDate { kind, .. }
            | ParseError::InvalidSequence { kind, .. }
            | ParseError::Malformed { kind, .. } => *kind,
        }
    }

    /// 1-based line of the rejected row
    pub fn line(&self) -> u64 {
        match self {
            ParseError::ColumnCount { line, .. }
            | ParseError::EmptyField { line, .. }
            | ParseError::InvalidAmount { line, .. }
            | ParseError::NegativeAmount { line, .. }
            | ParseError::AmountOutOfRange { line, .. }
            | ParseError::InvalidDate { line, .. }
            | ParseError::InvalidSequence { line, .. }
            | ParseError::Malformed { line, .. } => *line,
        }
    }
}
