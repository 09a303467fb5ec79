//! Typed records produced by the normalizer

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three sheets a ledger is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Transactions,
    Debits,
    Credits,
}

impl RecordKind {
    /// Number of positional columns a row of this kind carries
    pub fn expected_columns(&self) -> usize {
        match self {
            RecordKind::Transactions => 4,
            RecordKind::Debits | RecordKind::Credits => 5,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Transactions => write!(f, "transactions"),
            RecordKind::Debits => write!(f, "debits"),
            RecordKind::Credits => write!(f, "credits"),
        }
    }
}

/// Side of a journal line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    /// Sheet the lines of this side come from
    pub fn record_kind(&self) -> RecordKind {
        match self {
            Side::Debit => RecordKind::Debits,
            Side::Credit => RecordKind::Credits,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Debit => write!(f, "debit"),
            Side::Credit => write!(f, "credit"),
        }
    }
}

/// Journal entry header: `id, date, sequence, description`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Identifier lines refer to
    pub id: String,
    /// Entry date (sheet format DD/MM/YYYY)
    pub date: NaiveDate,
    /// Sequence number within the journal
    pub sequence: u32,
    /// Free-text description
    pub description: String,
    /// 1-based line in the source export
    pub line: u64,
}

/// A single debit or credit movement:
/// `transactionId, accountCode, amount, resultClassification, typeClassification`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub side: Side,
    /// Parent transaction identifier; not guaranteed to exist
    pub transaction_id: String,
    pub account: String,
    /// Always non-negative
    pub amount: Decimal,
    pub result_class: String,
    pub type_class: String,
    /// 1-based line in the source export
    pub line: u64,
}

/// Line read from the debit sheet
pub type DebitLine = LedgerLine;
/// Line read from the credit sheet
pub type CreditLine = LedgerLine;

/// Outcome of normalizing one sheet: every row that could be typed,
/// plus one error per row that could not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub errors: Vec<crate::ParseError>,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> Parsed<T> {
    /// True when every data row was accepted
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
