//! Journal sheet normalizer
//!
//! Turns the CSV exports of the transaction, debit and credit sheets into
//! typed records. Rows that cannot be typed are reported one by one and
//! never take part in any sum.

pub mod error;
pub mod types;
pub mod parser;

pub use error::ParseError;
pub use parser::{SheetParser, parse_amount, DATE_FORMAT, MAX_AMOUNT_DIGITS, MAX_AMOUNT_PRECISION};

// Re-export commonly used types
pub use types::{
    RecordKind, Side, TransactionRecord, LedgerLine, DebitLine, CreditLine, Parsed,
};
