//! CSV normalizer for the journal sheets

use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::OnceCell;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ParseError;
use crate::types::{LedgerLine, Parsed, RecordKind, Side, TransactionRecord};

/// Date format used by the transaction sheet
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Row-oriented parser for spreadsheet CSV exports.
///
/// The first row is always treated as a header and skipped. Blank rows,
/// including rows made only of empty cells, are ignored.
pub struct SheetParser;

impl SheetParser {
    /// Parse the transaction sheet: `id, date, sequence, description`
    pub fn parse_transactions(content: &str) -> Parsed<TransactionRecord> {
        Self::parse_rows(content, RecordKind::Transactions, Self::transaction_from_row)
    }

    /// Parse the debit sheet
    pub fn parse_debits(content: &str) -> Parsed<LedgerLine> {
        Self::parse_lines(content, Side::Debit)
    }

    /// Parse the credit sheet
    pub fn parse_credits(content: &str) -> Parsed<LedgerLine> {
        Self::parse_lines(content, Side::Credit)
    }

    /// Parse a line sheet for the given side
    pub fn parse_lines(content: &str, side: Side) -> Parsed<LedgerLine> {
        Self::parse_rows(content, side.record_kind(), |row, line| {
            Self::line_from_row(row, line, side)
        })
    }

    fn parse_rows<T, F>(content: &str, kind: RecordKind, build: F) -> Parsed<T>
    where
        F: Fn(&StringRecord, u64) -> Result<T, ParseError>,
    {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let mut parsed = Parsed::default();

        for result in reader.records() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    parsed.errors.push(ParseError::Malformed {
                        kind,
                        line,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            // Spreadsheet exports pad the sheet with rows of empty cells
            if row.iter().all(str::is_empty) {
                continue;
            }

            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let record = Self::check_width(&row, kind, line).and_then(|_| build(&row, line));
            match record {
                Ok(record) => parsed.records.push(record),
                Err(e) => parsed.errors.push(e),
            }
        }

        parsed
    }

    /// Rows must carry at least the expected columns; extra columns are
    /// tolerated only when blank.
    fn check_width(row: &StringRecord, kind: RecordKind, line: u64) -> Result<(), ParseError> {
        let expected = kind.expected_columns();
        let extra_blank = row.iter().skip(expected).all(str::is_empty);

        if row.len() < expected || !extra_blank {
            return Err(ParseError::ColumnCount {
                kind,
                line,
                expected,
                found: row.len(),
            });
        }

        Ok(())
    }

    fn transaction_from_row(row: &StringRecord, line: u64) -> Result<TransactionRecord, ParseError> {
        let kind = RecordKind::Transactions;
        let id = required(row, 0, "id", kind, line)?;

        let date_raw = field(row, 1);
        let date = NaiveDate::parse_from_str(date_raw, DATE_FORMAT).map_err(|_| ParseError::InvalidDate {
            kind,
            line,
            value: date_raw.to_string(),
        })?;

        let sequence_raw = field(row, 2);
        let sequence = sequence_raw.parse::<u32>().map_err(|_| ParseError::InvalidSequence {
            kind,
            line,
            value: sequence_raw.to_string(),
        })?;

        Ok(TransactionRecord {
            id,
            date,
            sequence,
            description: field(row, 3).to_string(),
            line,
        })
    }

    fn line_from_row(row: &StringRecord, line: u64, side: Side) -> Result<LedgerLine, ParseError> {
        let kind = side.record_kind();
        let transaction_id = required(row, 0, "transaction id", kind, line)?;
        let account = required(row, 1, "account code", kind, line)?;
        let amount = parse_amount(field(row, 2), kind, line)?;

        Ok(LedgerLine {
            side,
            transaction_id,
            account,
            amount,
            result_class: field(row, 3).to_string(),
            type_class: field(row, 4).to_string(),
            line,
        })
    }
}

/// Integer digits an amount may carry. Sums over any sheet that fits in
/// memory stay inside `Decimal`'s range.
pub const MAX_AMOUNT_DIGITS: usize = 15;

/// Significant digits `Decimal` represents without rounding
pub const MAX_AMOUNT_PRECISION: usize = 28;

static AMOUNT_PATTERN: OnceCell<Regex> = OnceCell::new();

/// Parse a non-negative amount written as plain decimal digits.
///
/// Accepts `[+-]digits[.digits]` only: no exponents, no separators, no
/// rounding of digits that do not fit.
pub fn parse_amount(value: &str, kind: RecordKind, line: u64) -> Result<Decimal, ParseError> {
    let pattern = AMOUNT_PATTERN.get_or_init(|| Regex::new(r"^[+-]?([0-9]+)(?:\.([0-9]+))?$").unwrap());
    let invalid = || ParseError::InvalidAmount {
        kind,
        line,
        value: value.to_string(),
    };

    let caps = pattern.captures(value).ok_or_else(invalid)?;
    let integer_digits = caps.get(1).map_or(0, |m| m.as_str().trim_start_matches('0').len());
    let fraction_digits = caps.get(2).map_or(0, |m| m.as_str().len());

    if integer_digits > MAX_AMOUNT_DIGITS || integer_digits + fraction_digits > MAX_AMOUNT_PRECISION {
        return Err(ParseError::AmountOutOfRange {
            kind,
            line,
            value: value.to_string(),
            max_digits: MAX_AMOUNT_DIGITS,
            max_precision: MAX_AMOUNT_PRECISION,
        });
    }

    let amount = Decimal::from_str(value).map_err(|_| invalid())?;

    if amount < Decimal::ZERO {
        return Err(ParseError::NegativeAmount {
            kind,
            line,
            value: value.to_string(),
        });
    }

    // "-0" is zero, not a negative amount
    Ok(amount.abs())
}

fn field(row: &StringRecord, index: usize) -> &str {
    row.get(index).unwrap_or("")
}

fn required(
    row: &StringRecord,
    index: usize,
    column: &'static str,
    kind: RecordKind,
    line: u64,
) -> Result<String, ParseError> {
    let value = field(row, index);
    if value.is_empty() {
        return Err(ParseError::EmptyField { kind, line, column });
    }
    Ok(value.to_string())
}
