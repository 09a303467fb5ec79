//! Derived journal and T-account models

use chrono::NaiveDate;
use libro_parser::{LedgerLine, TransactionRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AccountClass, BalanceState};

/// A journal entry with the lines that refer to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    /// Entry header
    pub transaction: TransactionRecord,
    /// Debit lines keyed to this entry, in sheet order
    pub debits: Vec<LedgerLine>,
    /// Credit lines keyed to this entry, in sheet order
    pub credits: Vec<LedgerLine>,
    /// Sum of debit amounts
    pub total_debit: Decimal,
    /// Sum of credit amounts
    pub total_credit: Decimal,
    /// Double-entry state
    pub state: BalanceState,
}

impl TransactionView {
    /// Build a view and compute its totals and state
    pub fn new(transaction: TransactionRecord, debits: Vec<LedgerLine>, credits: Vec<LedgerLine>) -> Self {
        let total_debit: Decimal = debits.iter().map(|l| l.amount).sum();
        let total_credit: Decimal = credits.iter().map(|l| l.amount).sum();
        let has_lines = !debits.is_empty() || !credits.is_empty();

        Self {
            transaction,
            debits,
            credits,
            total_debit,
            total_credit,
            state: BalanceState::classify(total_debit, total_credit, has_lines),
        }
    }

    pub fn id(&self) -> &str {
        &self.transaction.id
    }

    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }

    pub fn is_balanced(&self) -> bool {
        self.state.is_balanced()
    }

    pub fn line_count(&self) -> usize {
        self.debits.len() + self.credits.len()
    }

    /// Check if any line of this entry moves the given account
    pub fn involves_account(&self, account: &str) -> bool {
        self.debits.iter().chain(self.credits.iter()).any(|l| l.account == account)
    }
}

/// One side of a T-account: a single amount and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub transaction_id: String,
    pub amount: Decimal,
    /// 1-based line in the source sheet
    pub line: u64,
}

impl From<&LedgerLine> for Movement {
    fn from(line: &LedgerLine) -> Self {
        Self {
            transaction_id: line.transaction_id.clone(),
            amount: line.amount,
            line: line.line,
        }
    }
}

/// T-account summary for one account code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account code as written in the sheets
    pub account: String,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    /// Debits minus credits
    pub balance: Decimal,
    pub class: AccountClass,
    /// Debit movements in sheet order
    pub debits: Vec<Movement>,
    /// Credit movements in sheet order
    pub credits: Vec<Movement>,
}

impl AccountSummary {
    pub fn movement_count(&self) -> usize {
        self.debits.len() + self.credits.len()
    }

    /// Balance without sign, as shown next to its class
    pub fn balance_abs(&self) -> Decimal {
        self.balance.abs()
    }
}

/// A transaction identifier that appears on more than one sheet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateTransaction {
    pub id: String,
    /// Lines of every row carrying the identifier
    pub lines: Vec<u64>,
}
