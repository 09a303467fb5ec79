//! The outcome of one load: journal, T-accounts and data issues

use libro_parser::LedgerLine;
use serde::Serialize;

use crate::accounts::{filter_accounts, LedgerTotals};
use crate::error::{ErrorSeverity, Issue};
use crate::models::{AccountSummary, TransactionView};
use crate::time::{filter_journal, DateRange};

/// Everything derived from one set of sheets
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerReport {
    /// One view per transaction, in sheet order
    pub journal: Vec<TransactionView>,
    /// T-accounts sorted by account code
    pub accounts: Vec<AccountSummary>,
    /// Trial balance footer
    pub totals: LedgerTotals,
    /// Rejected rows, orphan lines, duplicates and imbalances
    pub issues: Vec<Issue>,
}

impl LedgerReport {
    /// Journal narrowed to a date range
    pub fn journal_in(&self, range: &DateRange) -> Vec<&TransactionView> {
        filter_journal(&self.journal, range)
    }

    /// Accounts whose code contains `query`, ignoring case
    pub fn search_accounts(&self, query: &str) -> Vec<&AccountSummary> {
        filter_accounts(&self.accounts, query)
    }

    /// Look up a single account by exact code
    pub fn account(&self, code: &str) -> Option<&AccountSummary> {
        self.accounts
            .binary_search_by(|a| a.account.as_str().cmp(code))
            .ok()
            .map(|i| &self.accounts[i])
    }

    /// Lines that reference no transaction
    pub fn orphans(&self) -> impl Iterator<Item = &LedgerLine> {
        self.issues.iter().filter_map(|issue| match issue {
            Issue::OrphanReference(line) => Some(line),
            _ => None,
        })
    }

    /// Issues at or above a severity
    pub fn issues_at_least(&self, severity: ErrorSeverity) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.severity() >= severity).collect()
    }

    /// True when no row was rejected
    pub fn is_clean(&self) -> bool {
        self.issues_at_least(ErrorSeverity::Error).is_empty()
    }
}
