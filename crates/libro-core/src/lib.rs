//! Core journal processing
//!
//! Builds a double-entry journal and its T-accounts from the three sheet
//! exports (transactions, debit lines, credit lines).

pub mod accounts;
pub mod error;
pub mod journal;
pub mod models;
pub mod reports;
pub mod source;
pub mod time;
pub mod types;

use chrono::NaiveDate;
use libro_config::Config;
use libro_parser::{RecordKind, SheetParser};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use accounts::{aggregate_accounts, filter_accounts, LedgerTotals};
pub use error::{
    CoreError, CoreResult, DefaultIssueLogger, ErrorCode, ErrorDetails, ErrorSeverity,
    FetchError, FetchFailure, Issue, IssueLogger,
};
pub use journal::{build_journal, Journal};
pub use models::{AccountSummary, DuplicateTransaction, Movement, TransactionView};
pub use reports::LedgerReport;
pub use source::{HttpSheetSource, SheetSource, SourceRef, StaticSheetSource};
pub use time::{filter_journal, DateFilter, DateRange};
pub use types::{AccountClass, BalanceState};

/// Raw CSV text of the three sheets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLedger {
    pub transactions: String,
    pub debits: String,
    pub credits: String,
}

/// Build the journal and T-accounts from raw sheet text.
///
/// Pure: rows that cannot be typed, orphan lines, duplicate identifiers and
/// imbalanced entries end up in `issues`, never in a panic.
pub fn build_report(raw: &RawLedger) -> LedgerReport {
    let transactions = SheetParser::parse_transactions(&raw.transactions);
    let debits = SheetParser::parse_debits(&raw.debits);
    let credits = SheetParser::parse_credits(&raw.credits);

    let mut issues: Vec<Issue> = transactions
        .errors
        .iter()
        .chain(debits.errors.iter())
        .chain(credits.errors.iter())
        .cloned()
        .map(Issue::Parse)
        .collect();

    // Journal and accounts read the same immutable records and share nothing else
    let journal = build_journal(&transactions.records, &debits.records, &credits.records);
    let accounts = aggregate_accounts(&debits.records, &credits.records);
    let totals = LedgerTotals::from_accounts(&accounts);

    issues.extend(journal.orphans.into_iter().map(Issue::OrphanReference));
    issues.extend(journal.duplicates.into_iter().map(Issue::DuplicateTransaction));
    issues.extend(journal.views.iter().filter_map(|view| match view.state {
        BalanceState::Imbalanced { difference } => Some(Issue::Imbalance {
            transaction_id: view.transaction.id.clone(),
            line: view.transaction.line,
            difference,
        }),
        _ => None,
    }));

    LedgerReport {
        journal: journal.views,
        accounts,
        totals,
        issues,
    }
}

/// Loads the sheets from a source and builds a fresh report on every call
pub struct Ledger {
    config: Config,
    source: SourceRef,
    logger: Arc<dyn IssueLogger>,
}

impl Ledger {
    /// Create a new ledger with config and source
    pub fn new(config: Config, source: SourceRef) -> Self {
        Self {
            config,
            source,
            logger: Arc::new(DefaultIssueLogger),
        }
    }

    /// Validate the config and fetch from its URLs over HTTP
    pub fn from_config(config: Config) -> CoreResult<Self> {
        config.validate()?;
        let source = HttpSheetSource::new(&config.sources)?;
        Ok(Self::new(config, Arc::new(source)))
    }

    /// Replace the issue logger
    pub fn with_logger(mut self, logger: Arc<dyn IssueLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Journal range for the configured default period
    pub fn default_range(&self, today: NaiveDate) -> DateRange {
        let period = self.config.journal.default_period;
        let range = DateRange::for_period(period, today);
        log::debug!(target: "libro::ledger", "Default period {}: {}", period, range.description());
        range
    }

    /// Fetch the three sheets concurrently and wait for all of them.
    ///
    /// Any failure aborts the load with every failure listed.
    pub async fn fetch_all(&self) -> CoreResult<RawLedger> {
        let (transactions, debits, credits) = tokio::join!(
            self.source.fetch(RecordKind::Transactions),
            self.source.fetch(RecordKind::Debits),
            self.source.fetch(RecordKind::Credits),
        );

        match (transactions, debits, credits) {
            (Ok(transactions), Ok(debits), Ok(credits)) => Ok(RawLedger {
                transactions,
                debits,
                credits,
            }),
            (transactions, debits, credits) => {
                let failures = [
                    (RecordKind::Transactions, transactions.err()),
                    (RecordKind::Debits, debits.err()),
                    (RecordKind::Credits, credits.err()),
                ]
                .into_iter()
                .filter_map(|(kind, error)| error.map(|error| FetchFailure { kind, error }))
                .collect();

                Err(CoreError::Ingestion { failures })
            }
        }
    }

    /// Fetch and build a report
    pub async fn load(&self) -> CoreResult<LedgerReport> {
        let raw = match self.fetch_all().await {
            Ok(raw) => raw,
            Err(e) => {
                self.logger.log_error(&e);
                return Err(e);
            }
        };

        let report = build_report(&raw);
        for issue in &report.issues {
            self.logger.log_issue(issue);
        }

        log::info!(
            target: "libro::ledger",
            "Loaded {} transactions, {} accounts, {} issues",
            report.journal.len(),
            report.accounts.len(),
            report.issues.len()
        );

        Ok(report)
    }
}

// ==================== Tests ====================
