//! T-account aggregation
//!
//! Rolls every debit and credit line into per-account totals, independent
//! of whether the line's transaction exists. Output is ordered by account
//! code using byte-wise (case-sensitive) comparison.

use std::collections::BTreeMap;

use libro_parser::LedgerLine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AccountSummary, Movement};
use crate::types::AccountClass;

#[derive(Debug, Default)]
struct Accumulator {
    debit_total: Decimal,
    credit_total: Decimal,
    balance: Decimal,
    debits: Vec<Movement>,
    credits: Vec<Movement>,
}

impl Accumulator {
    fn into_summary(self, account: &str) -> AccountSummary {
        AccountSummary {
            account: account.to_string(),
            debit_total: self.debit_total,
            credit_total: self.credit_total,
            balance: self.balance,
            class: AccountClass::from_balance(self.balance),
            debits: self.debits,
            credits: self.credits,
        }
    }
}

/// Aggregate debit and credit lines into one summary per account code.
///
/// Amounts are bounded as `SheetParser` produces them (see
/// `libro_parser::MAX_AMOUNT_DIGITS`), so the running totals cannot overflow.
pub fn aggregate_accounts(debits: &[LedgerLine], credits: &[LedgerLine]) -> Vec<AccountSummary> {
    let mut accounts: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for line in debits {
        let acc = accounts.entry(line.account.as_str()).or_default();
        acc.debit_total += line.amount;
        acc.balance += line.amount;
        acc.debits.push(Movement::from(line));
    }

    for line in credits {
        let acc = accounts.entry(line.account.as_str()).or_default();
        acc.credit_total += line.amount;
        acc.balance -= line.amount;
        acc.credits.push(Movement::from(line));
    }

    let summaries: Vec<AccountSummary> = accounts
        .into_iter()
        .map(|(account, acc)| acc.into_summary(account))
        .collect();

    log::debug!(
        target: "libro::accounts",
        "Aggregated {} debit and {} credit lines into {} accounts",
        debits.len(),
        credits.len(),
        summaries.len()
    );

    summaries
}

/// Case-insensitive substring filter over account codes.
///
/// A blank query keeps every account. The input is never re-aggregated.
pub fn filter_accounts<'a>(accounts: &'a [AccountSummary], query: &str) -> Vec<&'a AccountSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return accounts.iter().collect();
    }

    accounts
        .iter()
        .filter(|a| a.account.to_lowercase().contains(&needle))
        .collect()
}

/// Footer totals of the trial balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub total_debits: Decimal,
    pub total_credits: Decimal,
    /// Sum of every account balance
    pub total_balance: Decimal,
    pub account_count: usize,
}

impl LedgerTotals {
    pub fn from_accounts(accounts: &[AccountSummary]) -> Self {
        accounts.iter().fold(Self::default(), |mut totals, account| {
            totals.total_debits += account.debit_total;
            totals.total_credits += account.credit_total;
            totals.total_balance += account.balance;
            totals.account_count += 1;
            totals
        })
    }

    /// Total debits minus total credits
    pub fn difference(&self) -> Decimal {
        self.total_debits - self.total_credits
    }

    /// The sum of balances must equal debits minus credits
    pub fn is_consistent(&self) -> bool {
        self.total_balance == self.difference()
    }

    /// Debits and credits of the whole ledger match
    pub fn is_balanced(&self) -> bool {
        self.total_debits == self.total_credits
    }
}
