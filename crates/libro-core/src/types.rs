//! Basic classification types for the journal and T-accounts

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Double-entry state of a single journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BalanceState {
    /// Debits equal credits and at least one line exists
    Balanced,
    /// Debits and credits differ; `difference` is debits minus credits
    Imbalanced { difference: Decimal },
    /// No debit or credit line refers to the entry
    NoMovement,
}

impl BalanceState {
    /// Classify totals using exact decimal equality
    pub fn classify(total_debit: Decimal, total_credit: Decimal, has_lines: bool) -> Self {
        if !has_lines {
            BalanceState::NoMovement
        } else if total_debit == total_credit {
            BalanceState::Balanced
        } else {
            BalanceState::Imbalanced {
                difference: total_debit - total_credit,
            }
        }
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self, BalanceState::Balanced)
    }
}

impl std::fmt::Display for BalanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceState::Balanced => write!(f, "balanced"),
            BalanceState::Imbalanced { difference } => write!(f, "imbalanced ({})", difference),
            BalanceState::NoMovement => write!(f, "no movement"),
        }
    }
}

/// Sign convention of an account balance (debits minus credits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountClass {
    /// Positive balance
    Debtor,
    /// Negative balance
    Creditor,
    /// Exactly zero
    Zero,
}

impl AccountClass {
    pub fn from_balance(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            AccountClass::Debtor
        } else if balance < Decimal::ZERO {
            AccountClass::Creditor
        } else {
            AccountClass::Zero
        }
    }
}

impl std::fmt::Display for AccountClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountClass::Debtor => write!(f, "debtor"),
            AccountClass::Creditor => write!(f, "creditor"),
            AccountClass::Zero => write!(f, "zero"),
        }
    }
}
