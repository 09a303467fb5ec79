//! Transaction join and balance validation

use std::collections::HashMap;

use libro_parser::{LedgerLine, TransactionRecord};
use serde::Serialize;

use crate::models::{DuplicateTransaction, TransactionView};

/// Result of joining lines to their transactions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Journal {
    /// One view per transaction, in sheet order
    pub views: Vec<TransactionView>,
    /// Lines whose transaction id matches no transaction, debits first
    pub orphans: Vec<LedgerLine>,
    /// Identifiers used by more than one transaction row
    pub duplicates: Vec<DuplicateTransaction>,
}

impl Journal {
    pub fn balanced_count(&self) -> usize {
        self.views.iter().filter(|v| v.is_balanced()).count()
    }
}

/// Group lines by transaction id in a single pass, keeping sheet order
/// within each group.
fn index_by_transaction(lines: &[LedgerLine]) -> HashMap<&str, Vec<&LedgerLine>> {
    let mut index: HashMap<&str, Vec<&LedgerLine>> = HashMap::new();
    for line in lines {
        index.entry(line.transaction_id.as_str()).or_default().push(line);
    }
    index
}

fn matched(index: &HashMap<&str, Vec<&LedgerLine>>, id: &str) -> Vec<LedgerLine> {
    index
        .get(id)
        .map(|lines| lines.iter().map(|l| (*l).clone()).collect())
        .unwrap_or_default()
}

/// Join debit and credit lines to their transactions.
///
/// Every transaction row yields one view, even when two rows share an id;
/// such rows see the same lines and are also reported as duplicates.
///
/// Line amounts are expected within `libro_parser::MAX_AMOUNT_DIGITS`, as
/// `SheetParser` guarantees.
pub fn build_journal(
    transactions: &[TransactionRecord],
    debits: &[LedgerLine],
    credits: &[LedgerLine],
) -> Journal {
    let debit_index = index_by_transaction(debits);
    let credit_index = index_by_transaction(credits);

    let mut rows_by_id: HashMap<&str, Vec<u64>> = HashMap::new();
    for transaction in transactions {
        rows_by_id.entry(transaction.id.as_str()).or_default().push(transaction.line);
    }

    let mut duplicates = Vec::new();
    let mut reported: Vec<&str> = Vec::new();
    for transaction in transactions {
        let id = transaction.id.as_str();
        match rows_by_id.get(id) {
            Some(lines) if lines.len() > 1 && !reported.contains(&id) => {
                reported.push(id);
                duplicates.push(DuplicateTransaction {
                    id: id.to_string(),
                    lines: lines.clone(),
                });
            }
            _ => {}
        }
    }

    let views: Vec<TransactionView> = transactions
        .iter()
        .map(|transaction| {
            TransactionView::new(
                transaction.clone(),
                matched(&debit_index, &transaction.id),
                matched(&credit_index, &transaction.id),
            )
        })
        .collect();

    let orphans: Vec<LedgerLine> = debits
        .iter()
        .chain(credits.iter())
        .filter(|line| !rows_by_id.contains_key(line.transaction_id.as_str()))
        .cloned()
        .collect();

    log::debug!(
        target: "libro::journal",
        "Joined {} transactions: {} orphan lines, {} duplicate ids",
        views.len(),
        orphans.len(),
        duplicates.len()
    );

    Journal {
        views,
        orphans,
        duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BalanceState;
    use chrono::NaiveDate;
    use libro_parser::Side;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tx(id: &str, line: u64) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, line as u32).unwrap(),
            sequence: line as u32,
            description: format!("Asiento {}", id),
            line,
        }
    }

    fn line(side: Side, transaction_id: &str, account: &str, amount: Decimal, line: u64) -> LedgerLine {
        LedgerLine {
            side,
            transaction_id: transaction_id.to_string(),
            account: account.to_string(),
            amount,
            result_class: String::new(),
            type_class: String::new(),
            line,
        }
    }

    #[test]
    fn test_balanced_entry() {
        let journal = build_journal(
            &[tx("1", 2)],
            &[line(Side::Debit, "1", "Caja", dec!(100), 2)],
            &[line(Side::Credit, "1", "Capital", dec!(100), 2)],
        );

        let view = &journal.views[0];
        assert_eq!(view.state, BalanceState::Balanced);
        assert_eq!(view.total_debit, dec!(100));
        assert_eq!(view.total_credit, dec!(100));
        assert!(journal.orphans.is_empty());
        assert_eq!(journal.balanced_count(), 1);
    }

    #[test]
    fn test_imbalanced_entry_reports_difference() {
        let journal = build_journal(&[tx("2", 2)], &[line(Side::Debit, "2", "Caja", dec!(80), 2)], &[]);
        assert_eq!(
            journal.views[0].state,
            BalanceState::Imbalanced { difference: dec!(80) }
        );
    }

    #[test]
    fn test_entry_without_lines_has_no_movement() {
        let journal = build_journal(&[tx("3", 2)], &[], &[]);
        assert_eq!(journal.views[0].state, BalanceState::NoMovement);
        assert_eq!(journal.views[0].line_count(), 0);
    }

    #[test]
    fn test_orphans_are_surfaced() {
        let journal = build_journal(
            &[tx("1", 2)],
            &[
                line(Side::Debit, "1", "Caja", dec!(10), 2),
                line(Side::Debit, "99", "Caja", dec!(5), 3),
            ],
            &[
                line(Side::Credit, "1", "Capital", dec!(10), 2),
                line(Side::Credit, "98", "Banco", dec!(7), 3),
            ],
        );

        assert_eq!(journal.views[0].line_count(), 2);
        assert!(journal.views[0].is_balanced());
        let orphan_ids: Vec<&str> = journal.orphans.iter().map(|l| l.transaction_id.as_str()).collect();
        assert_eq!(orphan_ids, vec!["99", "98"]);
        assert_eq!(journal.orphans[0].side, Side::Debit);
    }

    #[test]
    fn test_order_follows_transaction_sheet() {
        let journal = build_journal(
            &[tx("b", 2), tx("a", 3), tx("c", 4)],
            &[line(Side::Debit, "c", "Caja", dec!(1), 2), line(Side::Debit, "a", "Caja", dec!(2), 3)],
            &[],
        );
        let ids: Vec<&str> = journal.views.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_lines_keep_sheet_order_within_entry() {
        let journal = build_journal(
            &[tx("1", 2)],
            &[
                line(Side::Debit, "1", "Mercaderias", dec!(30), 2),
                line(Side::Debit, "2", "Caja", dec!(1), 3),
                line(Side::Debit, "1", "IVA", dec!(6.3), 4),
            ],
            &[line(Side::Credit, "1", "Proveedores", dec!(36.3), 2)],
        );
        let accounts: Vec<&str> = journal.views[0].debits.iter().map(|l| l.account.as_str()).collect();
        assert_eq!(accounts, vec!["Mercaderias", "IVA"]);
        assert!(journal.views[0].is_balanced());
        assert!(journal.views[0].involves_account("Proveedores"));
    }

    #[test]
    fn test_duplicate_ids_are_reported_once() {
        let journal = build_journal(
            &[tx("1", 2), tx("2", 3), tx("1", 4), tx("1", 5)],
            &[line(Side::Debit, "1", "Caja", dec!(50), 2)],
            &[line(Side::Credit, "1", "Ventas", dec!(50), 2)],
        );

        assert_eq!(
            journal.duplicates,
            vec![DuplicateTransaction { id: "1".to_string(), lines: vec![2, 4, 5] }]
        );
        assert_eq!(journal.views.len(), 4);
        assert!(journal.views[2].is_balanced());
        assert!(journal.orphans.is_empty());
    }

    #[test]
    fn test_zero_amount_lines_are_balanced() {
        let journal = build_journal(
            &[tx("1", 2)],
            &[line(Side::Debit, "1", "Caja", Decimal::ZERO, 2)],
            &[line(Side::Credit, "1", "Capital", Decimal::ZERO, 2)],
        );
        assert_eq!(journal.views[0].state, BalanceState::Balanced);
    }
}
