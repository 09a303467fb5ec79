use std::sync::Arc;

use chrono::NaiveDate;
use libro::{
    build_report, AccountClass, BalanceState, CoreError, DateRange, ErrorCode, FetchError, Ledger,
    LoggingConfig, RawLedger, RecordKind, StaticSheetSource,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TRANSACTIONS: &str = "id,FECHA,numero,descripcion\r\n\
    1,02/01/2024,1,Aporte de capital\r\n\
    2,15/01/2024,2,Compra de mercaderias\r\n\
    3,03/02/2024,3,Venta al contado\r\n\
    ,,,\r\n";

const DEBITS: &str = "IDDEBE,CUENTAD,CANTIDADD,RESULTADOD,TIPOD\r\n\
    1,Caja,100,Patrimonial,Activo\r\n\
    2,Mercaderias,80,Patrimonial,Activo\r\n\
    3,Caja,50,Patrimonial,Activo\r\n\
    99,Caja,5,Patrimonial,Activo\r\n";

const CREDITS: &str = "IDHABER,CUENTAH,CANTIDADH,RESULTADOH,TIPOH\r\n\
    1,Capital,100,Patrimonial,Patrimonio Neto\r\n\
    3,Ventas,50,Resultado,Ingreso\r\n\
    3,Caja,30,Patrimonial,Activo\r\n";

fn raw() -> RawLedger {
    RawLedger {
        transactions: TRANSACTIONS.to_string(),
        debits: DEBITS.to_string(),
        credits: CREDITS.to_string(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn journal_states_follow_line_totals() {
    let report = build_report(&raw());

    let states: Vec<(&str, BalanceState)> = report.journal.iter().map(|v| (v.id(), v.state)).collect();
    assert_eq!(
        states,
        vec![
            ("1", BalanceState::Balanced),
            ("2", BalanceState::Imbalanced { difference: dec!(80) }),
            ("3", BalanceState::Imbalanced { difference: dec!(-30) }),
        ]
    );
    assert_eq!(report.journal[0].total_debit, dec!(100));
    assert_eq!(report.journal[0].total_credit, dec!(100));
}

#[test]
fn orphan_line_counts_in_account_but_not_in_journal() {
    let report = build_report(&raw());

    let journal_lines: usize = report.journal.iter().map(|v| v.line_count()).sum();
    assert_eq!(journal_lines, 6);

    let orphan_ids: Vec<&str> = report.orphans().map(|l| l.transaction_id.as_str()).collect();
    assert_eq!(orphan_ids, vec!["99"]);
    assert!(report.issues.iter().any(|i| i.code() == ErrorCode::OrphanReference));

    let caja = report.account("Caja").unwrap();
    assert_eq!(caja.debit_total, dec!(155));
    assert_eq!(caja.credit_total, dec!(30));
    assert_eq!(caja.balance, dec!(125));
    assert_eq!(caja.class, AccountClass::Debtor);
}

#[test]
fn sum_of_balances_equals_debits_minus_credits() {
    let report = build_report(&raw());

    let balances: Decimal = report.accounts.iter().map(|a| a.balance).sum();
    assert_eq!(balances, dec!(235) - dec!(180));
    assert_eq!(report.totals.total_balance, balances);
    assert!(report.totals.is_consistent());

    let ventas = report.account("Ventas").unwrap();
    assert_eq!(ventas.class, AccountClass::Creditor);
}

#[test]
fn filters_work_on_computed_output() {
    let report = build_report(&raw());

    let january = report.journal_in(&DateRange::between(date(2024, 1, 1), date(2024, 1, 31)));
    let ids: Vec<&str> = january.iter().map(|v| v.id()).collect();
    assert_eq!(ids, vec!["1", "2"]);

    let accounts: Vec<&str> = report.search_accounts("CA").iter().map(|a| a.account.as_str()).collect();
    assert_eq!(accounts, vec!["Caja", "Capital", "Mercaderias"]);
    assert_eq!(report.accounts.len(), 4);
}

#[tokio::test]
async fn load_joins_all_sheets_before_building() {
    libro::init_logging(&LoggingConfig::default());

    let source = StaticSheetSource::new()
        .with_sheet(RecordKind::Transactions, TRANSACTIONS)
        .with_sheet(RecordKind::Debits, DEBITS)
        .with_sheet(RecordKind::Credits, CREDITS);
    let ledger = Ledger::new(libro::Config::default(), Arc::new(source));

    let first = ledger.load().await.unwrap();
    let second = ledger.load().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, build_report(&raw()));
}

#[tokio::test]
async fn failed_fetch_yields_no_report() {
    let source = StaticSheetSource::new()
        .with_failure(RecordKind::Transactions, FetchError::Network("timed out".to_string()))
        .with_sheet(RecordKind::Debits, DEBITS)
        .with_sheet(RecordKind::Credits, CREDITS);
    let ledger = Ledger::new(libro::Config::default(), Arc::new(source));

    let error = ledger.load().await.unwrap_err();
    assert_eq!(error.code(), ErrorCode::IngestionError);
    match error {
        CoreError::Ingestion { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].kind, RecordKind::Transactions);
        }
        other => panic!("unexpected error: {other}"),
    }
}
