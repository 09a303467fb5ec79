//! Libro: double-entry journal and T-accounts from spreadsheet exports
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = libro::Config::load("libro.yaml".into())?;
//! libro::init_logging(&config.logging);
//!
//! let ledger = libro::Ledger::from_config(config)?;
//! let report = ledger.load().await?;
//! for account in report.search_accounts("caja") {
//!     println!("{} {} ({})", account.account, account.balance_abs(), account.class);
//! }
//! # Ok(())
//! # }
//! ```

pub use libro_config::{Config, ConfigError, LoggingConfig, Period, SourcesConfig};
pub use libro_core::*;
pub use libro_parser::{
    parse_amount, LedgerLine, ParseError, Parsed, RecordKind, SheetParser, Side, TransactionRecord,
    MAX_AMOUNT_DIGITS, MAX_AMOUNT_PRECISION,
};

/// Install `env_logger` at the configured level.
///
/// `RUST_LOG` takes precedence when set. Calling this twice is harmless.
pub fn init_logging(config: &LoggingConfig) {
    let env = env_logger::Env::default().default_filter_or(config.level.to_lowercase());
    if env_logger::Builder::from_env(env).try_init().is_ok() {
        log::debug!(target: "libro", "Logging initialised at {}", config.level);
    }
}
