//! Domain error types.

use rust_decimal::Decimal;
use serde::Serialize;

use super::transaction::TransactionRecord;

/// Non-fatal data-quality warning: a sell consumed more quantity than the
/// FIFO ledger held for that (symbol, currency). The shortfall is filled
/// from a zero-cost synthetic lot and the resulting matches are flagged
/// unverified; the run continues.
///
/// A sell whose currency matches no open lot (CAD/USD entry error) lands
/// here too, since the per-currency ledger is simply empty.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error(
    "insufficient lots for {symbol} ({currency}): sold {quantity} on {date}, \
     short {shortfall} with no matching buy",
    symbol = .sell.symbol,
    currency = .sell.currency,
    quantity = .sell.quantity,
    date = .sell.date
)]
pub struct InsufficientLots {
    pub shortfall: Decimal,
    /// The offending sell record, kept whole so reports can show the
    /// full row (price, amounts, account) alongside the shortfall.
    pub sell: TransactionRecord,
}

/// Top-level error type for tradereport.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("import error in {file}: {reason}")]
    Import { file: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report output error: {reason}")]
    ReportOutput { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ReportError> for std::process::ExitCode {
    fn from(err: &ReportError) -> Self {
        let code: u8 = match err {
            ReportError::Io(_) => 1,
            ReportError::ConfigParse { .. } | ReportError::ConfigInvalid { .. } => 2,
            ReportError::MalformedRecord { .. } | ReportError::Import { .. } => 3,
            ReportError::ReportOutput { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
