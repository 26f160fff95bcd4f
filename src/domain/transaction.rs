//! Validated transaction record model.
//!
//! The importer is responsible for producing records that already satisfy
//! the invariants documented here; the engine trusts them and does not
//! re-validate.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// What a transaction row did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    Buy,
    Sell,
    Dividend,
}

/// Settlement currency of a transaction. A symbol traded in two currencies
/// is two independent FIFO ledgers; cost basis never mixes currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Currency {
    Cad,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Cad => "CAD",
            Currency::Usd => "USD",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_uppercase().as_str() {
            "CAD" => Some(Currency::Cad),
            "USD" => Some(Currency::Usd),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad activity class from the brokerage export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityType {
    Trade,
    Dividend,
}

/// One validated, normalized activity row.
///
/// Invariants (enforced by the importer):
/// - `symbol` is non-empty, uppercase, exchange suffix preserved ("ABX.TO")
/// - Buy/Sell have `quantity > 0`; Dividend quantity may be zero
/// - `commission >= 0`, `price >= 0`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub date: NaiveDateTime,
    pub settlement_date: Option<NaiveDateTime>,
    pub action: Action,
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub gross_amount: Decimal,
    pub commission: Decimal,
    pub net_amount: Decimal,
    pub currency: Currency,
    pub account: String,
    pub activity_type: ActivityType,
    pub account_type: String,
}

impl TransactionRecord {
    /// Ledger key: records are grouped and processed per (symbol, currency).
    pub fn ledger_key(&self) -> (String, Currency) {
        (self.symbol.clone(), self.currency)
    }
}
