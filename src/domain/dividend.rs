//! Dividend accumulation per symbol/currency and per calendar month.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use super::transaction::{Currency, TransactionRecord};

/// One dividend payment, net of any withholding already reflected in the
/// record's net amount. Negative amounts are reversals and simply reduce
/// the totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendEntry {
    pub date: NaiveDateTime,
    pub symbol: String,
    pub currency: Currency,
    pub amount: Decimal,
}

/// Accumulates dividend entries keyed by (symbol, currency) and by
/// (symbol, currency, year, month).
#[derive(Debug, Default)]
pub struct DividendAggregator {
    entries: Vec<DividendEntry>,
    by_symbol: BTreeMap<(String, Currency), Decimal>,
    by_month: BTreeMap<(String, Currency, i32, u32), Decimal>,
}

impl DividendAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_dividend(&mut self, record: &TransactionRecord) {
        let entry = DividendEntry {
            date: record.date,
            symbol: record.symbol.clone(),
            currency: record.currency,
            amount: record.net_amount,
        };

        *self
            .by_symbol
            .entry((entry.symbol.clone(), entry.currency))
            .or_insert(Decimal::ZERO) += entry.amount;
        *self
            .by_month
            .entry((
                entry.symbol.clone(),
                entry.currency,
                entry.date.year(),
                entry.date.month(),
            ))
            .or_insert(Decimal::ZERO) += entry.amount;

        self.entries.push(entry);
    }

    /// Total dividends for a symbol across all currencies.
    pub fn total_for_symbol(&self, symbol: &str) -> Decimal {
        self.by_symbol
            .iter()
            .filter(|((s, _), _)| s == symbol)
            .map(|(_, amount)| *amount)
            .sum()
    }

    pub fn total_for(&self, symbol: &str, currency: Currency) -> Decimal {
        self.by_symbol
            .get(&(symbol.to_string(), currency))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Totals keyed by (symbol, currency, year, month), sorted by key.
    pub fn monthly_totals(&self) -> &BTreeMap<(String, Currency, i32, u32), Decimal> {
        &self.by_month
    }

    /// Entries in the order they were applied.
    pub fn entries(&self) -> &[DividendEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DividendEntry> {
        self.entries
    }
}
