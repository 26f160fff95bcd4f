//! Quick-filter projections over a completed run.
//!
//! Pure read-only transformations of [`RunResult`]; nothing here mutates
//! the underlying result.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::engine::RunResult;
use super::lot::Match;
use super::summary::SymbolSummary;

pub const DEFAULT_TOP_N: usize = 10;

/// Top N symbols by realized P&L, best first. Ties break by symbol name
/// ascending so equal performers list alphabetically.
pub fn top_gainers(result: &RunResult, n: usize) -> Vec<&SymbolSummary> {
    let mut ranked: Vec<&SymbolSummary> = result.symbols.iter().collect();
    ranked.sort_by(|a, b| {
        b.realized_pnl
            .cmp(&a.realized_pnl)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked.truncate(n);
    ranked
}

/// Top N symbols by realized P&L, worst first. Same tie-break.
pub fn top_losers(result: &RunResult, n: usize) -> Vec<&SymbolSummary> {
    let mut ranked: Vec<&SymbolSummary> = result.symbols.iter().collect();
    ranked.sort_by(|a, b| {
        a.realized_pnl
            .cmp(&b.realized_pnl)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked.truncate(n);
    ranked
}

/// Matches ordered by absolute realized P&L, biggest first.
pub fn biggest_trades(result: &RunResult, n: usize) -> Vec<&Match> {
    let mut ranked: Vec<&Match> = result.matches.iter().collect();
    ranked.sort_by(|a, b| {
        b.realized_pnl
            .abs()
            .cmp(&a.realized_pnl.abs())
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked.truncate(n);
    ranked
}

/// Symbols ordered by activity (match count + Buy/Sell record count),
/// most active first.
pub fn most_active(result: &RunResult, n: usize) -> Vec<&SymbolSummary> {
    let mut ranked: Vec<&SymbolSummary> = result.symbols.iter().collect();
    ranked.sort_by(|a, b| {
        b.activity_count()
            .cmp(&a.activity_count())
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked.truncate(n);
    ranked
}

/// Realized P&L and dividends for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub realized_pnl: Decimal,
    pub dividends: Decimal,
    pub match_count: usize,
}

/// Matches and dividend entries grouped by (year, month) of their date,
/// chronological. Every match and dividend lands in exactly one bucket.
pub fn monthly_summary(result: &RunResult) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<(i32, u32), MonthlyBucket> = BTreeMap::new();

    for m in &result.matches {
        let key = (m.sell_date.year(), m.sell_date.month());
        let bucket = buckets.entry(key).or_insert_with(|| MonthlyBucket {
            year: key.0,
            month: key.1,
            realized_pnl: Decimal::ZERO,
            dividends: Decimal::ZERO,
            match_count: 0,
        });
        bucket.realized_pnl += m.realized_pnl;
        bucket.match_count += 1;
    }

    for entry in &result.dividends {
        let key = (entry.date.year(), entry.date.month());
        let bucket = buckets.entry(key).or_insert_with(|| MonthlyBucket {
            year: key.0,
            month: key.1,
            realized_pnl: Decimal::ZERO,
            dividends: Decimal::ZERO,
            match_count: 0,
        });
        bucket.dividends += entry.amount;
    }

    buckets.into_values().collect()
}
