//! FIFO P&L engine: one full calculation pass over a transaction set.
//!
//! The engine owns every per-(symbol, currency) ledger and the dividend
//! aggregator for the duration of a single run; nothing is shared across
//! runs, so re-running on identical input is idempotent and independent
//! runs may execute in parallel.

use std::collections::BTreeMap;

use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use super::category::CategoryTable;
use super::dividend::{DividendAggregator, DividendEntry};
use super::error::InsufficientLots;
use super::lot::{LotLedger, Match};
use super::summary::{CategorySummary, SymbolSummary};
use super::transaction::{Action, Currency, TransactionRecord};

/// Portfolio-wide totals for the report header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub revenue: Decimal,
    pub cost_basis: Decimal,
    pub realized_pnl: Decimal,
    pub dividends: Decimal,
    pub total_return: Decimal,
}

/// Complete output of one engine run: full audit trail plus derived
/// aggregates. A plain data value with no ties back into the engine,
/// safe to hand to any report adapter. Orderings are deterministic:
/// matches chronological, summaries sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub matches: Vec<Match>,
    pub symbols: Vec<SymbolSummary>,
    pub categories: Vec<CategorySummary>,
    pub dividends: Vec<DividendEntry>,
    pub warnings: Vec<InsufficientLots>,
    pub totals: Totals,
}

pub struct PnLEngine {
    categories: CategoryTable,
}

impl PnLEngine {
    pub fn new(categories: CategoryTable) -> Self {
        Self { categories }
    }

    /// Run the full pass: sort, dispatch, aggregate.
    ///
    /// Records may arrive in any order; they are stable-sorted by date so
    /// records sharing a timestamp keep their input order (the source
    /// log's own ordering reflects true execution sequence within the
    /// timestamp granularity — ties are never broken by symbol or
    /// amount).
    pub fn run(&self, records: &[TransactionRecord]) -> RunResult {
        let mut ordered: Vec<&TransactionRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.date);

        let mut ledgers: BTreeMap<(String, Currency), LotLedger> = BTreeMap::new();
        let mut dividends = DividendAggregator::new();
        let mut matches: Vec<Match> = Vec::new();
        let mut warnings: Vec<InsufficientLots> = Vec::new();
        let mut trade_counts: BTreeMap<String, usize> = BTreeMap::new();

        for record in ordered {
            match record.action {
                Action::Buy => {
                    *trade_counts.entry(record.symbol.clone()).or_insert(0) += 1;
                    ledgers
                        .entry(record.ledger_key())
                        .or_default()
                        .apply_buy(record);
                }
                Action::Sell => {
                    *trade_counts.entry(record.symbol.clone()).or_insert(0) += 1;
                    let ledger = ledgers.entry(record.ledger_key()).or_default();
                    let (sell_matches, warning) = ledger.apply_sell(record);
                    matches.extend(sell_matches);
                    if let Some(warning) = warning {
                        warn!("{warning}");
                        warnings.push(warning);
                    }
                }
                Action::Dividend => dividends.apply_dividend(record),
            }
        }

        debug!(
            "processed {} records into {} matches across {} ledgers",
            records.len(),
            matches.len(),
            ledgers.len()
        );

        self.aggregate(matches, ledgers, dividends, warnings, trade_counts)
    }

    fn aggregate(
        &self,
        matches: Vec<Match>,
        ledgers: BTreeMap<(String, Currency), LotLedger>,
        dividends: DividendAggregator,
        warnings: Vec<InsufficientLots>,
        trade_counts: BTreeMap<String, usize>,
    ) -> RunResult {
        // Every symbol encountered gets a summary, including
        // dividend-only symbols with no trades.
        let mut symbol_names: Vec<String> = trade_counts.keys().cloned().collect();
        for entry in dividends.entries() {
            if !trade_counts.contains_key(&entry.symbol) {
                symbol_names.push(entry.symbol.clone());
            }
        }
        symbol_names.sort();
        symbol_names.dedup();

        let mut symbols = Vec::with_capacity(symbol_names.len());
        for symbol in symbol_names {
            let mut revenue = Decimal::ZERO;
            let mut cost_basis = Decimal::ZERO;
            let mut realized_pnl = Decimal::ZERO;
            let mut match_count = 0usize;
            for m in matches.iter().filter(|m| m.symbol == symbol) {
                revenue += m.revenue();
                cost_basis += m.cost_basis();
                realized_pnl += m.realized_pnl;
                match_count += 1;
            }

            let mut open_quantity = Decimal::ZERO;
            let mut open_cost_basis = Decimal::ZERO;
            for ((ledger_symbol, _), ledger) in &ledgers {
                if *ledger_symbol == symbol {
                    let open = ledger.snapshot_open_position();
                    open_quantity += open.quantity;
                    open_cost_basis += open.cost_basis;
                }
            }

            symbols.push(SymbolSummary {
                category: self.categories.category_for(&symbol).to_string(),
                trade_count: trade_counts.get(&symbol).copied().unwrap_or(0),
                match_count,
                revenue,
                cost_basis,
                realized_pnl,
                dividends: dividends.total_for_symbol(&symbol),
                open_quantity,
                open_cost_basis,
                symbol,
            });
        }

        let mut categories: BTreeMap<String, CategorySummary> = BTreeMap::new();
        for summary in &symbols {
            let entry = categories
                .entry(summary.category.clone())
                .or_insert_with(|| CategorySummary {
                    category: summary.category.clone(),
                    symbol_count: 0,
                    trade_count: 0,
                    revenue: Decimal::ZERO,
                    cost_basis: Decimal::ZERO,
                    realized_pnl: Decimal::ZERO,
                    dividends: Decimal::ZERO,
                    open_cost_basis: Decimal::ZERO,
                });
            entry.symbol_count += 1;
            entry.trade_count += summary.trade_count;
            entry.revenue += summary.revenue;
            entry.cost_basis += summary.cost_basis;
            entry.realized_pnl += summary.realized_pnl;
            entry.dividends += summary.dividends;
            entry.open_cost_basis += summary.open_cost_basis;
        }

        let totals = Totals {
            revenue: symbols.iter().map(|s| s.revenue).sum(),
            cost_basis: symbols.iter().map(|s| s.cost_basis).sum(),
            realized_pnl: symbols.iter().map(|s| s.realized_pnl).sum(),
            dividends: symbols.iter().map(|s| s.dividends).sum(),
            total_return: symbols.iter().map(|s| s.total_return()).sum(),
        };

        RunResult {
            matches,
            symbols,
            categories: categories.into_values().collect(),
            dividends: dividends.into_entries(),
            warnings,
            totals,
        }
    }
}
