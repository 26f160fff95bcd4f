//! Derived per-symbol and per-category summaries.
//!
//! Summaries are freshly constructed output values, recomputed on each
//! engine run, with no back-references into the ledgers that produced
//! them.

use rust_decimal::Decimal;
use serde::Serialize;

/// Aggregates for one symbol across every currency it traded in.
/// Open positions are valued at cost basis only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolSummary {
    pub symbol: String,
    pub category: String,
    /// Number of Buy/Sell records touching the symbol.
    pub trade_count: usize,
    /// Number of FIFO matches produced by the symbol's sells.
    pub match_count: usize,
    /// Sum of matched sell proceeds.
    pub revenue: Decimal,
    /// Sum of matched cost basis.
    pub cost_basis: Decimal,
    pub realized_pnl: Decimal,
    pub dividends: Decimal,
    pub open_quantity: Decimal,
    pub open_cost_basis: Decimal,
}

impl SymbolSummary {
    /// Realized P&L plus dividend income.
    pub fn total_return(&self) -> Decimal {
        self.realized_pnl + self.dividends
    }

    /// Realized return on matched cost basis, as a percentage. Zero when
    /// nothing was matched (the original reported 0 rather than inf).
    pub fn roi_pct(&self) -> Decimal {
        if self.cost_basis.is_zero() {
            Decimal::ZERO
        } else {
            self.realized_pnl / self.cost_basis * Decimal::ONE_HUNDRED
        }
    }

    /// Match count plus trade count; the "most active" ranking key.
    pub fn activity_count(&self) -> usize {
        self.match_count + self.trade_count
    }
}

/// Aggregates for one category, summed over its symbols.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub symbol_count: usize,
    pub trade_count: usize,
    pub revenue: Decimal,
    pub cost_basis: Decimal,
    pub realized_pnl: Decimal,
    pub dividends: Decimal,
    pub open_cost_basis: Decimal,
}

impl CategorySummary {
    pub fn total_return(&self) -> Decimal {
        self.realized_pnl + self.dividends
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_summary() -> SymbolSummary {
        SymbolSummary {
            symbol: "AAPL".to_string(),
            category: "Tech".to_string(),
            trade_count: 4,
            match_count: 3,
            revenue: dec!(1200),
            cost_basis: dec!(1000),
            realized_pnl: dec!(200),
            dividends: dec!(15),
            open_quantity: dec!(10),
            open_cost_basis: dec!(250),
        }
    }

    #[test]
    fn total_return_adds_dividends() {
        assert_eq!(sample_summary().total_return(), dec!(215));
    }

    #[test]
    fn roi_is_pnl_over_cost_basis() {
        assert_eq!(sample_summary().roi_pct(), dec!(20));
    }

    #[test]
    fn roi_is_zero_when_nothing_matched() {
        let summary = SymbolSummary {
            cost_basis: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            ..sample_summary()
        };
        assert_eq!(summary.roi_pct(), Decimal::ZERO);
    }

    #[test]
    fn activity_count_sums_matches_and_trades() {
        assert_eq!(sample_summary().activity_count(), 7);
    }
}
