//! FIFO lot ledger: open-lot queue, sell matching, realized P&L.
//!
//! One `LotLedger` covers exactly one (symbol, currency) pair. Buys append
//! lots at the tail; sells consume from the head, splitting lots on partial
//! fills. Each consumed slice produces one immutable [`Match`].

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::InsufficientLots;
use super::transaction::{Currency, TransactionRecord};

/// One open purchase lot. Owned exclusively by its ledger; destroyed when
/// fully consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    pub open_date: NaiveDateTime,
    pub remaining_quantity: Decimal,
    /// (gross_amount + commission) / quantity, fixed at purchase.
    pub unit_cost: Decimal,
    pub currency: Currency,
}

/// One sell slice matched against one lot. Append-only history, never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub sell_date: NaiveDateTime,
    pub symbol: String,
    pub currency: Currency,
    pub quantity_matched: Decimal,
    pub buy_unit_cost: Decimal,
    /// (gross_amount - commission) / quantity of the sell; uniform across
    /// the slices of one sell.
    pub sell_unit_proceeds: Decimal,
    pub realized_pnl: Decimal,
    /// True when the slice was filled from a zero-cost synthetic lot
    /// because the ledger ran dry (short sale or data error).
    pub unverified: bool,
}

impl Match {
    /// Gross proceeds attributed to this slice.
    pub fn revenue(&self) -> Decimal {
        self.quantity_matched * self.sell_unit_proceeds
    }

    /// Cost basis attributed to this slice.
    pub fn cost_basis(&self) -> Decimal {
        self.quantity_matched * self.buy_unit_cost
    }
}

/// Open-position snapshot: total remaining quantity and remaining cost
/// basis across all open lots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpenPosition {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

/// Sell commission attributed to `take` units of the sell, pro-rated by
/// quantity.
///
/// Documented assumption: the allocation rule is pro-rata-by-quantity.
/// It lives behind this one function so a different rule (e.g. all
/// commission against the first lot) can be swapped in one place.
pub fn allocate_commission(total_commission: Decimal, take: Decimal, sell_quantity: Decimal) -> Decimal {
    total_commission * take / sell_quantity
}

/// FIFO queue of open lots for one (symbol, currency) pair.
#[derive(Debug, Default)]
pub struct LotLedger {
    lots: VecDeque<Lot>,
}

impl LotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new lot at the tail. Always succeeds for a valid Buy.
    pub fn apply_buy(&mut self, record: &TransactionRecord) {
        self.lots.push_back(Lot {
            open_date: record.date,
            remaining_quantity: record.quantity,
            unit_cost: (record.gross_amount + record.commission) / record.quantity,
            currency: record.currency,
        });
    }

    /// Consume lots from the head against a sell, emitting one match per
    /// slice. If the queue empties before the sell is covered, the
    /// remainder is matched against a zero-cost synthetic lot, flagged
    /// unverified, and an [`InsufficientLots`] warning is returned
    /// alongside the matches. Never aborts.
    pub fn apply_sell(
        &mut self,
        record: &TransactionRecord,
    ) -> (Vec<Match>, Option<InsufficientLots>) {
        // P&L is derived from the same per-unit proceeds the match
        // records, so quantity * (proceeds - cost) always reproduces it.
        let unit_fee = allocate_commission(record.commission, Decimal::ONE, record.quantity);
        let sell_unit_proceeds = record.gross_amount / record.quantity - unit_fee;

        let mut matches = Vec::new();
        let mut need = record.quantity;

        while need > Decimal::ZERO {
            let Some(lot) = self.lots.front_mut() else {
                break;
            };
            let take = need.min(lot.remaining_quantity);

            matches.push(Match {
                sell_date: record.date,
                symbol: record.symbol.clone(),
                currency: record.currency,
                quantity_matched: take,
                buy_unit_cost: lot.unit_cost,
                sell_unit_proceeds,
                realized_pnl: take * (sell_unit_proceeds - lot.unit_cost),
                unverified: false,
            });

            lot.remaining_quantity -= take;
            if lot.remaining_quantity.is_zero() {
                self.lots.pop_front();
            }
            need -= take;
        }

        if need > Decimal::ZERO {
            // Zero-cost synthetic lot covers the shortfall.
            matches.push(Match {
                sell_date: record.date,
                symbol: record.symbol.clone(),
                currency: record.currency,
                quantity_matched: need,
                buy_unit_cost: Decimal::ZERO,
                sell_unit_proceeds,
                realized_pnl: need * sell_unit_proceeds,
                unverified: true,
            });
            let warning = InsufficientLots {
                shortfall: need,
                sell: record.clone(),
            };
            return (matches, Some(warning));
        }

        (matches, None)
    }

    /// (total remaining quantity, total remaining cost basis) without
    /// mutating the queue.
    pub fn snapshot_open_position(&self) -> OpenPosition {
        let mut quantity = Decimal::ZERO;
        let mut cost_basis = Decimal::ZERO;
        for lot in &self.lots {
            quantity += lot.remaining_quantity;
            cost_basis += lot.remaining_quantity * lot.unit_cost;
        }
        OpenPosition {
            quantity,
            cost_basis,
        }
    }

    pub fn open_lot_count(&self) -> usize {
        self.lots.len()
    }
}
