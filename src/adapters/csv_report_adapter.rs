//! CSV report adapter: writes the run as a set of tables in an output
//! directory (summary, categories, matches, dividends, monthly,
//! warnings), the tabular boundary the original application's spreadsheet
//! exporter sat behind.

use std::fs;
use std::path::Path;

use log::info;

use crate::domain::engine::RunResult;
use crate::domain::error::ReportError;
use crate::domain::views;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn writer(path: &Path) -> Result<csv::Writer<fs::File>, ReportError> {
        csv::Writer::from_path(path).map_err(|e| ReportError::ReportOutput {
            reason: format!("failed to open {}: {e}", path.display()),
        })
    }

    fn finish(mut wtr: csv::Writer<fs::File>, path: &Path) -> Result<(), ReportError> {
        wtr.flush().map_err(|e| ReportError::ReportOutput {
            reason: format!("failed to flush {}: {e}", path.display()),
        })
    }

    fn write_summary(result: &RunResult, path: &Path) -> Result<(), ReportError> {
        let mut wtr = Self::writer(path)?;
        wtr.write_record([
            "symbol",
            "category",
            "trades",
            "revenue",
            "cost_basis",
            "realized_pnl",
            "dividends",
            "total_return",
            "roi_pct",
            "open_quantity",
            "open_cost_basis",
        ])
        .map_err(Self::row_error)?;
        for s in &result.symbols {
            wtr.write_record([
                s.symbol.clone(),
                s.category.clone(),
                s.trade_count.to_string(),
                s.revenue.to_string(),
                s.cost_basis.to_string(),
                s.realized_pnl.to_string(),
                s.dividends.to_string(),
                s.total_return().to_string(),
                s.roi_pct().round_dp(2).to_string(),
                s.open_quantity.to_string(),
                s.open_cost_basis.to_string(),
            ])
            .map_err(Self::row_error)?;
        }
        Self::finish(wtr, path)
    }

    fn write_categories(result: &RunResult, path: &Path) -> Result<(), ReportError> {
        let mut wtr = Self::writer(path)?;
        wtr.write_record([
            "category",
            "symbols",
            "trades",
            "revenue",
            "cost_basis",
            "realized_pnl",
            "dividends",
            "total_return",
        ])
        .map_err(Self::row_error)?;
        for c in &result.categories {
            wtr.write_record([
                c.category.clone(),
                c.symbol_count.to_string(),
                c.trade_count.to_string(),
                c.revenue.to_string(),
                c.cost_basis.to_string(),
                c.realized_pnl.to_string(),
                c.dividends.to_string(),
                c.total_return().to_string(),
            ])
            .map_err(Self::row_error)?;
        }
        Self::finish(wtr, path)
    }

    fn write_matches(result: &RunResult, path: &Path) -> Result<(), ReportError> {
        let mut wtr = Self::writer(path)?;
        wtr.write_record([
            "sell_date",
            "symbol",
            "currency",
            "quantity",
            "buy_unit_cost",
            "sell_unit_proceeds",
            "realized_pnl",
            "unverified",
        ])
        .map_err(Self::row_error)?;
        for m in &result.matches {
            wtr.write_record([
                m.sell_date.to_string(),
                m.symbol.clone(),
                m.currency.to_string(),
                m.quantity_matched.to_string(),
                m.buy_unit_cost.to_string(),
                m.sell_unit_proceeds.to_string(),
                m.realized_pnl.to_string(),
                m.unverified.to_string(),
            ])
            .map_err(Self::row_error)?;
        }
        Self::finish(wtr, path)
    }

    fn write_dividends(result: &RunResult, path: &Path) -> Result<(), ReportError> {
        let mut wtr = Self::writer(path)?;
        wtr.write_record(["date", "symbol", "currency", "amount"])
            .map_err(Self::row_error)?;
        for d in &result.dividends {
            wtr.write_record([
                d.date.to_string(),
                d.symbol.clone(),
                d.currency.to_string(),
                d.amount.to_string(),
            ])
            .map_err(Self::row_error)?;
        }
        Self::finish(wtr, path)
    }

    fn write_monthly(result: &RunResult, path: &Path) -> Result<(), ReportError> {
        let mut wtr = Self::writer(path)?;
        wtr.write_record(["year", "month", "realized_pnl", "dividends", "matches"])
            .map_err(Self::row_error)?;
        for bucket in views::monthly_summary(result) {
            wtr.write_record([
                bucket.year.to_string(),
                bucket.month.to_string(),
                bucket.realized_pnl.to_string(),
                bucket.dividends.to_string(),
                bucket.match_count.to_string(),
            ])
            .map_err(Self::row_error)?;
        }
        Self::finish(wtr, path)
    }

    fn write_warnings(result: &RunResult, path: &Path) -> Result<(), ReportError> {
        let mut wtr = Self::writer(path)?;
        wtr.write_record([
            "sell_date",
            "symbol",
            "currency",
            "sell_quantity",
            "gross_amount",
            "account",
            "shortfall",
        ])
        .map_err(Self::row_error)?;
        for w in &result.warnings {
            wtr.write_record([
                w.sell.date.to_string(),
                w.sell.symbol.clone(),
                w.sell.currency.to_string(),
                w.sell.quantity.to_string(),
                w.sell.gross_amount.to_string(),
                w.sell.account.clone(),
                w.shortfall.to_string(),
            ])
            .map_err(Self::row_error)?;
        }
        Self::finish(wtr, path)
    }

    fn row_error(e: csv::Error) -> ReportError {
        ReportError::ReportOutput {
            reason: format!("CSV write error: {e}"),
        }
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    /// `output_path` is a directory; one CSV file per table is written
    /// into it.
    fn write(&self, result: &RunResult, output_path: &Path) -> Result<(), ReportError> {
        fs::create_dir_all(output_path)?;

        Self::write_summary(result, &output_path.join("summary.csv"))?;
        Self::write_categories(result, &output_path.join("categories.csv"))?;
        Self::write_matches(result, &output_path.join("matches.csv"))?;
        Self::write_dividends(result, &output_path.join("dividends.csv"))?;
        Self::write_monthly(result, &output_path.join("monthly.csv"))?;
        Self::write_warnings(result, &output_path.join("warnings.csv"))?;

        info!("wrote CSV report to {}", output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryTable;
    use crate::domain::engine::PnLEngine;
    use crate::domain::transaction::{Action, ActivityType, Currency, TransactionRecord};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn trade(action: Action, day: u32, quantity: Decimal, price: Decimal) -> TransactionRecord {
        let gross = quantity * price;
        TransactionRecord {
            date: NaiveDate::from_ymd_opt(2025, 2, day)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            settlement_date: None,
            action,
            symbol: "AAPL".to_string(),
            quantity,
            price,
            gross_amount: gross,
            commission: dec!(4.95),
            net_amount: gross,
            currency: Currency::Usd,
            account: "A1".to_string(),
            activity_type: ActivityType::Trade,
            account_type: "Margin".to_string(),
        }
    }

    #[test]
    fn writes_all_tables() {
        let records = vec![
            trade(Action::Buy, 3, dec!(10), dec!(100)),
            trade(Action::Sell, 10, dec!(10), dec!(110)),
        ];
        let result = PnLEngine::new(CategoryTable::builtin()).run(&records);

        let dir = TempDir::new().unwrap();
        CsvReportAdapter::new().write(&result, dir.path()).unwrap();

        for name in [
            "summary.csv",
            "categories.csv",
            "matches.csv",
            "dividends.csv",
            "monthly.csv",
            "warnings.csv",
        ] {
            assert!(dir.path().join(name).exists(), "missing {name}");
        }

        let summary = fs::read_to_string(dir.path().join("summary.csv")).unwrap();
        assert!(summary.contains("AAPL"));
        assert!(summary.contains("Tech"));

        let matches = fs::read_to_string(dir.path().join("matches.csv")).unwrap();
        assert_eq!(matches.lines().count(), 2);
    }

    #[test]
    fn warnings_table_lists_shortfalls() {
        let records = vec![trade(Action::Sell, 3, dec!(5), dec!(100))];
        let result = PnLEngine::new(CategoryTable::empty()).run(&records);

        let dir = TempDir::new().unwrap();
        CsvReportAdapter::new().write(&result, dir.path()).unwrap();

        let warnings = fs::read_to_string(dir.path().join("warnings.csv")).unwrap();
        assert_eq!(warnings.lines().count(), 2);
        assert!(warnings.contains("AAPL"));
        // The offending row's amounts and account surface too.
        assert!(warnings.contains("500"));
        assert!(warnings.contains("A1"));
    }
}
