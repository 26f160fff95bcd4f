//! JSON report adapter: serializes the complete RunResult to one file.
//!
//! The machine-readable export surface; orderings in RunResult are
//! deterministic, so identical runs produce byte-identical files.

use std::fs;
use std::path::Path;

use log::info;

use crate::domain::engine::RunResult;
use crate::domain::error::ReportError;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, result: &RunResult, output_path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(result).map_err(|e| ReportError::ReportOutput {
            reason: format!("JSON serialization failed: {e}"),
        })?;
        fs::write(output_path, json)?;
        info!("wrote JSON report to {}", output_path.display());
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
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn sample_records() -> Vec<TransactionRecord> {
        let buy = TransactionRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, 6)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            settlement_date: None,
            action: Action::Buy,
            symbol: "MSFT".to_string(),
            quantity: dec!(5),
            price: dec!(400),
            gross_amount: dec!(2000),
            commission: dec!(4.95),
            net_amount: dec!(2004.95),
            currency: Currency::Usd,
            account: "A1".to_string(),
            activity_type: ActivityType::Trade,
            account_type: "Margin".to_string(),
        };
        let sell = TransactionRecord {
            date: NaiveDate::from_ymd_opt(2025, 2, 6)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            action: Action::Sell,
            gross_amount: dec!(2100),
            net_amount: dec!(2095.05),
            ..buy.clone()
        };
        vec![buy, sell]
    }

    #[test]
    fn json_round_trips_through_serde() {
        let result = PnLEngine::new(CategoryTable::builtin()).run(&sample_records());
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        JsonReportAdapter::new().write(&result, &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["symbols"][0]["symbol"], "MSFT");
        assert_eq!(parsed["matches"].as_array().unwrap().len(), 1);
        assert!(parsed["totals"]["realized_pnl"].is_string() || parsed["totals"]["realized_pnl"].is_number());
    }

    #[test]
    fn identical_runs_produce_identical_files() {
        let engine = PnLEngine::new(CategoryTable::builtin());
        let records = sample_records();
        let dir = TempDir::new().unwrap();

        let first_path = dir.path().join("first.json");
        let second_path = dir.path().join("second.json");
        JsonReportAdapter::new()
            .write(&engine.run(&records), &first_path)
            .unwrap();
        JsonReportAdapter::new()
            .write(&engine.run(&records), &second_path)
            .unwrap();

        assert_eq!(
            fs::read_to_string(first_path).unwrap(),
            fs::read_to_string(second_path).unwrap()
        );
    }
}
