#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cell::RefCell;
use std::path::Path;

use tradereport::domain::engine::RunResult;
use tradereport::domain::error::ReportError;
use tradereport::domain::transaction::{Action, ActivityType, Currency, TransactionRecord};
use tradereport::ports::activity_port::ActivityPort;
use tradereport::ports::report_port::ReportPort;

pub fn datetime(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn buy(symbol: &str, month: u32, day: u32, quantity: Decimal, price: Decimal) -> TransactionRecord {
    trade(symbol, Action::Buy, month, day, quantity, price, dec!(4.95), Currency::Cad)
}

pub fn sell(symbol: &str, month: u32, day: u32, quantity: Decimal, price: Decimal) -> TransactionRecord {
    trade(symbol, Action::Sell, month, day, quantity, price, dec!(4.95), Currency::Cad)
}

#[allow(clippy::too_many_arguments)]
pub fn trade(
    symbol: &str,
    action: Action,
    month: u32,
    day: u32,
    quantity: Decimal,
    price: Decimal,
    commission: Decimal,
    currency: Currency,
) -> TransactionRecord {
    let gross = quantity * price;
    let net = match action {
        Action::Buy => gross + commission,
        _ => gross - commission,
    };
    TransactionRecord {
        date: datetime(2025, month, day),
        settlement_date: None,
        action,
        symbol: symbol.to_string(),
        quantity,
        price,
        gross_amount: gross,
        commission,
        net_amount: net,
        currency,
        account: "12345678".to_string(),
        activity_type: ActivityType::Trade,
        account_type: "Margin".to_string(),
    }
}

pub fn dividend(symbol: &str, month: u32, day: u32, amount: Decimal, currency: Currency) -> TransactionRecord {
    TransactionRecord {
        date: datetime(2025, month, day),
        settlement_date: None,
        action: Action::Dividend,
        symbol: symbol.to_string(),
        quantity: Decimal::ZERO,
        price: Decimal::ZERO,
        gross_amount: amount,
        commission: Decimal::ZERO,
        net_amount: amount,
        currency,
        account: "12345678".to_string(),
        activity_type: ActivityType::Dividend,
        account_type: "Margin".to_string(),
    }
}

/// In-memory importer for pipeline tests that need no file on disk.
pub struct MockActivityPort {
    pub records: Vec<TransactionRecord>,
    pub error: Option<String>,
}

impl MockActivityPort {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self {
            records,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            records: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl ActivityPort for MockActivityPort {
    fn load_activities(&self, path: &Path) -> Result<Vec<TransactionRecord>, ReportError> {
        if let Some(reason) = &self.error {
            return Err(ReportError::Import {
                file: path.display().to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.records.clone())
    }
}

/// Report port that captures the result instead of writing it anywhere.
pub struct CaptureReportPort {
    pub captured: RefCell<Option<RunResult>>,
}

impl CaptureReportPort {
    pub fn new() -> Self {
        Self {
            captured: RefCell::new(None),
        }
    }
}

impl ReportPort for CaptureReportPort {
    fn write(&self, result: &RunResult, _output_path: &Path) -> Result<(), ReportError> {
        *self.captured.borrow_mut() = Some(result.clone());
        Ok(())
    }
}
