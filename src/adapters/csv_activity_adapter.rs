//! Questrade activities CSV importer.
//!
//! Maps the export's columns by header name (tolerant of column order and
//! of the spacing Questrade uses), coerces strings into dates and
//! decimals, normalizes symbols, and rejects structurally malformed rows
//! before they can reach the engine.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use log::info;
use rust_decimal::Decimal;

use crate::domain::error::ReportError;
use crate::domain::transaction::{Action, ActivityType, Currency, TransactionRecord};
use crate::ports::activity_port::ActivityPort;

pub struct CsvActivityAdapter;

impl CsvActivityAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvActivityAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Header name normalized the way the original import does: trimmed,
/// lowercased, spaces and '#' collapsed to underscores.
fn normalize_header(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace('#', "")
        .trim_matches('_')
        .to_string()
}

struct ColumnMap {
    date: usize,
    settlement_date: Option<usize>,
    action: usize,
    symbol: usize,
    quantity: usize,
    price: usize,
    gross_amount: usize,
    commission: Option<usize>,
    net_amount: usize,
    currency: usize,
    account: Option<usize>,
    activity_type: usize,
    account_type: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord, file: &str) -> Result<Self, ReportError> {
        let find = |wanted: &[&str]| -> Option<usize> {
            headers.iter().position(|h| {
                let normalized = normalize_header(h);
                wanted.contains(&normalized.as_str())
            })
        };
        let require = |wanted: &[&str]| -> Result<usize, ReportError> {
            find(wanted).ok_or_else(|| ReportError::Import {
                file: file.to_string(),
                reason: format!("missing column {}", wanted[0]),
            })
        };

        Ok(Self {
            date: require(&["transaction_date", "date"])?,
            settlement_date: find(&["settlement_date"]),
            action: require(&["action"])?,
            symbol: require(&["symbol"])?,
            quantity: require(&["quantity", "qty"])?,
            price: require(&["price"])?,
            gross_amount: require(&["gross_amount", "gross"])?,
            commission: find(&["commission"]),
            net_amount: require(&["net_amount", "net"])?,
            currency: require(&["currency"])?,
            account: find(&["account", "account_number"]),
            activity_type: require(&["activity_type", "type"])?,
            account_type: find(&["account_type"]),
        })
    }
}

/// Symbol normalization: uppercase, exchange suffix preserved, and the
/// leading dot Questrade prefixes dividend symbols with (".ABX") removed
/// so dividends join their trade symbol.
fn normalize_symbol(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_uppercase()
}

/// The export writes dates with or without a time component depending on
/// version; accept both, plus the slash form older exports used.
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

/// Amounts may carry currency symbols, thousands separators, and
/// parenthesized negatives.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        return Some(Decimal::ZERO);
    }
    if let Some(inner) = cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return inner.parse::<Decimal>().ok().map(|d| -d);
    }
    cleaned.parse().ok()
}

fn parse_action(raw: &str) -> Option<Action> {
    match raw.trim().to_uppercase().as_str() {
        "BUY" => Some(Action::Buy),
        "SELL" => Some(Action::Sell),
        "DIV" | "DIVIDEND" => Some(Action::Dividend),
        _ => None,
    }
}

fn parse_activity_type(raw: &str) -> Option<ActivityType> {
    match raw.trim().to_uppercase().as_str() {
        "TRADES" | "TRADE" => Some(ActivityType::Trade),
        "DIVIDENDS" | "DIVIDEND" => Some(ActivityType::Dividend),
        _ => None,
    }
}

impl CsvActivityAdapter {
    fn parse_row(
        columns: &ColumnMap,
        row: &StringRecord,
        line: u64,
    ) -> Result<Option<TransactionRecord>, ReportError> {
        let malformed = |reason: String| ReportError::MalformedRecord { line, reason };
        let field = |index: usize| row.get(index).unwrap_or("");

        let activity_type = match parse_activity_type(field(columns.activity_type)) {
            Some(t) => t,
            // Other activity classes (deposits, FX, interest) are not
            // part of the P&L data set; skip them.
            None => return Ok(None),
        };

        let action = match (activity_type, parse_action(field(columns.action))) {
            (ActivityType::Dividend, _) => Action::Dividend,
            (ActivityType::Trade, Some(action @ (Action::Buy | Action::Sell))) => action,
            (ActivityType::Trade, _) => {
                return Err(malformed(format!(
                    "unrecognized trade action {:?}",
                    field(columns.action)
                )));
            }
        };

        let symbol = normalize_symbol(field(columns.symbol));
        if symbol.is_empty() {
            return Err(malformed("empty symbol".to_string()));
        }

        let date = parse_datetime(field(columns.date))
            .ok_or_else(|| malformed(format!("unparseable date {:?}", field(columns.date))))?;
        let settlement_date = columns
            .settlement_date
            .and_then(|i| parse_datetime(field(i)));

        let quantity = parse_decimal(field(columns.quantity))
            .ok_or_else(|| malformed(format!("bad quantity {:?}", field(columns.quantity))))?
            .abs();
        if matches!(action, Action::Buy | Action::Sell) && quantity.is_zero() {
            return Err(malformed("zero quantity on trade".to_string()));
        }

        let price = parse_decimal(field(columns.price))
            .ok_or_else(|| malformed(format!("bad price {:?}", field(columns.price))))?;
        let gross_amount = parse_decimal(field(columns.gross_amount))
            .ok_or_else(|| malformed("bad gross amount".to_string()))?
            .abs();
        let commission = columns
            .commission
            .and_then(|i| parse_decimal(field(i)))
            .unwrap_or(Decimal::ZERO)
            .abs();
        let net_amount = parse_decimal(field(columns.net_amount))
            .ok_or_else(|| malformed("bad net amount".to_string()))?;
        // Dividends keep the signed net (reversals are negative); trades
        // use magnitudes and the action carries the direction.
        let net_amount = match action {
            Action::Dividend => net_amount,
            Action::Buy => gross_amount + commission,
            Action::Sell => gross_amount - commission,
        };

        let currency = Currency::parse(field(columns.currency))
            .ok_or_else(|| malformed(format!("unknown currency {:?}", field(columns.currency))))?;

        Ok(Some(TransactionRecord {
            date,
            settlement_date,
            action,
            symbol,
            quantity,
            price,
            gross_amount,
            commission,
            net_amount,
            currency,
            account: columns.account.map(|i| field(i).to_string()).unwrap_or_default(),
            activity_type,
            account_type: columns
                .account_type
                .map(|i| field(i).to_string())
                .unwrap_or_default(),
        }))
    }
}

impl ActivityPort for CsvActivityAdapter {
    fn load_activities(&self, path: &Path) -> Result<Vec<TransactionRecord>, ReportError> {
        let content = fs::read_to_string(path).map_err(|e| ReportError::Import {
            file: path.display().to_string(),
            reason: format!("failed to read: {e}"),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| ReportError::Import {
            file: path.display().to_string(),
            reason: format!("CSV header error: {e}"),
        })?;
        let columns = ColumnMap::from_headers(headers, &path.display().to_string())?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (i, result) in rdr.records().enumerate() {
            let row = result.map_err(|e| ReportError::Import {
                file: path.display().to_string(),
                reason: format!("CSV parse error: {e}"),
            })?;
            // Header is line 1; first data row is line 2.
            let line = i as u64 + 2;
            match Self::parse_row(&columns, &row, line)? {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        info!(
            "imported {} activity records from {} ({} non-trade rows skipped)",
            records.len(),
            path.display(),
            skipped
        );
        Ok(records)
    }
}
