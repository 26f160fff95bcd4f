//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_activity_adapter::CsvActivityAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::category::CategoryTable;
use crate::domain::engine::{PnLEngine, RunResult};
use crate::domain::error::ReportError;
use crate::domain::views;
use crate::ports::activity_port::ActivityPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradereport", about = "FIFO P&L report builder for brokerage activity logs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TopKind {
    Gainers,
    Losers,
    Trades,
    Active,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full pipeline: import activities, compute FIFO P&L, write a report
    Report {
        /// Activities CSV export
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory (csv) or file (json) to write
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// Print a quick-filter view to stdout
    Top {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(value_enum)]
        kind: TopKind,
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Print the monthly P&L and dividend summary to stdout
    Monthly {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Import only: report record counts and data-quality warnings
    Validate {
        #[arg(short, long)]
        input: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Report {
            input,
            config,
            output,
            format,
        } => run_report(&input, config.as_ref(), &output, format),
        Command::Top {
            input,
            config,
            kind,
            n,
        } => run_top(&input, config.as_ref(), kind, n),
        Command::Monthly { input, config } => run_monthly(&input, config.as_ref()),
        Command::Validate { input } => run_validate(&input),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ReportError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Resolve config into (category table, top_n, configured format), with
/// built-in defaults when no config file was given.
fn resolve_options(
    config_path: Option<&PathBuf>,
) -> Result<(CategoryTable, usize, Option<String>), ExitCode> {
    let Some(path) = config_path else {
        return Ok((CategoryTable::builtin(), views::DEFAULT_TOP_N, None));
    };

    let adapter = load_config(path)?;
    let categories = adapter.category_table().map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    let top_n = adapter.get_int("report", "top_n", views::DEFAULT_TOP_N as i64) as usize;
    let format = adapter.get_string("report", "output_format");
    Ok((categories, top_n, format))
}

/// Parse the configured `output_format` value. Case-insensitive;
/// anything other than csv/json is a config error rather than a silent
/// fallback.
fn parse_output_format(value: &str) -> Result<OutputFormat, ReportError> {
    match value.trim().to_lowercase().as_str() {
        "csv" => Ok(OutputFormat::Csv),
        "json" => Ok(OutputFormat::Json),
        _ => Err(ReportError::ConfigInvalid {
            section: "report".to_string(),
            key: "output_format".to_string(),
            reason: format!("unrecognized format {value:?}, expected csv or json"),
        }),
    }
}

fn load_and_run(
    input: &PathBuf,
    categories: CategoryTable,
) -> Result<RunResult, ExitCode> {
    let importer = CsvActivityAdapter::new();
    let records = importer.load_activities(input).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    eprintln!("Imported {} records from {}", records.len(), input.display());

    let result = PnLEngine::new(categories).run(&records);
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(result)
}

fn run_report(
    input: &PathBuf,
    config_path: Option<&PathBuf>,
    output: &PathBuf,
    format: Option<OutputFormat>,
) -> ExitCode {
    let (categories, _top_n, configured_format) = match resolve_options(config_path) {
        Ok(v) => v,
        Err(code) => return code,
    };

    let format = match (format, configured_format.as_deref()) {
        (Some(flag), _) => flag,
        (None, Some(configured)) => match parse_output_format(configured) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        },
        (None, None) => OutputFormat::Csv,
    };

    let result = match load_and_run(input, categories) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let write_result = match format {
        OutputFormat::Csv => CsvReportAdapter::new().write(&result, output),
        OutputFormat::Json => JsonReportAdapter::new().write(&result, output),
    };
    if let Err(e) = write_result {
        eprintln!("error: {e}");
        return ExitCode::from(&e);
    }

    println!(
        "Realized P&L: {}  Dividends: {}  Total return: {}  ({} symbols, {} matches, {} warnings)",
        result.totals.realized_pnl,
        result.totals.dividends,
        result.totals.total_return,
        result.symbols.len(),
        result.matches.len(),
        result.warnings.len(),
    );
    println!("Report written to {}", output.display());
    ExitCode::SUCCESS
}

fn run_top(
    input: &PathBuf,
    config_path: Option<&PathBuf>,
    kind: TopKind,
    n: Option<usize>,
) -> ExitCode {
    let (categories, config_top_n, _) = match resolve_options(config_path) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let n = n.unwrap_or(config_top_n);

    let result = match load_and_run(input, categories) {
        Ok(r) => r,
        Err(code) => return code,
    };

    match kind {
        TopKind::Gainers | TopKind::Losers => {
            let ranked = if kind == TopKind::Gainers {
                views::top_gainers(&result, n)
            } else {
                views::top_losers(&result, n)
            };
            println!(
                "{:<10} {:<12} {:>12} {:>12} {:>10}",
                "Symbol", "Category", "P&L", "Dividends", "ROI %"
            );
            for s in ranked {
                println!(
                    "{:<10} {:<12} {:>12} {:>12} {:>10}",
                    s.symbol,
                    s.category,
                    s.realized_pnl.round_dp(2),
                    s.dividends.round_dp(2),
                    s.roi_pct().round_dp(1),
                );
            }
        }
        TopKind::Trades => {
            println!(
                "{:<12} {:<10} {:>10} {:>12} {:>12}",
                "Sell date", "Symbol", "Quantity", "P&L", "Unverified"
            );
            for m in views::biggest_trades(&result, n) {
                println!(
                    "{:<12} {:<10} {:>10} {:>12} {:>12}",
                    m.sell_date.date(),
                    m.symbol,
                    m.quantity_matched,
                    m.realized_pnl.round_dp(2),
                    if m.unverified { "yes" } else { "" },
                );
            }
        }
        TopKind::Active => {
            println!("{:<10} {:>10} {:>10}", "Symbol", "Activity", "P&L");
            for s in views::most_active(&result, n) {
                println!(
                    "{:<10} {:>10} {:>10}",
                    s.symbol,
                    s.activity_count(),
                    s.realized_pnl.round_dp(2),
                );
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_monthly(input: &PathBuf, config_path: Option<&PathBuf>) -> ExitCode {
    let (categories, _, _) = match resolve_options(config_path) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let result = match load_and_run(input, categories) {
        Ok(r) => r,
        Err(code) => return code,
    };

    println!(
        "{:<8} {:>12} {:>12} {:>8}",
        "Month", "P&L", "Dividends", "Matches"
    );
    for bucket in views::monthly_summary(&result) {
        println!(
            "{:<8} {:>12} {:>12} {:>8}",
            format!("{}-{:02}", bucket.year, bucket.month),
            bucket.realized_pnl.round_dp(2),
            bucket.dividends.round_dp(2),
            bucket.match_count,
        );
    }
    ExitCode::SUCCESS
}

fn run_validate(input: &PathBuf) -> ExitCode {
    let importer = CsvActivityAdapter::new();
    let records = match importer.load_activities(input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let result = PnLEngine::new(CategoryTable::empty()).run(&records);

    println!("{} records imported", records.len());
    println!(
        "{} symbols, {} matches, {} dividend entries",
        result.symbols.len(),
        result.matches.len(),
        result.dividends.len()
    );
    if result.warnings.is_empty() {
        println!("no data-quality warnings");
    } else {
        println!("{} data-quality warnings:", result.warnings.len());
        for warning in &result.warnings {
            println!("  {warning}");
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_is_case_insensitive() {
        assert_eq!(parse_output_format("json").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format(" Csv ").unwrap(), OutputFormat::Csv);
    }

    #[test]
    fn unrecognized_output_format_is_a_config_error() {
        let err = parse_output_format("yaml").unwrap_err();
        assert!(matches!(
            err,
            ReportError::ConfigInvalid { ref section, ref key, .. }
                if section.as_str() == "report" && key.as_str() == "output_format"
        ));
        assert!(err.to_string().contains("yaml"));
    }
}
