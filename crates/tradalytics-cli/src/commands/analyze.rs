use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use tradalytics_core::config::{AnalyticsConfig, UndatedPolicy};
use tradalytics_core::{analyze_journal, RawTable};

use crate::input;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

/// Arguments for trade journal analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a CSV export or a JSON row table ({"headers": [...], "rows": [[...]]})
    #[arg(long)]
    pub input: Option<String>,

    /// Input format; inferred from the file extension, CSV for stdin
    #[arg(long)]
    pub format: Option<InputFormat>,

    /// Path to a JSON analytics config; flags below override it
    #[arg(long)]
    pub config: Option<String>,

    /// Starting account balance for the equity curve
    #[arg(long)]
    pub initial_balance: Option<Decimal>,

    /// Setups with |net P/L| at or below this are left out of the ranking
    #[arg(long)]
    pub setup_threshold: Option<Decimal>,

    /// chrono format for the date/time column (e.g. "%Y-%m-%d %H:%M")
    #[arg(long)]
    pub date_format: Option<String>,

    /// Keep rows with unparseable dates in totals and category rollups
    #[arg(long)]
    pub count_undated: bool,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    let table = load_table(&args)?;
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "trade table loaded"
    );
    let result = analyze_journal(&table, &config)?;
    Ok(serde_json::to_value(result)?)
}

fn build_config(args: &AnalyzeArgs) -> Result<AnalyticsConfig, Box<dyn std::error::Error>> {
    let mut config: AnalyticsConfig = match args.config {
        Some(ref path) => input::file::read_json(path)?,
        None => AnalyticsConfig::default(),
    };
    if let Some(balance) = args.initial_balance {
        config.initial_balance = balance;
    }
    if let Some(threshold) = args.setup_threshold {
        config.setup_filter_threshold = threshold;
    }
    if let Some(ref fmt) = args.date_format {
        config.date_parse_format = fmt.clone();
    }
    if args.count_undated {
        config.undated_policy = UndatedPolicy::CountInTotals;
    }
    Ok(config)
}

fn load_table(args: &AnalyzeArgs) -> Result<RawTable, Box<dyn std::error::Error>> {
    let (text, inferred) = if let Some(ref path) = args.input {
        let format = if input::file::is_json_path(path) {
            InputFormat::Json
        } else {
            InputFormat::Csv
        };
        (input::file::read_text(path)?, format)
    } else if let Some(data) = input::stdin::read_stdin()? {
        (data, InputFormat::Csv)
    } else {
        return Err("--input <trades.csv> or stdin required for journal analysis".into());
    };

    match args.format.unwrap_or(inferred) {
        InputFormat::Csv => input::parse_csv(&text),
        InputFormat::Json => Ok(serde_json::from_str(&text)?),
    }
}
