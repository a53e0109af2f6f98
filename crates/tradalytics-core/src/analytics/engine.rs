use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::analytics::categories::{aggregate_categories, CategoryBreakdown};
use crate::analytics::equity::{build_equity_curve, summarize_drawdowns, DrawdownSummary, EquityPoint};
use crate::analytics::streaks::{detect_streaks, summarize_streaks, StreakSummary};
use crate::analytics::summary::{compute_summary, PerformanceSummary};
use crate::config::AnalyticsConfig;
use crate::journal::{normalize, NormalizedJournal, TradeRecord};
use crate::types::*;
use crate::TradalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything derived from one trade journal. Built once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    #[serde(flatten)]
    pub summary: PerformanceSummary,
    /// Trades with a usable timestamp, i.e. points on the equity curve
    pub dated_trades: u32,
    /// Rows whose timestamp failed to parse, whether kept or dropped
    pub undated_trades: u32,
    pub rejected_rows: u32,
    #[serde(flatten)]
    pub drawdown: DrawdownSummary,
    #[serde(flatten)]
    pub streaks: StreakSummary,
    #[serde(flatten)]
    pub categories: CategoryBreakdown,
    pub equity_curve: Vec<EquityPoint>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalise a raw trade table and derive the full analytics result.
///
/// Only configuration errors and unresolvable columns fail the run. Rejected
/// rows travel in `diagnostics`; an empty journal yields an all-zero result.
pub fn analyze_journal(
    table: &RawTable,
    config: &AnalyticsConfig,
) -> TradalyticsResult<ComputationOutput<AnalyticsResult>> {
    let start = Instant::now();

    config.validate()?;
    let journal = normalize(table, config)?;
    let result = analyze_normalized(&journal, config);

    let mut warnings = journal.warnings;
    if result.summary.total_trades == 0 {
        warnings.push("No valid trade rows; analytics are empty".into());
    }

    info!(
        trades = result.summary.total_trades,
        rejected = result.rejected_rows,
        undated = result.undated_trades,
        "trade journal analysed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Trade Journal Performance Analytics",
        &serde_json::json!({
            "initial_balance": config.initial_balance.to_string(),
            "setup_filter_threshold": config.setup_filter_threshold.to_string(),
            "date_parse_format": config.date_parse_format,
            "undated_policy": config.undated_policy,
            "running_max": "seeded with initial balance",
            "recovery_period": "closed drawdown episodes only",
            "undefined_ratios": "reported as zero",
        }),
        warnings,
        journal.diagnostics,
        elapsed,
        result,
    ))
}

/// Derive analytics from an already-normalised journal.
pub fn analyze_normalized(journal: &NormalizedJournal, config: &AnalyticsConfig) -> AnalyticsResult {
    let mut result = analyze_records(&journal.records, config);
    result.undated_trades = journal.undated_rows as u32;
    result.rejected_rows = journal.diagnostics.len() as u32;
    result
}

/// Derive analytics from time-ordered records.
///
/// Undated records that reach this point count toward totals and
/// categories but not toward the equity curve or streaks.
pub fn analyze_records(records: &[TradeRecord], config: &AnalyticsConfig) -> AnalyticsResult {
    let dated: Vec<&TradeRecord> = records.iter().filter(|r| r.timestamp.is_some()).collect();
    debug!(
        records = records.len(),
        dated = dated.len(),
        "deriving trade analytics"
    );

    let equity_curve = build_equity_curve(config.initial_balance, dated.iter().copied());
    let drawdown = summarize_drawdowns(&equity_curve);
    let streaks = summarize_streaks(detect_streaks(dated.iter().map(|r| r.outcome)));
    let summary = compute_summary(records);
    let categories = aggregate_categories(records, config.setup_filter_threshold);

    AnalyticsResult {
        summary,
        dated_trades: dated.len() as u32,
        undated_trades: (records.len() - dated.len()) as u32,
        rejected_rows: 0,
        drawdown,
        streaks,
        categories,
        equity_curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UndatedPolicy;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn table(rows: &[[&str; 4]]) -> RawTable {
        RawTable::new(
            ["Date", "Market", "P/L", "W/L"].iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_undated_rows_counted_in_totals_only() {
        let t = table(&[
            ["June 2, 2025 9:00 AM", "NQ", "$100", "W"],
            ["??", "ES", "-$40", "L"],
            ["June 3, 2025 9:00 AM", "NQ", "$20", "W"],
        ]);
        let cfg = AnalyticsConfig {
            undated_policy: UndatedPolicy::CountInTotals,
            ..Default::default()
        };
        let out = analyze_journal(&t, &cfg).unwrap();
        let r = &out.result;
        assert_eq!(r.summary.total_trades, 3);
        assert_eq!(r.summary.total_pnl, dec!(80));
        assert_eq!(r.dated_trades, 2);
        assert_eq!(r.undated_trades, 1);
        assert_eq!(r.equity_curve.len(), 2);
        assert_eq!(r.streaks.highest_win_streak, 2);
        assert_eq!(r.categories.markets["ES"].losses, 1);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_undated_rows_dropped_by_default() {
        let t = table(&[
            ["June 2, 2025 9:00 AM", "NQ", "$100", "W"],
            ["??", "ES", "-$40", "L"],
            ["June 3, 2025 9:00 AM", "NQ", "$20", "W"],
        ]);
        let out = analyze_journal(&t, &AnalyticsConfig::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.summary.total_trades, 2);
        assert_eq!(r.summary.total_pnl, dec!(120));
        assert_eq!(r.dated_trades, 2);
        assert_eq!(r.undated_trades, 1);
        assert!(!r.categories.markets.contains_key("ES"));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_oversized_pnl_rejected_not_summed() {
        let t = table(&[
            ["June 2, 2025 9:00 AM", "NQ", "79228162514264337593543950335", "W"],
            ["June 2, 2025 10:00 AM", "NQ", "79228162514264337593543950335", "W"],
            ["June 2, 2025 11:00 AM", "NQ", "$20", "W"],
        ]);
        let out = analyze_journal(&t, &AnalyticsConfig::default()).unwrap();
        assert_eq!(out.diagnostics.len(), 2);
        assert_eq!(out.diagnostics[0].field, "pnl");
        assert_eq!(out.result.summary.total_pnl, dec!(20));
        assert_eq!(out.result.rejected_rows, 2);
    }

    #[test]
    fn test_config_error_is_fatal() {
        let cfg = AnalyticsConfig {
            initial_balance: Decimal::ZERO,
            ..Default::default()
        };
        assert!(analyze_journal(&table(&[]), &cfg).is_err());
    }

    #[test]
    fn test_empty_table_warns_without_failing() {
        let out = analyze_journal(&table(&[]), &AnalyticsConfig::default()).unwrap();
        assert_eq!(out.result, AnalyticsResult::default());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_result_serialises_flat() {
        let t = table(&[["June 2, 2025 9:00 AM", "NQ", "$100", "W"]]);
        let out = analyze_journal(&t, &AnalyticsConfig::default()).unwrap();
        let value = serde_json::to_value(&out).unwrap();
        let result = &value["result"];
        assert_eq!(result["wins"], 1);
        assert_eq!(result["best_market"], "NQ");
        assert_eq!(result["highest_win_streak"], 1);
        assert!(result["equity_curve"].is_array());
        assert!(result["markets_by_pnl"].is_array());
        assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
    }
}
