use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::{AnalyticsConfig, UndatedPolicy, MAX_ABS_AMOUNT};
use crate::error::TradalyticsError;
use crate::journal::columns::ColumnMap;
use crate::types::{Money, RawTable, RowDiagnostic};
use crate::TradalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

/// A single validated trade row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// 1-based data row index in the input table
    pub row: usize,
    /// None when the date cell could not be parsed
    pub timestamp: Option<NaiveDateTime>,
    pub market: String,
    pub setup: Option<String>,
    pub pnl: Money,
    pub outcome: Outcome,
}

impl TradeRecord {
    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }
}

/// Normaliser output: accepted records in time order plus everything that
/// was rejected or flagged along the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedJournal {
    /// Dated records ascending by timestamp, then undated records, input
    /// order preserved within ties.
    pub records: Vec<TradeRecord>,
    pub diagnostics: Vec<RowDiagnostic>,
    pub warnings: Vec<String>,
    /// Rows whose timestamp failed to parse (kept or dropped per policy)
    pub undated_rows: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Turn a raw row table into typed trade records.
///
/// Fails only when a required column cannot be resolved. Rows with a bad
/// P/L, outcome or market are rejected and reported in `diagnostics`; rows
/// with an unparseable timestamp are dropped, or kept with `timestamp: None`
/// under `UndatedPolicy::CountInTotals`.
pub fn normalize(table: &RawTable, config: &AnalyticsConfig) -> TradalyticsResult<NormalizedJournal> {
    let columns = ColumnMap::resolve(&table.headers, &config.columns)?;
    debug!(?columns, rows = table.rows.len(), "resolved journal columns");

    let mut journal = NormalizedJournal::default();

    for idx in 0..table.rows.len() {
        let row = idx + 1;
        let record = match parse_row(table, idx, &columns, &config.date_parse_format) {
            Ok(r) => r,
            Err(e) => {
                warn!(row, error = %e, "rejected trade row");
                if let Some(diag) = to_diagnostic(e) {
                    journal.diagnostics.push(diag);
                }
                continue;
            }
        };

        if record.timestamp.is_none() {
            journal.undated_rows += 1;
            let raw = table.cell(idx, columns.timestamp);
            warn!(row, value = raw, "unparseable trade timestamp");
            let action = match config.undated_policy {
                UndatedPolicy::CountInTotals => "kept in totals, left out of time series",
                UndatedPolicy::Exclude => "excluded",
            };
            journal
                .warnings
                .push(format!("Row {row}: unparseable timestamp '{raw}' ({action})"));
            if config.undated_policy == UndatedPolicy::Exclude {
                continue;
            }
        }

        if let Some(w) = outcome_mismatch(&record) {
            journal.warnings.push(w);
        }

        journal.records.push(record);
    }

    // Stable: equal timestamps keep input order, undated rows go last.
    journal
        .records
        .sort_by_key(|r| (r.timestamp.is_none(), r.timestamp));

    Ok(journal)
}

/// Remove a trailing timezone annotation such as ` (GMT+1)` or ` UTC`.
pub fn strip_timezone(raw: &str) -> &str {
    let s = raw.trim();
    if s.ends_with(')') {
        if let Some(open) = s.rfind('(') {
            return s[..open].trim_end();
        }
    }
    if let Some((head, last)) = s.rsplit_once(char::is_whitespace) {
        let upper = last.to_ascii_uppercase();
        let is_zone = ["GMT", "UTC"].iter().any(|z| {
            upper
                .strip_prefix(*z)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(|c: char| c == '+' || c == '-'))
        });
        if is_zone {
            return head.trim_end();
        }
    }
    s
}

/// Parse a date cell with `format`; date-only formats resolve to midnight.
pub fn parse_timestamp(raw: &str, format: &str) -> Option<NaiveDateTime> {
    let s = strip_timezone(raw);
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a currency-formatted amount: `$1,250.50`, `-75`, `(75.00)`.
pub fn parse_pnl(raw: &str) -> Result<Money, String> {
    let mut s = raw.trim();
    if s.is_empty() {
        return Err("empty value".into());
    }
    let mut negate = false;
    if s.starts_with('(') && s.ends_with(')') {
        negate = true;
        s = &s[1..s.len() - 1];
    }
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',') && !c.is_whitespace())
        .collect();
    let value = Decimal::from_str(&cleaned).map_err(|_| "not a number".to_string())?;
    if value.abs() > MAX_ABS_AMOUNT {
        return Err(format!("magnitude exceeds {MAX_ABS_AMOUNT}"));
    }
    Ok(if negate { -value } else { value })
}

pub fn parse_outcome(raw: &str) -> Result<Outcome, String> {
    match raw.trim() {
        "W" | "w" => Ok(Outcome::Win),
        "L" | "l" => Ok(Outcome::Loss),
        _ => Err("expected W or L".into()),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_row(
    table: &RawTable,
    idx: usize,
    columns: &ColumnMap,
    date_format: &str,
) -> TradalyticsResult<TradeRecord> {
    let row = idx + 1;
    let invalid = |field: &str, value: &str, reason: String| TradalyticsError::InvalidData {
        row,
        field: field.into(),
        value: value.into(),
        reason,
    };

    let pnl_raw = table.cell(idx, columns.pnl);
    let pnl = parse_pnl(pnl_raw).map_err(|reason| invalid("pnl", pnl_raw, reason))?;

    let outcome_raw = table.cell(idx, columns.outcome);
    let outcome = parse_outcome(outcome_raw).map_err(|reason| invalid("outcome", outcome_raw, reason))?;

    let market = table.cell(idx, columns.market).trim();
    if market.is_empty() {
        return Err(invalid("market", market, "empty value".into()));
    }

    let setup = columns
        .setup
        .map(|c| table.cell(idx, c).trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(TradeRecord {
        row,
        timestamp: parse_timestamp(table.cell(idx, columns.timestamp), date_format),
        market: market.to_string(),
        setup,
        pnl,
        outcome,
    })
}

fn to_diagnostic(err: TradalyticsError) -> Option<RowDiagnostic> {
    match err {
        TradalyticsError::InvalidData {
            row,
            field,
            value,
            reason,
        } => Some(RowDiagnostic {
            row,
            field,
            value,
            reason,
        }),
        _ => None,
    }
}

fn outcome_mismatch(record: &TradeRecord) -> Option<String> {
    let mismatch = match record.outcome {
        Outcome::Win => record.pnl < Decimal::ZERO,
        Outcome::Loss => record.pnl > Decimal::ZERO,
    };
    mismatch.then(|| {
        format!(
            "Row {}: outcome {:?} disagrees with P/L {}",
            record.row, record.outcome, record.pnl
        )
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
