use serde::{Deserialize, Serialize};

use crate::config::ColumnNames;
use crate::error::TradalyticsError;
use crate::TradalyticsResult;

/// Column indices into a [`crate::types::RawTable`] header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub timestamp: usize,
    pub market: usize,
    pub pnl: usize,
    pub outcome: usize,
    pub setup: Option<usize>,
}

impl ColumnMap {
    /// Resolve the columns the normaliser needs.
    ///
    /// The time column is the first header containing "date" or "time"
    /// (case-insensitive). The remaining columns are matched by name. A
    /// missing required column is fatal; there is no fallback name.
    pub fn resolve(headers: &[String], names: &ColumnNames) -> TradalyticsResult<Self> {
        let timestamp = find_time_column(headers).ok_or_else(|| TradalyticsError::MissingColumn {
            column: "date/time".into(),
        })?;
        let market = require(headers, &names.market)?;
        let pnl = require(headers, &names.pnl)?;
        let outcome = require(headers, &names.outcome)?;
        let setup = find_named(headers, &names.setup);

        Ok(Self {
            timestamp,
            market,
            pnl,
            outcome,
            setup,
        })
    }
}

fn find_time_column(headers: &[String]) -> Option<usize> {
    headers.iter().position(|h| {
        let lower = h.to_lowercase();
        lower.contains("date") || lower.contains("time")
    })
}

fn find_named(headers: &[String], name: &str) -> Option<usize> {
    let wanted = name.trim();
    if wanted.is_empty() {
        return None;
    }
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
}

fn require(headers: &[String], name: &str) -> TradalyticsResult<usize> {
    find_named(headers, name).ok_or_else(|| TradalyticsError::MissingColumn {
        column: name.to_string(),
    })
}
