use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TradalyticsError;
use crate::types::Money;
use crate::TradalyticsResult;

pub const DEFAULT_INITIAL_BALANCE: Money = dec!(2000);
pub const DEFAULT_SETUP_FILTER_THRESHOLD: Money = dec!(400);
/// Largest accepted |P/L| or starting balance.
pub const MAX_ABS_AMOUNT: Money = dec!(1000000000000000);
/// Matches `June 4, 2025 9:41 PM` once any timezone suffix is removed.
pub const DEFAULT_DATE_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// What to do with rows whose timestamp could not be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndatedPolicy {
    /// Drop them from every statistic.
    #[default]
    Exclude,
    /// Keep them in totals and category rollups, leave them out of the
    /// time-ordered series.
    CountInTotals,
}

/// Header names for the columns that are matched by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub market: String,
    pub setup: String,
    pub pnl: String,
    pub outcome: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            market: "Market".into(),
            setup: "Setup".into(),
            pnl: "P/L".into(),
            outcome: "W/L".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub initial_balance: Money,
    /// Setups whose |net P/L| is at or below this are left out of the ranking.
    pub setup_filter_threshold: Money,
    /// chrono `strftime` syntax
    pub date_parse_format: String,
    pub undated_policy: UndatedPolicy,
    pub columns: ColumnNames,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            setup_filter_threshold: DEFAULT_SETUP_FILTER_THRESHOLD,
            date_parse_format: DEFAULT_DATE_FORMAT.to_string(),
            undated_policy: UndatedPolicy::default(),
            columns: ColumnNames::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> TradalyticsResult<()> {
        if self.initial_balance <= Decimal::ZERO {
            return Err(TradalyticsError::InvalidInput {
                field: "initial_balance".into(),
                reason: "Initial balance must be positive".into(),
            });
        }
        if self.initial_balance > MAX_ABS_AMOUNT {
            return Err(TradalyticsError::InvalidInput {
                field: "initial_balance".into(),
                reason: format!("Initial balance cannot exceed {MAX_ABS_AMOUNT}"),
            });
        }
        if self.setup_filter_threshold < Decimal::ZERO {
            return Err(TradalyticsError::InvalidInput {
                field: "setup_filter_threshold".into(),
                reason: "Setup filter threshold cannot be negative".into(),
            });
        }
        if self.date_parse_format.trim().is_empty() {
            return Err(TradalyticsError::InvalidInput {
                field: "date_parse_format".into(),
                reason: "Date format cannot be empty".into(),
            });
        }
        let names = [
            ("columns.market", &self.columns.market),
            ("columns.pnl", &self.columns.pnl),
            ("columns.outcome", &self.columns.outcome),
        ];
        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(TradalyticsError::InvalidInput {
                    field: field.into(),
                    reason: "Column name cannot be empty".into(),
                });
            }
        }
        Ok(())
    }
}
