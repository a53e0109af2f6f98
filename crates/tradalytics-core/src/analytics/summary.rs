use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::journal::{Outcome, TradeRecord};
use crate::types::{Money, Percent, Ratio};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Reported as `best_market` when there are no trades.
pub const NO_MARKET: &str = "none";

/// Scalar performance metrics. Undefined ratios are reported as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: Percent,
    pub loss_pct: Percent,
    pub avg_win: Money,
    pub avg_loss: Money,
    pub total_pnl: Money,
    pub gross_profit: Money,
    /// Positive magnitude of all losing P/L
    pub gross_loss: Money,
    pub profit_factor: Ratio,
    pub risk_reward_ratio: Ratio,
    pub expectancy: Money,
    pub trading_days: u32,
    pub avg_trades_per_day: Decimal,
    pub best_market: String,
    pub highest_win: Money,
    pub highest_loss: Money,
}

impl Default for PerformanceSummary {
    fn default() -> Self {
        Self {
            total_trades: 0,
            wins: 0,
            losses: 0,
            win_pct: Decimal::ZERO,
            loss_pct: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            total_pnl: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            profit_factor: Decimal::ZERO,
            risk_reward_ratio: Decimal::ZERO,
            expectancy: Decimal::ZERO,
            trading_days: 0,
            avg_trades_per_day: Decimal::ZERO,
            best_market: NO_MARKET.to_string(),
            highest_win: Decimal::ZERO,
            highest_loss: Decimal::ZERO,
        }
    }
}

pub fn compute_summary(records: &[TradeRecord]) -> PerformanceSummary {
    if records.is_empty() {
        return PerformanceSummary::default();
    }

    let win_pnls: Vec<Money> = pnls_for(records, Outcome::Win);
    let loss_pnls: Vec<Money> = pnls_for(records, Outcome::Loss);
    let wins = win_pnls.len() as u32;
    let losses = loss_pnls.len() as u32;
    let total_trades = wins + losses;
    let total = Decimal::from(total_trades);

    // -- Rates --
    let win_pct = Decimal::from(wins) * HUNDRED / total;
    let loss_pct = HUNDRED - win_pct;

    // -- Averages / extremes --
    let avg_win = mean(&win_pnls);
    let avg_loss = mean(&loss_pnls);
    let highest_win = win_pnls.iter().copied().max().unwrap_or(Decimal::ZERO);
    let highest_loss = loss_pnls.iter().copied().min().unwrap_or(Decimal::ZERO);

    // -- Gross figures (sign of P/L, not outcome label) --
    let total_pnl: Money = records.iter().map(|r| r.pnl).sum();
    let gross_profit: Money = records
        .iter()
        .map(|r| r.pnl)
        .filter(|p| *p > Decimal::ZERO)
        .sum();
    let gross_loss: Money = records
        .iter()
        .map(|r| r.pnl)
        .filter(|p| *p < Decimal::ZERO)
        .sum::<Decimal>()
        .abs();

    let profit_factor = safe_div(gross_profit, gross_loss);
    let risk_reward_ratio = safe_div(avg_win.abs(), avg_loss.abs());
    let expectancy = (win_pct * avg_win + loss_pct * avg_loss) / HUNDRED;

    // -- Cadence (dated trades only) --
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for ts in records.iter().filter_map(|r| r.timestamp) {
        *per_day.entry(ts.date()).or_insert(0) += 1;
    }
    let trading_days = per_day.len() as u32;
    let avg_trades_per_day = if per_day.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from(per_day.values().sum::<u32>()) / Decimal::from(trading_days)
    };

    PerformanceSummary {
        total_trades,
        wins,
        losses,
        win_pct,
        loss_pct,
        avg_win,
        avg_loss,
        total_pnl,
        gross_profit,
        gross_loss,
        profit_factor,
        risk_reward_ratio,
        expectancy,
        trading_days,
        avg_trades_per_day,
        best_market: best_market(records),
        highest_win,
        highest_loss,
    }
}

/// Market with the highest summed P/L; ties resolve to the first name.
pub fn best_market(records: &[TradeRecord]) -> String {
    let mut by_market: BTreeMap<&str, Money> = BTreeMap::new();
    for r in records {
        *by_market.entry(r.market.as_str()).or_default() += r.pnl;
    }
    let mut best: Option<(&str, Money)> = None;
    for (market, pnl) in by_market {
        if best.map_or(true, |(_, top)| pnl > top) {
            best = Some((market, pnl));
        }
    }
    best.map(|(m, _)| m.to_string())
        .unwrap_or_else(|| NO_MARKET.to_string())
}

fn pnls_for(records: &[TradeRecord], outcome: Outcome) -> Vec<Money> {
    records
        .iter()
        .filter(|r| r.outcome == outcome)
        .map(|r| r.pnl)
        .collect()
}

fn mean(values: &[Money]) -> Money {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len() as u64)
}

/// Zero instead of an undefined ratio.
fn safe_div(num: Decimal, den: Decimal) -> Decimal {
    if den.is_zero() {
        Decimal::ZERO
    } else {
        num / den
    }
}
