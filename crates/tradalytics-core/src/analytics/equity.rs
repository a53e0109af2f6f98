use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::journal::TradeRecord;
use crate::types::{Money, Percent};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 1-based position in the time-ordered trade sequence
    pub trade_number: u32,
    pub timestamp: Option<NaiveDateTime>,
    pub pnl: Money,
    pub equity: Money,
    pub running_max: Money,
    /// equity - running_max, never positive
    pub drawdown: Money,
    pub drawdown_pct: Percent,
    pub cumulative_wins: u32,
    pub cumulative_losses: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownSummary {
    /// Most negative drawdown
    pub max_drawdown: Money,
    pub max_drawdown_pct: Percent,
    /// Mean over every point, at-peak points included
    pub avg_drawdown: Money,
    pub avg_drawdown_pct: Percent,
    /// Trade counts of closed drawdown episodes, in order
    pub recovery_periods: Vec<u32>,
    pub avg_recovery_period: Decimal,
    pub longest_recovery_period: u32,
    /// Length so far of an episode still open at the last trade
    pub open_drawdown_trades: Option<u32>,
}

// ---------------------------------------------------------------------------
// Equity curve
// ---------------------------------------------------------------------------

/// Build the equity curve from time-ordered records.
///
/// The running maximum starts at `initial_balance`, so a losing first
/// trade already sits in drawdown.
pub fn build_equity_curve<'a, I>(initial_balance: Money, records: I) -> Vec<EquityPoint>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut curve = Vec::new();
    let mut equity = initial_balance;
    let mut running_max = initial_balance;
    let mut wins: u32 = 0;
    let mut losses: u32 = 0;

    for (i, record) in records.into_iter().enumerate() {
        equity += record.pnl;
        if equity > running_max {
            running_max = equity;
        }
        if record.is_win() {
            wins += 1;
        } else {
            losses += 1;
        }
        let drawdown = equity - running_max;
        let drawdown_pct = if running_max.is_zero() {
            Decimal::ZERO
        } else {
            drawdown / running_max * HUNDRED
        };
        curve.push(EquityPoint {
            trade_number: i as u32 + 1,
            timestamp: record.timestamp,
            pnl: record.pnl,
            equity,
            running_max,
            drawdown,
            drawdown_pct,
            cumulative_wins: wins,
            cumulative_losses: losses,
        });
    }

    curve
}

// ---------------------------------------------------------------------------
// Drawdown statistics
// ---------------------------------------------------------------------------

pub fn summarize_drawdowns(curve: &[EquityPoint]) -> DrawdownSummary {
    if curve.is_empty() {
        return DrawdownSummary::default();
    }

    let n = Decimal::from(curve.len() as u64);
    let max_drawdown = curve.iter().map(|p| p.drawdown).min().unwrap_or_default();
    let max_drawdown_pct = curve.iter().map(|p| p.drawdown_pct).min().unwrap_or_default();
    let avg_drawdown = curve.iter().map(|p| p.drawdown).sum::<Decimal>() / n;
    let avg_drawdown_pct = curve.iter().map(|p| p.drawdown_pct).sum::<Decimal>() / n;

    let (recovery_periods, open_drawdown_trades) = recovery_periods(curve);
    let avg_recovery_period = if recovery_periods.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from(recovery_periods.iter().map(|&p| p as u64).sum::<u64>())
            / Decimal::from(recovery_periods.len() as u64)
    };
    let longest_recovery_period = recovery_periods.iter().copied().max().unwrap_or(0);

    DrawdownSummary {
        max_drawdown,
        max_drawdown_pct,
        avg_drawdown,
        avg_drawdown_pct,
        recovery_periods,
        avg_recovery_period,
        longest_recovery_period,
        open_drawdown_trades,
    }
}

/// Closed episode lengths plus the length of a trailing open episode.
///
/// An episode opens at the first point below its peak and closes at the
/// first later point back at or above it; its length is the index distance
/// between the two.
fn recovery_periods(curve: &[EquityPoint]) -> (Vec<u32>, Option<u32>) {
    let mut periods = Vec::new();
    let mut episode_start: Option<usize> = None;

    for (i, point) in curve.iter().enumerate() {
        match episode_start {
            None if point.drawdown < Decimal::ZERO => episode_start = Some(i),
            Some(start) if point.drawdown >= Decimal::ZERO => {
                periods.push((i - start) as u32);
                episode_start = None;
            }
            _ => {}
        }
    }

    let open = episode_start.map(|start| (curve.len() - start) as u32);
    (periods, open)
}
