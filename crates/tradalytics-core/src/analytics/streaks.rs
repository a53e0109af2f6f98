use serde::{Deserialize, Serialize};

use crate::journal::Outcome;

/// A maximal run of identical consecutive outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub outcome: Outcome,
    pub length: u32,
    /// 1-based trade number where the run begins
    pub start_trade: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub streaks: Vec<Streak>,
    pub highest_win_streak: u32,
    pub highest_loss_streak: u32,
    /// The run still in progress at the last trade
    pub current_streak: Option<Streak>,
}

/// Run-length encode an outcome sequence.
pub fn detect_streaks<I>(outcomes: I) -> Vec<Streak>
where
    I: IntoIterator<Item = Outcome>,
{
    let mut streaks = Vec::new();
    let mut current: Option<Streak> = None;

    for (i, outcome) in outcomes.into_iter().enumerate() {
        if let Some(run) = current.as_mut() {
            if run.outcome == outcome {
                run.length += 1;
                continue;
            }
        }
        let next = Streak {
            outcome,
            length: 1,
            start_trade: i as u32 + 1,
        };
        if let Some(closed) = current.replace(next) {
            streaks.push(closed);
        }
    }
    if let Some(run) = current {
        streaks.push(run);
    }

    streaks
}

pub fn summarize_streaks(streaks: Vec<Streak>) -> StreakSummary {
    let longest = |wanted: Outcome| {
        streaks
            .iter()
            .filter(|s| s.outcome == wanted)
            .map(|s| s.length)
            .max()
            .unwrap_or(0)
    };
    let highest_win_streak = longest(Outcome::Win);
    let highest_loss_streak = longest(Outcome::Loss);
    let current_streak = streaks.last().copied();

    StreakSummary {
        streaks,
        highest_win_streak,
        highest_loss_streak,
        current_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Outcome::{Loss as L, Win as W};

    #[test]
    fn test_runs_split_on_change() {
        let streaks = detect_streaks([W, W, L, W]);
        assert_eq!(
            streaks,
            vec![
                Streak { outcome: W, length: 2, start_trade: 1 },
                Streak { outcome: L, length: 1, start_trade: 3 },
                Streak { outcome: W, length: 1, start_trade: 4 },
            ]
        );
        let s = summarize_streaks(streaks);
        assert_eq!(s.highest_win_streak, 2);
        assert_eq!(s.highest_loss_streak, 1);
        assert_eq!(s.current_streak.map(|c| c.outcome), Some(W));
    }

    #[test]
    fn test_single_run() {
        let s = summarize_streaks(detect_streaks([L, L, L]));
        assert_eq!(s.streaks.len(), 1);
        assert_eq!(s.highest_loss_streak, 3);
        assert_eq!(s.highest_win_streak, 0);
    }

    #[test]
    fn test_empty_sequence() {
        let s = summarize_streaks(detect_streaks(Vec::<Outcome>::new()));
        assert!(s.streaks.is_empty());
        assert_eq!(s.highest_win_streak, 0);
        assert_eq!(s.highest_loss_streak, 0);
        assert!(s.current_streak.is_none());
    }

    #[test]
    fn test_lengths_sum_to_outcome_counts() {
        let seq = [W, L, L, W, W, W, L, W, L, L, L, W];
        let streaks = detect_streaks(seq);
        let win_total: u32 = streaks.iter().filter(|s| s.outcome == W).map(|s| s.length).sum();
        let loss_total: u32 = streaks.iter().filter(|s| s.outcome == L).map(|s| s.length).sum();
        assert_eq!(win_total as usize, seq.iter().filter(|o| **o == W).count());
        assert_eq!(loss_total as usize, seq.iter().filter(|o| **o == L).count());
        // adjacent runs always differ
        assert!(streaks.windows(2).all(|w| w[0].outcome != w[1].outcome));
    }
}
