use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::journal::{Outcome, TradeRecord};
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub name: String,
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub net_pnl: Money,
}

impl CategoryStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trades: 0,
            wins: 0,
            losses: 0,
            net_pnl: Decimal::ZERO,
        }
    }

    fn add(&mut self, record: &TradeRecord) {
        self.trades += 1;
        match record.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
        }
        self.net_pnl += record.pnl;
    }
}

/// Per-market and per-setup rollups with their display orderings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub markets: BTreeMap<String, CategoryStats>,
    /// Win count descending
    pub markets_by_wins: Vec<CategoryStats>,
    /// Net P/L descending
    pub markets_by_pnl: Vec<CategoryStats>,
    /// Every setup, unfiltered
    pub setups: BTreeMap<String, CategoryStats>,
    /// Setups with |net P/L| above the noise threshold, net P/L descending
    pub setup_ranking: Vec<CategoryStats>,
}

pub fn group_by<F>(records: &[TradeRecord], key: F) -> BTreeMap<String, CategoryStats>
where
    F: Fn(&TradeRecord) -> Option<&str>,
{
    let mut groups: BTreeMap<String, CategoryStats> = BTreeMap::new();
    for record in records {
        if let Some(name) = key(record) {
            groups
                .entry(name.to_string())
                .or_insert_with(|| CategoryStats::new(name))
                .add(record);
        }
    }
    groups
}

/// Build both market orderings and the filtered setup ranking.
///
/// Ties in every ordering fall back to category name.
pub fn aggregate_categories(records: &[TradeRecord], setup_threshold: Money) -> CategoryBreakdown {
    let markets = group_by(records, |r| Some(r.market.as_str()));
    let setups = group_by(records, |r| r.setup.as_deref());

    let mut markets_by_wins: Vec<CategoryStats> = markets.values().cloned().collect();
    markets_by_wins.sort_by(|a, b| b.wins.cmp(&a.wins));

    let mut markets_by_pnl: Vec<CategoryStats> = markets.values().cloned().collect();
    markets_by_pnl.sort_by(|a, b| b.net_pnl.cmp(&a.net_pnl));

    let mut setup_ranking: Vec<CategoryStats> = setups
        .values()
        .filter(|s| s.net_pnl.abs() > setup_threshold)
        .cloned()
        .collect();
    setup_ranking.sort_by(|a, b| b.net_pnl.cmp(&a.net_pnl));

    CategoryBreakdown {
        markets,
        markets_by_wins,
        markets_by_pnl,
        setups,
        setup_ranking,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rec(market: &str, setup: Option<&str>, pnl: Decimal) -> TradeRecord {
        TradeRecord {
            row: 0,
            timestamp: None,
            market: market.into(),
            setup: setup.map(str::to_string),
            pnl,
            outcome: if pnl > Decimal::ZERO { Outcome::Win } else { Outcome::Loss },
        }
    }

    fn names(stats: &[CategoryStats]) -> Vec<&str> {
        stats.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_market_orderings_are_independent() {
        let records = vec![
            rec("ES", Some("ORB"), dec!(10)),
            rec("ES", Some("ORB"), dec!(10)),
            rec("ES", Some("ORB"), dec!(-100)),
            rec("NQ", Some("VWAP"), dec!(500)),
            rec("CL", None, dec!(-20)),
        ];
        let b = aggregate_categories(&records, dec!(400));

        assert_eq!(b.markets["ES"].wins, 2);
        assert_eq!(b.markets["ES"].losses, 1);
        assert_eq!(b.markets["ES"].net_pnl, dec!(-80));
        assert_eq!(b.markets["ES"].trades, 3);

        assert_eq!(names(&b.markets_by_wins), vec!["ES", "NQ", "CL"]);
        assert_eq!(names(&b.markets_by_pnl), vec!["NQ", "CL", "ES"]);
    }

    #[test]
    fn test_setup_noise_filter() {
        let records = vec![
            rec("ES", Some("ORB"), dec!(400)),
            rec("ES", Some("Fade"), dec!(-401)),
            rec("NQ", Some("VWAP"), dec!(900)),
            rec("NQ", Some("Scalp"), dec!(-50)),
            rec("CL", None, dec!(1000)),
        ];
        let b = aggregate_categories(&records, dec!(400));

        assert_eq!(b.setups.len(), 4);
        // 400 sits on the threshold and is filtered out
        assert_eq!(names(&b.setup_ranking), vec!["VWAP", "Fade"]);
    }

    #[test]
    fn test_threshold_zero_keeps_nonzero_setups() {
        let records = vec![
            rec("ES", Some("ORB"), dec!(5)),
            rec("ES", Some("Flat"), dec!(5)),
            rec("ES", Some("Flat"), dec!(-5)),
        ];
        let b = aggregate_categories(&records, Decimal::ZERO);
        assert_eq!(names(&b.setup_ranking), vec!["ORB"]);
    }

    #[test]
    fn test_ties_fall_back_to_name() {
        let records = vec![rec("ZN", None, dec!(10)), rec("6E", None, dec!(10))];
        let b = aggregate_categories(&records, dec!(400));
        assert_eq!(names(&b.markets_by_wins), vec!["6E", "ZN"]);
        assert_eq!(names(&b.markets_by_pnl), vec!["6E", "ZN"]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(aggregate_categories(&[], dec!(400)), CategoryBreakdown::default());
    }
}
