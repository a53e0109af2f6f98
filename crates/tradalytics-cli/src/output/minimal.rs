use serde_json::Value;

use super::money::{as_decimal, format_currency_compact, format_fixed};

/// Print a one-line headline: trades, win rate, net P/L, profit factor.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);
    println!("{}", headline(result));
}

fn headline(result: &Value) -> String {
    let dec = |key: &str| result.get(key).and_then(as_decimal);
    let trades = result
        .get("total_trades")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let mut parts = vec![format!("trades: {}", trades)];
    if let Some(w) = dec("win_pct") {
        parts.push(format!("win rate: {}%", format_fixed(w)));
    }
    if let Some(p) = dec("total_pnl") {
        parts.push(format!("P/L: {}", format_currency_compact(p)));
    }
    if let Some(pf) = dec("profit_factor") {
        parts.push(format!("PF: {}", format_fixed(pf)));
    }
    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline() {
        let result = json!({
            "total_trades": 12,
            "win_pct": "58.333333",
            "total_pnl": "1000.25",
            "profit_factor": "2.0256",
        });
        assert_eq!(
            headline(&result),
            "trades: 12  win rate: 58.33%  P/L: $1k  PF: 2.03"
        );
    }

    #[test]
    fn test_headline_empty() {
        assert_eq!(headline(&json!({})), "trades: 0");
    }
}
