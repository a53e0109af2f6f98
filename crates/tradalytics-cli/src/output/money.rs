use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// Result fields that hold currency amounts.
pub const MONEY_FIELDS: &[&str] = &[
    "total_pnl",
    "gross_profit",
    "gross_loss",
    "avg_win",
    "avg_loss",
    "expectancy",
    "highest_win",
    "highest_loss",
    "max_drawdown",
    "avg_drawdown",
    "net_pnl",
];

/// Decimals arrive as JSON strings; plain numbers are accepted too.
pub fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// Short dashboard-style amount: `$1.2M`, `$3k`, `$950`, `-$75`.
pub fn format_currency_compact(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    let abs = value.abs();
    let body = if abs >= Decimal::from(1_000_000) {
        format!("{:.1}M", round(abs / Decimal::from(1_000_000), 1))
    } else if abs >= Decimal::from(1_000) {
        format!("{}k", round(abs / Decimal::from(1_000), 0))
    } else {
        abs.trunc().to_string()
    };
    format!("{sign}${body}")
}

/// Fixed two-place rendering for rates and ratios.
pub fn format_fixed(value: Decimal) -> String {
    format!("{:.2}", round(value, 2))
}

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compact_currency() {
        assert_eq!(format_currency_compact(dec!(1250000)), "$1.2M");
        assert_eq!(format_currency_compact(dec!(2000000)), "$2.0M");
        assert_eq!(format_currency_compact(dec!(-3000000)), "-$3.0M");
        assert_eq!(format_currency_compact(dec!(3400)), "$3k");
        assert_eq!(format_currency_compact(dec!(950.75)), "$950");
        assert_eq!(format_currency_compact(dec!(-75)), "-$75");
        assert_eq!(format_currency_compact(Decimal::ZERO), "$0");
    }

    #[test]
    fn test_as_decimal() {
        assert_eq!(as_decimal(&Value::String("58.3333".into())), Some(dec!(58.3333)));
        assert_eq!(as_decimal(&serde_json::json!(12)), Some(dec!(12)));
        assert_eq!(as_decimal(&Value::Null), None);
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(dec!(2.333333)), "2.33");
        assert_eq!(format_fixed(dec!(75)), "75.00");
    }
}
