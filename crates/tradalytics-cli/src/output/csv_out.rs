use serde_json::Value;
use std::io;

/// Equity point fields in serialized (sorted) key order.
const EQUITY_HEADERS: [&str; 9] = [
    "cumulative_losses",
    "cumulative_wins",
    "drawdown",
    "drawdown_pct",
    "equity",
    "pnl",
    "running_max",
    "timestamp",
    "trade_number",
];

/// Write output as CSV to stdout.
///
/// An analytics result prints its equity curve, one row per trade; any
/// other value falls back to two-column `field,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);
    write_result_csv(&mut wtr, result);

    let _ = wtr.flush();
}

/// An empty equity curve still gets its header row.
fn write_result_csv<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Value) {
    match result.get("equity_curve") {
        Some(Value::Array(points)) if points.is_empty() => {
            let _ = wtr.write_record(EQUITY_HEADERS);
        }
        Some(Value::Array(points)) => write_array_csv(wtr, points),
        _ => write_fields_csv(wtr, result),
    }
}

fn write_fields_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let _ = wtr.write_record(["field", "value"]);
    if let Value::Object(map) = value {
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
        }
    } else {
        let _ = wtr.write_record(["value", &format_csv_value(value)]);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(points: &[Value]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_array_csv(&mut wtr, points);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_curve_writes_header() {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_result_csv(&mut wtr, &json!({"total_trades": 0, "equity_curve": []}));
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(
            out.trim_end(),
            "cumulative_losses,cumulative_wins,drawdown,drawdown_pct,equity,pnl,running_max,timestamp,trade_number"
        );
    }

    #[test]
    fn test_equity_curve_rows() {
        let points = vec![
            json!({"trade_number": 1, "equity": "2100", "timestamp": null}),
            json!({"trade_number": 2, "equity": "2050", "timestamp": null}),
        ];
        let out = render(&points);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        // keys are written in map order: equity, timestamp, trade_number
        assert_eq!(lines[1], "2100,,1");
    }
}
