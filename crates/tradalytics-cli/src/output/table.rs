use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::money::{as_decimal, format_currency_compact, format_fixed, MONEY_FIELDS};

/// Format an analytics envelope as a set of tables.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };
    let Some(Value::Object(result)) = envelope.get("result") else {
        print_field_table(envelope);
        return;
    };

    print_field_table(result);

    if let Some(Value::Array(markets)) = result.get("markets_by_pnl") {
        println!("\nMarkets (by net P/L):");
        print_category_table(markets);
    }
    if let Some(Value::Array(setups)) = result.get("setup_ranking") {
        if !setups.is_empty() {
            println!("\nSetups (filtered, by net P/L):");
            print_category_table(setups);
        }
    }

    if let Some(Value::Array(diags)) = envelope.get("diagnostics") {
        if !diags.is_empty() {
            println!("\nRejected rows:");
            print_array_table(diags);
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalar fields only; series and groupings get their own tables.
fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if matches!(val, Value::Array(_) | Value::Object(_)) {
            continue;
        }
        builder.push_record([key.clone(), format_field(key, val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_category_table(rows: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Name", "Trades", "Wins", "Losses", "Net P/L"]);
    for row in rows.iter().filter_map(Value::as_object) {
        let cell = |k: &str| row.get(k).map(|v| format_field(k, v)).unwrap_or_default();
        builder.push_record([
            cell("name"),
            cell("trades"),
            cell("wins"),
            cell("losses"),
            cell("net_pnl"),
        ]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn format_field(key: &str, value: &Value) -> String {
    match as_decimal(value) {
        Some(d) if MONEY_FIELDS.contains(&key) => format_currency_compact(d),
        Some(d) if matches!(value, Value::String(_)) => format_fixed(d),
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
