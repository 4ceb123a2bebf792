use serde_json::Value;

use crate::adapters::field_f64;
use crate::domain::{parse_day, Bar};

/// Date field candidates, in priority order.
const DATE_KEYS: [&str; 3] = ["date", "reportedDate", "timestamp"];

/// Extract candidate bars from an FMP historical price document.
///
/// The endpoint has shipped several envelope shapes over time; the first
/// matching shape wins, in this priority order:
/// 1. bare array of row objects
/// 2. `{"historical": [...]}`
/// 3. `{"historicalStockList": [{"historical": [...]}]}`
/// 4. `{"data": [...]}`
///
/// Rows without a parseable date or a full finite OHLC set are skipped.
pub fn bars_from_historical(doc: &Value) -> Vec<Bar> {
    let Some(rows) = match_row_list(doc) else {
        return Vec::new();
    };

    rows.iter().filter_map(bar_from_row).collect()
}

/// Ordered shape matchers; each returns the row list or no match.
fn match_row_list(doc: &Value) -> Option<&Vec<Value>> {
    if let Some(rows) = doc.as_array() {
        return Some(rows);
    }
    if let Some(rows) = doc.get("historical").and_then(Value::as_array) {
        return Some(rows);
    }
    if let Some(rows) = doc
        .get("historicalStockList")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("historical"))
        .and_then(Value::as_array)
    {
        return Some(rows);
    }
    doc.get("data").and_then(Value::as_array)
}

fn bar_from_row(row: &Value) -> Option<Bar> {
    let time = DATE_KEYS
        .iter()
        .find_map(|key| row_time(row.get(key)?))?;

    Some(Bar::new(
        time,
        field_f64(row, "open")?,
        field_f64(row, "high")?,
        field_f64(row, "low")?,
        field_f64(row, "close")?,
    ))
}

/// A date value is either a day string or already epoch seconds.
fn row_time(value: &Value) -> Option<i64> {
    match value {
        Value::String(day) => parse_day(day),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}
