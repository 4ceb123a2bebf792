use serde_json::Value;

use crate::adapters::field_f64;
use crate::domain::{parse_day, Bar};

const SERIES_KEY: &str = "Time Series (Daily)";

/// Extract candidate bars from an Alpha Vantage daily time series document.
///
/// The document maps ISO date strings to objects with `"1. open"` through
/// `"4. close"` fields. A missing series key yields an empty result, not an
/// error. Candidates are unordered; callers route them through
/// [`crate::domain::normalize`].
pub fn bars_from_daily_series(doc: &Value) -> Vec<Bar> {
    let Some(series) = doc.get(SERIES_KEY).and_then(Value::as_object) else {
        return Vec::new();
    };

    series
        .iter()
        .filter_map(|(date, fields)| {
            let time = parse_day(date)?;
            Some(Bar::new(
                time,
                field_f64(fields, "1. open")?,
                field_f64(fields, "2. high")?,
                field_f64(fields, "3. low")?,
                field_f64(fields, "4. close")?,
            ))
        })
        .collect()
}
