//! Vendor feed adapters.
//!
//! Each adapter accepts one vendor's raw JSON document and produces candidate
//! records for the canonical normalizers. Upstream payloads are duck-typed,
//! so adapters work over [`serde_json::Value`] with a tolerant extraction
//! policy: numeric fields may arrive as JSON numbers or numeric strings, and
//! anything that fails a strict finite check is dropped record-by-record.
//! Adapters never error; malformed documents degrade to fewer or zero
//! candidates.
//!
//! | Adapter | Vendor document |
//! |---------|-----------------|
//! | [`alphavantage`] | daily time series keyed by ISO date |
//! | [`finnhub`] | parallel candle arrays with a status flag |
//! | [`fmp`] | historical list in several shape variants |
//! | [`cftc`] | weekly positioning report rows |

pub mod alphavantage;
pub mod cftc;
pub mod finnhub;
pub mod fmp;

use serde_json::Value;

/// Extract a finite number from a JSON value, accepting numbers and numeric
/// strings. Non-finite results are rejected.
pub(crate) fn finite_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Extract a finite number from an object field.
pub(crate) fn field_f64(object: &Value, key: &str) -> Option<f64> {
    finite_f64(object.get(key)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(finite_f64(&json!(12.5)), Some(12.5));
        assert_eq!(finite_f64(&json!("12.5")), Some(12.5));
        assert_eq!(finite_f64(&json!(" 7 ")), Some(7.0));
    }

    #[test]
    fn rejects_non_numeric_and_non_finite() {
        assert_eq!(finite_f64(&json!("abc")), None);
        assert_eq!(finite_f64(&json!(null)), None);
        assert_eq!(finite_f64(&json!(["1"])), None);
        assert_eq!(finite_f64(&json!("NaN")), None);
        assert_eq!(finite_f64(&json!("inf")), None);
    }
}
