use serde_json::Value;

use crate::adapters::finite_f64;
use crate::domain::Bar;

/// Extract candidate bars from a Finnhub candle document.
///
/// The document carries parallel arrays `t`/`o`/`h`/`l`/`c` plus a status
/// flag `s`. A status other than `"ok"` or any missing array yields an empty
/// result. Arrays are truncated to the shortest common length before zipping,
/// guarding against vendor-side length mismatches.
pub fn bars_from_candles(doc: &Value) -> Vec<Bar> {
    if doc.get("s").and_then(Value::as_str) != Some("ok") {
        return Vec::new();
    }

    let Some((times, opens, highs, lows, closes)) = candle_arrays(doc) else {
        return Vec::new();
    };

    let len = times
        .len()
        .min(opens.len())
        .min(highs.len())
        .min(lows.len())
        .min(closes.len());

    (0..len)
        .filter_map(|i| {
            let time = times[i].as_i64()?;
            Some(Bar::new(
                time,
                finite_f64(&opens[i])?,
                finite_f64(&highs[i])?,
                finite_f64(&lows[i])?,
                finite_f64(&closes[i])?,
            ))
        })
        .collect()
}

fn candle_arrays(doc: &Value) -> Option<(&[Value], &[Value], &[Value], &[Value], &[Value])> {
    Some((
        doc.get("t")?.as_array()?.as_slice(),
        doc.get("o")?.as_array()?.as_slice(),
        doc.get("h")?.as_array()?.as_slice(),
        doc.get("l")?.as_array()?.as_slice(),
        doc.get("c")?.as_array()?.as_slice(),
    ))
}
