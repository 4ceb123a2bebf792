use serde::{Deserialize, Serialize};

/// One OHLC price observation for a fixed time bucket.
///
/// `time` is unix seconds UTC. A `Bar` inside a canonical sequence always has
/// four finite price fields; raw vendor candidates may not, which is what
/// [`normalize`] filters for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub const fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}

/// Normalize raw vendor candidates into a canonical sequence.
///
/// Candidates with any non-finite field are dropped, the rest are stably
/// sorted ascending by time, then duplicates are collapsed keeping the last
/// entry per timestamp. Malformed input degrades to fewer elements, never to
/// an error, and the function is idempotent.
pub fn normalize(candidates: Vec<Bar>) -> Vec<Bar> {
    let finite: Vec<Bar> = candidates.into_iter().filter(Bar::is_finite).collect();
    sort_dedup_by_time(finite, |bar| bar.time)
}

/// Stable sort ascending by timestamp, then collapse duplicates keeping the
/// last entry among equal timestamps.
///
/// Shared by the bar normalizer and the positioning mapper so both canonical
/// sequences follow one ordering policy. Dedup runs as a second pass after
/// the stable sort, so "last" means last in post-sort order, which for equal
/// keys is the original input order.
pub fn sort_dedup_by_time<T>(items: Vec<T>, time: impl Fn(&T) -> i64) -> Vec<T> {
    let mut items = items;
    items.sort_by_key(|item| time(item));

    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let duplicate = out.last().is_some_and(|last| time(last) == time(&item));
        if duplicate {
            let slot = out.last_mut().expect("checked non-empty");
            *slot = item;
        } else {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, close: f64) -> Bar {
        Bar::new(time, close, close, close, close)
    }

    #[test]
    fn drops_non_finite_candidates() {
        let raw = vec![
            bar(1, 10.0),
            Bar::new(2, f64::NAN, 11.0, 9.0, 10.0),
            Bar::new(3, 10.0, f64::INFINITY, 9.0, 10.0),
            bar(4, 12.0),
        ];

        let out = normalize(raw);
        assert_eq!(out.iter().map(|b| b.time).collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn sorts_ascending_by_time() {
        let out = normalize(vec![bar(30, 3.0), bar(10, 1.0), bar(20, 2.0)]);
        assert_eq!(
            out.iter().map(|b| b.time).collect::<Vec<_>>(),
            vec![10, 20, 30]
        );
    }

    #[test]
    fn duplicate_timestamps_keep_the_later_entry() {
        let out = normalize(vec![bar(5, 1.0), bar(7, 9.0), bar(5, 2.0)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].time, 5);
        assert_eq!(out[0].close, 2.0);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(vec![bar(5, 1.0), bar(3, 4.0), bar(5, 2.0), bar(1, 0.5)]);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize(Vec::new()).is_empty());
    }
}
