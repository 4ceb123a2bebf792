//! Technical indicators over canonical bar sequences.
//!
//! Pure, total, deterministic functions: no I/O, no blocking, safe to call
//! repeatedly and concurrently. Every function accepts any normalized
//! sequence, including empty ones.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// Floor for the true range, avoiding division by zero on flat bars.
const TR_EPSILON: f64 = 1e-9;

/// Williams %R over a trailing window.
///
/// Indices with fewer than `length` bars of lookback yield NaN. A window
/// whose highest high equals its lowest low yields −50, the midpoint
/// convention. With `clamp` the result is bounded to `[-100, 0]`.
///
/// Window extrema come from monotonic deques, so the whole series is O(n);
/// the direct windowed scan is kept as the oracle in the behavior tests.
pub fn williams_r(bars: &[Bar], length: usize, clamp: bool) -> Vec<f64> {
    let mut out = vec![f64::NAN; bars.len()];
    if length == 0 {
        return out;
    }

    // Index deques: `highs` decreasing by high, `lows` increasing by low.
    let mut highs: VecDeque<usize> = VecDeque::new();
    let mut lows: VecDeque<usize> = VecDeque::new();

    for i in 0..bars.len() {
        while highs.back().is_some_and(|&j| bars[j].high <= bars[i].high) {
            highs.pop_back();
        }
        highs.push_back(i);

        while lows.back().is_some_and(|&j| bars[j].low >= bars[i].low) {
            lows.pop_back();
        }
        lows.push_back(i);

        if i + 1 < length {
            continue;
        }

        let start = i + 1 - length;
        while highs.front().is_some_and(|&j| j < start) {
            highs.pop_front();
        }
        while lows.front().is_some_and(|&j| j < start) {
            lows.pop_front();
        }

        let highest = bars[*highs.front().expect("window non-empty")].high;
        let lowest = bars[*lows.front().expect("window non-empty")].low;
        let range = highest - lowest;

        let wr = if range == 0.0 {
            -50.0
        } else {
            -100.0 * (highest - bars[i].close) / range
        };

        out[i] = if clamp { wr.clamp(-100.0, 0.0) } else { wr };
    }

    out
}

/// Ultimate Oscillator across three trailing windows.
///
/// Buying pressure and true range per bar use the previous close (the bar's
/// own close at index 0); the true range is floored to a small epsilon.
/// Every index gets a value: windows near the head of the series are simply
/// shorter than configured. Note the asymmetry with Williams %R, which does
/// have a NaN warm-up; callers wanting strict warm-up semantics here must
/// mask the first `slow - 1` values themselves.
pub fn ultimate_oscillator(bars: &[Bar], fast: usize, mid: usize, slow: usize) -> Vec<f64> {
    if bars.is_empty() {
        return Vec::new();
    }

    // Prefix sums of buying pressure and true range, one slot of padding.
    let mut bp_prefix = vec![0.0; bars.len() + 1];
    let mut tr_prefix = vec![0.0; bars.len() + 1];

    for (i, bar) in bars.iter().enumerate() {
        let prev_close = if i > 0 { bars[i - 1].close } else { bar.close };
        let low_side = bar.low.min(prev_close);
        let high_side = bar.high.max(prev_close);

        bp_prefix[i + 1] = bp_prefix[i] + (bar.close - low_side);
        tr_prefix[i + 1] = tr_prefix[i] + (high_side - low_side).max(TR_EPSILON);
    }

    let window_avg = |i: usize, len: usize| {
        let start = (i + 1).saturating_sub(len);
        let bp = bp_prefix[i + 1] - bp_prefix[start];
        let tr = tr_prefix[i + 1] - tr_prefix[start];
        if tr == 0.0 {
            0.0
        } else {
            bp / tr
        }
    };

    (0..bars.len())
        .map(|i| {
            let a_fast = window_avg(i, fast);
            let a_mid = window_avg(i, mid);
            let a_slow = window_avg(i, slow);
            100.0 * (4.0 * a_fast + 2.0 * a_mid + a_slow) / 7.0
        })
        .collect()
}

/// Close-over-prior-high breakout flags. Index 0 is always false.
pub fn breakout_flags(bars: &[Bar]) -> Vec<bool> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| i > 0 && bar.close > bars[i - 1].high)
        .collect()
}

/// Window lengths for the indicator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub wr_length: usize,
    pub wr_clamp: bool,
    pub uo_fast: usize,
    pub uo_mid: usize,
    pub uo_slow: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            wr_length: 14,
            wr_clamp: true,
            uo_fast: 7,
            uo_mid: 14,
            uo_slow: 28,
        }
    }
}

/// The three indicator series, index-aligned with the bars they were
/// computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub williams_r: Vec<f64>,
    pub ultimate_oscillator: Vec<f64>,
    pub breakout: Vec<bool>,
}

impl IndicatorSet {
    pub fn compute(bars: &[Bar], config: &IndicatorConfig) -> Self {
        Self {
            williams_r: williams_r(bars, config.wr_length, config.wr_clamp),
            ultimate_oscillator: ultimate_oscillator(
                bars,
                config.uo_fast,
                config.uo_mid,
                config.uo_slow,
            ),
            breakout: breakout_flags(bars),
        }
    }

    /// Latest values plus the composite long-setup reading: oversold on the
    /// prior bar (%R ≤ −90), %R turning up, the oscillator not falling, and a
    /// breakout on the latest bar.
    pub fn summary(&self) -> IndicatorSummary {
        let last = self.williams_r.len().checked_sub(1);

        let latest_wr = last
            .map(|i| self.williams_r[i])
            .filter(|v| v.is_finite())
            .unwrap_or(f64::NAN);
        let latest_uo = last
            .map(|i| self.ultimate_oscillator[i])
            .filter(|v| v.is_finite())
            .unwrap_or(f64::NAN);
        let latest_breakout = last.map(|i| self.breakout[i]).unwrap_or(false);

        let long_setup = last.is_some_and(|i| {
            i >= 2
                && self.williams_r[i - 1] <= -90.0
                && self.williams_r[i] > self.williams_r[i - 1]
                && self.ultimate_oscillator[i] >= self.ultimate_oscillator[i - 1]
                && self.breakout[i]
        });

        IndicatorSummary {
            latest_wr,
            latest_uo,
            latest_breakout,
            long_setup,
        }
    }
}

/// Snapshot of the latest indicator values.
///
/// NaN fields (insufficient lookback or an empty series) serialize as null.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSummary {
    pub latest_wr: f64,
    pub latest_uo: f64,
    pub latest_breakout: bool,
    pub long_setup: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar::new(time, open, high, low, close)
    }

    fn climbing_bars() -> Vec<Bar> {
        // Closes 10..=14, highs equal to close, lows two below.
        (0..5)
            .map(|i| {
                let close = 10.0 + i as f64;
                bar(i, close, close, close - 2.0, close)
            })
            .collect()
    }

    #[test]
    fn williams_r_warms_up_with_nan() {
        let wr = williams_r(&climbing_bars(), 3, true);
        assert!(wr[0].is_nan());
        assert!(wr[1].is_nan());
        assert!(wr[2].is_finite());
    }

    #[test]
    fn williams_r_matches_worked_example() {
        // Window [2, 3, 4]: highs 12,13,14; lows 10,11,12.
        // -100 * (14 - 14) / (14 - 10) = 0.
        let wr = williams_r(&climbing_bars(), 3, true);
        assert_eq!(wr[4], 0.0);
    }

    #[test]
    fn williams_r_flat_window_is_midpoint() {
        let flat: Vec<Bar> = (0..4).map(|i| bar(i, 5.0, 5.0, 5.0, 5.0)).collect();
        let wr = williams_r(&flat, 3, true);
        assert_eq!(wr[2], -50.0);
        assert_eq!(wr[3], -50.0);
    }

    #[test]
    fn williams_r_is_bounded_when_clamped() {
        let bars = vec![
            bar(0, 10.0, 12.0, 8.0, 9.0),
            bar(1, 9.0, 11.0, 7.0, 7.5),
            bar(2, 7.5, 9.0, 6.0, 8.8),
            bar(3, 8.8, 14.0, 8.0, 13.9),
        ];
        for value in williams_r(&bars, 2, true) {
            if value.is_finite() {
                assert!((-100.0..=0.0).contains(&value), "out of range: {value}");
            }
        }
    }

    #[test]
    fn williams_r_empty_and_short_inputs() {
        assert!(williams_r(&[], 14, true).is_empty());
        let bars = climbing_bars();
        assert!(williams_r(&bars[..2], 14, true).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ultimate_oscillator_has_no_warm_up() {
        let uo = ultimate_oscillator(&climbing_bars(), 7, 14, 28);
        assert_eq!(uo.len(), 5);
        assert!(uo.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn ultimate_oscillator_stays_in_bounds() {
        let bars = vec![
            bar(0, 10.0, 12.0, 8.0, 9.0),
            bar(1, 9.0, 11.0, 7.0, 7.5),
            bar(2, 7.5, 9.0, 6.0, 8.8),
            bar(3, 8.8, 14.0, 8.0, 13.9),
            bar(4, 13.9, 15.0, 12.0, 12.5),
        ];
        for value in ultimate_oscillator(&bars, 2, 3, 4) {
            assert!((0.0..=100.0).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn breakout_flags_match_contract() {
        let bars = vec![bar(0, 9.0, 9.0, 8.0, 10.0), bar(1, 10.0, 10.0, 9.0, 12.0)];
        assert_eq!(breakout_flags(&bars), vec![false, true]);
        assert!(breakout_flags(&[]).is_empty());
    }

    #[test]
    fn breakout_requires_strictly_higher_close() {
        let bars = vec![bar(0, 9.0, 10.0, 8.0, 9.0), bar(1, 9.0, 11.0, 9.0, 10.0)];
        // close == prior high is not a breakout
        assert_eq!(breakout_flags(&bars), vec![false, false]);
    }

    #[test]
    fn summary_of_empty_series_is_inert() {
        let set = IndicatorSet::compute(&[], &IndicatorConfig::default());
        let summary = set.summary();
        assert!(summary.latest_wr.is_nan());
        assert!(summary.latest_uo.is_nan());
        assert!(!summary.latest_breakout);
        assert!(!summary.long_setup);
    }

    #[test]
    fn long_setup_fires_on_oversold_reversal_with_breakout() {
        // Deep flush to the lows, then a strong close over the prior high.
        let bars = vec![
            bar(0, 10.0, 12.0, 8.0, 9.0),
            bar(1, 9.0, 11.5, 7.0, 7.1),
            bar(2, 7.1, 8.0, 6.5, 6.52),
            bar(3, 6.6, 9.5, 6.4, 9.4),
        ];
        let config = IndicatorConfig {
            wr_length: 3,
            ..IndicatorConfig::default()
        };
        let set = IndicatorSet::compute(&bars, &config);

        assert!(set.williams_r[2] <= -90.0, "wr[2]={}", set.williams_r[2]);
        assert!(set.breakout[3]);
        assert!(set.summary().long_setup);
    }
}
