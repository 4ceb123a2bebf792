use serde::{Deserialize, Serialize};

/// One weekly positioning-report observation mapped into a three-group
/// net-position model.
///
/// Net fields are signed (long − short). Percentage fields are net divided by
/// open interest times 100 and are present only when open interest was known
/// and positive. Absent fields mean "unknown", which is distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CotPoint {
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_commercial_net: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_net: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_traders_net: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_commercial_net_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_net_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_traders_net_pct: Option<f64>,
}

/// Net position for one trader group: long − short, unknown when either side
/// is missing.
pub fn net(long: Option<f64>, short: Option<f64>) -> Option<f64> {
    match (long, short) {
        (Some(l), Some(s)) => Some(l - s),
        _ => None,
    }
}

/// Sum of possibly-unknown terms. Absent terms contribute 0, but when no term
/// is present at all the sum itself is unknown rather than a silent zero.
pub fn sum_present(terms: &[Option<f64>]) -> Option<f64> {
    let mut total = 0.0;
    let mut any = false;
    for term in terms.iter().flatten() {
        total += term;
        any = true;
    }
    any.then_some(total)
}

/// Directional read of the latest commercial positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CotBias {
    Bullish,
    Bearish,
    Neutral,
}

/// Snapshot of the most recent report week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CotSignal {
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_net: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_commercial_net: Option<f64>,
    pub bias: CotBias,
}

/// Classify the latest week against the previous one.
///
/// Bullish when commercial net is positive and rising, bearish when negative
/// and falling, neutral otherwise (including when the nets are unknown).
/// Expects an ascending sequence; returns `None` for empty input.
pub fn latest_signal(points: &[CotPoint]) -> Option<CotSignal> {
    let latest = points.last()?;
    let prev_net = points
        .len()
        .checked_sub(2)
        .and_then(|i| points[i].commercial_net);

    let bias = match latest.commercial_net {
        Some(current) => {
            let delta = current - prev_net.unwrap_or(0.0);
            if current > 0.0 && delta > 0.0 {
                CotBias::Bullish
            } else if current < 0.0 && delta < 0.0 {
                CotBias::Bearish
            } else {
                CotBias::Neutral
            }
        }
        None => CotBias::Neutral,
    };

    Some(CotSignal {
        time: latest.time,
        commercial_net: latest.commercial_net,
        non_commercial_net: latest.non_commercial_net,
        bias,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_requires_both_sides() {
        assert_eq!(net(Some(100.0), Some(40.0)), Some(60.0));
        assert_eq!(net(Some(100.0), None), None);
        assert_eq!(net(None, Some(40.0)), None);
    }

    #[test]
    fn sum_present_treats_absent_as_zero_but_not_all_absent() {
        assert_eq!(sum_present(&[Some(1.0), None, Some(2.0)]), Some(3.0));
        assert_eq!(sum_present(&[None, Some(-5.0)]), Some(-5.0));
        assert_eq!(sum_present(&[None, None, None]), None);
        assert_eq!(sum_present(&[]), None);
    }

    #[test]
    fn signal_is_bullish_when_positive_and_rising() {
        let points = [
            CotPoint {
                time: 1,
                commercial_net: Some(10.0),
                ..CotPoint::default()
            },
            CotPoint {
                time: 2,
                commercial_net: Some(25.0),
                ..CotPoint::default()
            },
        ];

        let signal = latest_signal(&points).expect("non-empty input");
        assert_eq!(signal.bias, CotBias::Bullish);
        assert_eq!(signal.time, 2);
    }

    #[test]
    fn signal_is_bearish_when_negative_and_falling() {
        let points = [
            CotPoint {
                time: 1,
                commercial_net: Some(-5.0),
                ..CotPoint::default()
            },
            CotPoint {
                time: 2,
                commercial_net: Some(-20.0),
                ..CotPoint::default()
            },
        ];

        assert_eq!(
            latest_signal(&points).expect("non-empty").bias,
            CotBias::Bearish
        );
    }

    #[test]
    fn single_point_compares_against_zero() {
        let points = [CotPoint {
            time: 1,
            commercial_net: Some(15.0),
            ..CotPoint::default()
        }];

        // Positive with an implied prior of zero counts as rising.
        assert_eq!(
            latest_signal(&points).expect("non-empty").bias,
            CotBias::Bullish
        );
    }

    #[test]
    fn unknown_net_is_neutral_and_empty_is_none() {
        let points = [CotPoint {
            time: 1,
            ..CotPoint::default()
        }];
        assert_eq!(
            latest_signal(&points).expect("non-empty").bias,
            CotBias::Neutral
        );
        assert!(latest_signal(&[]).is_none());
    }
}
