use serde_json::Value;

use crate::adapters::field_f64;
use crate::domain::{net, parse_day, sort_dedup_by_time, sum_present, CotPoint};

/// Report date candidates, in priority order.
const DATE_KEYS: [&str; 3] = ["report_date_as_yyyy_mm_dd", "report_date", "date"];

/// Open interest candidates, in priority order.
const OPEN_INTEREST_KEYS: [&str; 3] = ["open_interest_all", "oi_all", "open_interest"];

/// Map Traders-in-Financial-Futures report rows into canonical positioning
/// points.
///
/// The report splits positioning across five trader groups; the canonical
/// model approximates a three-group view:
/// - commercial = dealers
/// - non-commercial = asset managers + leveraged money + other reportables
/// - small traders = non-reportables
///
/// A group net is long − short and unknown when either side is missing. The
/// non-commercial sum counts unknown terms as 0 but stays unknown when no
/// term is present. Percent-of-open-interest fields are emitted only when
/// open interest is known and positive.
///
/// Rows without a parseable report date are skipped. Output is deduplicated
/// by date (last row wins) and sorted ascending, following the same policy as
/// the bar normalizer. Non-array input yields an empty result.
pub fn cot_points_from_tff_rows(doc: &Value) -> Vec<CotPoint> {
    let Some(rows) = doc.as_array() else {
        return Vec::new();
    };

    let points = rows.iter().filter_map(point_from_row).collect();
    sort_dedup_by_time(points, |point: &CotPoint| point.time)
}

fn point_from_row(row: &Value) -> Option<CotPoint> {
    let time = DATE_KEYS
        .iter()
        .find_map(|key| parse_day(row.get(key)?.as_str()?))?;

    let dealer = group_net(row, "dealer");
    let asset_mgr = group_net(row, "asset_mgr");
    let lev_money = group_net(row, "lev_money");
    let other_rept = group_net(row, "other_rept");
    let nonrept = group_net(row, "nonrept");

    let commercial_net = dealer;
    let non_commercial_net = sum_present(&[asset_mgr, lev_money, other_rept]);
    let small_traders_net = nonrept;

    let open_interest = OPEN_INTEREST_KEYS
        .iter()
        .find_map(|key| field_f64(row, key))
        .filter(|oi| *oi > 0.0);

    let pct = |value: Option<f64>| Some(value? / open_interest? * 100.0);

    Some(CotPoint {
        time,
        non_commercial_net,
        commercial_net,
        small_traders_net,
        non_commercial_net_pct: pct(non_commercial_net),
        commercial_net_pct: pct(commercial_net),
        small_traders_net_pct: pct(small_traders_net),
    })
}

/// Long/short pair for one trader group, e.g. `dealer_positions_long_all`.
fn group_net(row: &Value, group: &str) -> Option<f64> {
    let long = field_f64(row, &format!("{group}_positions_long_all"));
    let short = field_f64(row, &format!("{group}_positions_short_all"));
    net(long, short)
}
