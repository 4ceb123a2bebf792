pub mod bar;
pub mod cot;
pub mod timestamp;

pub use bar::{normalize, sort_dedup_by_time, Bar};
pub use cot::{latest_signal, net, sum_present, CotBias, CotPoint, CotSignal};
pub use timestamp::{format_day, parse_day};
