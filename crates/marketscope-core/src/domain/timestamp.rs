use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const DAY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` day string into unix seconds at midnight UTC.
///
/// Upstream feeds pad report dates with a time component
/// (`2024-01-30T00:00:00.000`), so anything past the first ten characters is
/// ignored. Returns `None` for anything that is not a valid calendar day.
pub fn parse_day(input: &str) -> Option<i64> {
    let day = input.trim();
    let day = if day.len() > 10 { day.get(..10)? } else { day };
    let parsed = Date::parse(day, DAY_FORMAT).ok()?;
    Some(parsed.midnight().assume_utc().unix_timestamp())
}

/// Format unix seconds as the `YYYY-MM-DD` day the upstream query parameters
/// expect. Out-of-range inputs fall back to the unix epoch day.
pub fn format_day(unix_seconds: i64) -> String {
    let datetime = OffsetDateTime::from_unix_timestamp(unix_seconds)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);
    datetime
        .date()
        .format(DAY_FORMAT)
        .unwrap_or_else(|_| String::from("1970-01-01"))
}
