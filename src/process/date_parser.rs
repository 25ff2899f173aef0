use chrono::{NaiveDate, NaiveDateTime};

/// Layouts seen in the published trip files, tried in order.
const LAYOUTS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

/// Parse a trip start time such as `"2017-01-01 10:00:00"`.
///
/// Values carry no zone, so they are kept as naive local wall-clock times.
pub fn parse_start_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.len() < 10 {
        return None;
    }
    LAYOUTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            // bare dates count as midnight
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Seconds since the epoch for a naive timestamp, as stored in the trip table.
pub fn to_epoch_seconds(dt: &NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}
