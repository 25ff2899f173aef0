// src/stats/mod.rs
pub mod duration;
pub mod station;
pub mod time;
pub mod user;

pub use duration::TripDurationStats;
pub use station::StationStats;
pub use time::TimeStats;
pub use user::UserStats;

use crate::process::TripTable;
use anyhow::Result;
use std::{collections::BTreeMap, fmt, io::Write, time::Instant};
use tracing::debug;

/// Printed in place of a statistic when no trips match.
pub const NOT_AVAILABLE: &str = "n/a";

/// One block of statistics computed from the filtered trips.
pub trait Report: fmt::Display + Sized {
    /// Banner shown while the report is computed.
    const HEADING: &'static str;

    fn compute(table: &TripTable) -> Result<Self>;
}

/// Compute `R`, print it with its heading and timing line, and hand it back.
pub fn run_report<R: Report, W: Write>(table: &TripTable, out: &mut W) -> Result<R> {
    writeln!(out, "\n{}\n", R::HEADING)?;
    let start = Instant::now();
    let report = R::compute(table)?;
    write!(out, "{}", report)?;
    let elapsed = start.elapsed();
    debug!(report = R::HEADING, ?elapsed, "report done");
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{}", rule())?;
    Ok(report)
}

/// Separator between console sections.
pub fn rule() -> String {
    "-".repeat(40)
}

/// Most frequent value and its count.
///
/// Ties go to the smallest value, so the result does not depend on row order.
pub fn mode_with_count<K: Ord, I: IntoIterator<Item = K>>(values: I) -> Option<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    counts.into_iter().fold(None, |best, (k, c)| match best {
        Some((_, bc)) if bc >= c => best,
        _ => Some((k, c)),
    })
}

pub fn mode<K: Ord, I: IntoIterator<Item = K>>(values: I) -> Option<K> {
    mode_with_count(values).map(|(k, _)| k)
}

/// Count of every distinct value, largest count first, ties in ascending value order.
pub fn value_counts<K: Ord, I: IntoIterator<Item = K>>(values: I) -> Vec<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut out: Vec<(K, usize)> = counts.into_iter().collect();
    // stable, so equal counts keep ascending key order
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// `Some(v)` rendered with `Display`, `None` as `n/a`.
pub(crate) fn or_na<T: fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{load_trips_file, tests::sample_file};
    use anyhow::Result;

    #[test]
    fn mode_ties_pick_smallest() {
        assert_eq!(mode(vec![3, 1, 3, 1, 2]), Some(1));
        assert_eq!(mode(vec!["b", "a", "b"]), Some("b"));
        assert_eq!(mode(vec!["b", "a"]), Some("a"));
        assert_eq!(mode(Vec::<u32>::new()), None);
        assert_eq!(mode_with_count(vec![5, 5, 4]), Some((5, 2)));
    }

    #[test]
    fn value_counts_order() {
        let counts = value_counts(vec!["x", "b", "a", "b", "a", "c"]);
        assert_eq!(counts, vec![("a", 2), ("b", 2), ("c", 1), ("x", 1)]);
    }

    #[test]
    fn run_report_prints_heading_timing_and_rule() -> Result<()> {
        let tmp = sample_file()?;
        let table = load_trips_file(tmp.path())?;
        let mut out = Vec::new();
        let stats: TripDurationStats = run_report(&table, &mut out)?;
        assert_eq!(stats.trips, 4);

        let text = String::from_utf8(out)?;
        assert!(text.contains(TripDurationStats::HEADING));
        assert!(text.contains("This took "));
        assert!(text.trim_end().ends_with(&rule()));
        Ok(())
    }
}
