use crate::process::{table::TRIP_DURATION, TripTable};
use crate::stats::{or_na, Report};
use anyhow::Result;
use std::fmt;

/// Total and mean trip duration in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDurationStats {
    pub total: f64,
    pub mean: Option<f64>,
    /// Rows with a duration value.
    pub trips: usize,
}

impl Report for TripDurationStats {
    const HEADING: &'static str = "Calculating Trip Duration...";

    fn compute(table: &TripTable) -> Result<Self> {
        let durations = table.floats(TRIP_DURATION)?;
        let (total, trips) = durations
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, n), d| (sum + d, n + 1));
        let mean = (trips > 0).then(|| total / trips as f64);
        Ok(Self { total, mean, trips })
    }
}

/// `4000.0` → `"1h 6m 40s"`; rounds to whole seconds.
pub fn humanize_seconds(secs: f64) -> String {
    let sign = if secs < 0.0 { "-" } else { "" };
    let mut rest = secs.abs().round() as u64;
    let days = rest / 86_400;
    rest %= 86_400;
    let hours = rest / 3_600;
    rest %= 3_600;
    let minutes = rest / 60;
    let seconds = rest % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 || !parts.is_empty() {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 || !parts.is_empty() {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", seconds));
    format!("{}{}", sign, parts.join(" "))
}

impl fmt::Display for TripDurationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total travel time: {} seconds ({})",
            self.total,
            humanize_seconds(self.total)
        )?;
        match self.mean {
            Some(m) => writeln!(f, "Mean travel time: {} seconds ({})", m, humanize_seconds(m)),
            None => writeln!(f, "Mean travel time: {}", or_na(self.mean)),
        }
    }
}
