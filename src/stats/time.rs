use crate::config::filters::{day_name, month_name};
use crate::process::{
    convert::start_datetimes,
    table::{DAY_OF_WEEK, MONTH},
    TripTable,
};
use crate::stats::{mode, or_na, Report};
use anyhow::Result;
use chrono::Timelike;
use std::fmt;

/// Most frequent month, weekday and start hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    pub common_month: Option<u32>,
    /// Monday = 1 .. Sunday = 7.
    pub common_day: Option<u32>,
    /// 0..=23.
    pub common_hour: Option<u32>,
}

impl Report for TimeStats {
    const HEADING: &'static str = "Calculating The Most Frequent Times of Travel...";

    fn compute(table: &TripTable) -> Result<Self> {
        let common_month = mode(table.numbers(MONTH)?.iter().flatten());
        let common_day = mode(table.numbers(DAY_OF_WEEK)?.iter().flatten());
        let hours = start_datetimes(table.start_times()?)?;
        let common_hour = mode(hours.iter().map(|t| t.hour()));
        Ok(Self {
            common_month,
            common_day,
            common_hour,
        })
    }
}

fn with_name(n: Option<u32>, name: fn(u32) -> Option<&'static str>) -> String {
    match n.and_then(|n| name(n).map(|s| (n, s))) {
        Some((n, s)) => format!("{} ({})", n, s),
        None => or_na(n),
    }
}

impl fmt::Display for TimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Most Common Month: {}", with_name(self.common_month, month_name))?;
        writeln!(f, "Most Common Day of Week: {}", with_name(self.common_day, day_name))?;
        writeln!(f, "Most Common Start Hour: {}", or_na(self.common_hour))
    }
}
