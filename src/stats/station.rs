use crate::process::{
    table::{END_STATION, START_STATION},
    TripTable,
};
use crate::stats::{mode, mode_with_count, NOT_AVAILABLE, Report};
use anyhow::Result;
use std::fmt;

/// The single most frequent (start, end) route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub start: String,
    pub end: String,
    pub trips: usize,
}

/// Most popular stations and route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub common_start: Option<String>,
    pub common_end: Option<String>,
    pub common_route: Option<Route>,
}

impl Report for StationStats {
    const HEADING: &'static str = "Calculating The Most Popular Stations and Trip...";

    fn compute(table: &TripTable) -> Result<Self> {
        let starts = table.strings(START_STATION)?;
        let ends = table.strings(END_STATION)?;

        let common_start = mode(starts.iter().flatten()).map(str::to_string);
        let common_end = mode(ends.iter().flatten()).map(str::to_string);

        // rows missing either end are not a route
        let routes = starts.iter().zip(ends.iter()).filter_map(|p| match p {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        });
        let common_route = mode_with_count(routes).map(|((s, e), trips)| Route {
            start: s.to_string(),
            end: e.to_string(),
            trips,
        });

        Ok(Self {
            common_start,
            common_end,
            common_route,
        })
    }
}

impl fmt::Display for StationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let na = || NOT_AVAILABLE.to_string();
        writeln!(
            f,
            "Most Commonly Used Start Station: {}",
            self.common_start.clone().unwrap_or_else(na)
        )?;
        writeln!(
            f,
            "Most Commonly Used End Station: {}",
            self.common_end.clone().unwrap_or_else(na)
        )?;
        match &self.common_route {
            Some(r) => writeln!(
                f,
                "Most Frequent Combination of Start Station and End Station: {} -> {} ({} trips)",
                r.start, r.end, r.trips
            ),
            None => writeln!(
                f,
                "Most Frequent Combination of Start Station and End Station: {}",
                NOT_AVAILABLE
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{load_trips_file, tests::sample_file};
    use anyhow::Result;
    use std::{collections::HashMap, io::Write};
    use tempfile::NamedTempFile;

    #[test]
    fn same_route_twice() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(
            b"Start Time,Start Station,End Station,Trip Duration,User Type\n\
2017-01-01 10:00:00,A,B,300,Subscriber\n\
2017-01-01 11:00:00,A,B,100,Subscriber\n",
        )?;
        let stats = StationStats::compute(&load_trips_file(tmp.path())?)?;
        assert_eq!(stats.common_start.as_deref(), Some("A"));
        assert_eq!(stats.common_end.as_deref(), Some("B"));
        assert_eq!(
            stats.common_route,
            Some(Route {
                start: "A".into(),
                end: "B".into(),
                trips: 2
            })
        );
        assert!(stats.to_string().contains("A -> B (2 trips)"));
        Ok(())
    }

    #[test]
    fn reported_route_count_dominates() -> Result<()> {
        let tmp = sample_file()?;
        let table = load_trips_file(tmp.path())?;
        let stats = StationStats::compute(&table)?;
        let route = stats.common_route.unwrap();

        let starts = table.strings(START_STATION)?;
        let ends = table.strings(END_STATION)?;
        let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
        for (s, e) in starts.iter().zip(ends.iter()) {
            *counts.entry((s.unwrap(), e.unwrap())).or_default() += 1;
        }
        assert!(counts.values().all(|c| route.trips >= *c));
        // every route is unique here, so the smallest pair wins
        assert_eq!((route.start.as_str(), route.end.as_str()), ("A", "B"));
        Ok(())
    }

    #[test]
    fn missing_station_column_fails() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"Start Time\n2017-01-01 10:00:00\n")?;
        let err = StationStats::compute(&load_trips_file(tmp.path())?).unwrap_err();
        assert!(err.to_string().contains(START_STATION));
        Ok(())
    }
}
