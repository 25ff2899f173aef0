use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::info;

use crate::config::{CityCatalog, FilterSelection};
use crate::pager::display_data;
use crate::process::{load_trip_table, TripTable};
use crate::prompt::{ask_yes, get_filters};
use crate::stats::{run_report, StationStats, TimeStats, TripDurationStats, UserStats};

/// Print the four reports in their fixed order.
pub fn print_reports<W: Write>(table: &TripTable, out: &mut W) -> Result<()> {
    run_report::<TimeStats, _>(table, out)?;
    run_report::<StationStats, _>(table, out)?;
    run_report::<TripDurationStats, _>(table, out)?;
    run_report::<UserStats, _>(table, out)?;
    Ok(())
}

/// One pass: filters, load, reports, raw rows.
pub fn run_once<R: BufRead, W: Write>(
    catalog: &CityCatalog,
    input: &mut R,
    out: &mut W,
) -> Result<FilterSelection> {
    let selection = get_filters(input, out)?;
    let table = load_trip_table(catalog, &selection)?;
    print_reports(&table, out)?;
    display_data(&table, input, out)?;
    Ok(selection)
}

/// Run sessions until the user declines to restart. Returns how many ran.
pub fn run<R: BufRead, W: Write>(catalog: &CityCatalog, input: &mut R, out: &mut W) -> Result<usize> {
    let mut sessions = 0;
    loop {
        let selection = run_once(catalog, input, out)?;
        sessions += 1;
        info!(%selection, sessions, "session finished");

        if !ask_yes(input, out, "\nWould you like to restart? Enter yes or no.\n")? {
            break;
        }
    }
    Ok(sessions)
}
