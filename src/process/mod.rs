// src/process/mod.rs
pub mod convert;
pub mod date_parser;
pub mod table;
pub mod utils;

pub use table::TripTable;

use anyhow::{anyhow, bail, Context, Result};
use arrow::{
    array::BooleanArray,
    compute::concat_batches,
    csv::ReaderBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{fs, io::Cursor, path::Path, sync::Arc};
use tracing::{debug, info, warn};

use crate::config::{CityCatalog, Day, FilterSelection, Month};
use crate::process::{
    convert::{append_derived_columns, convert_to_final_types},
    table::{DAY_OF_WEEK, MONTH, START_TIME},
    utils::header_names,
};

const BATCH_SIZE: usize = 64 * 1024;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a whole trip CSV into one all-Utf8 record batch.
pub fn read_csv(path: &Path) -> Result<RecordBatch> {
    let mut bytes =
        fs::read(path).with_context(|| format!("reading trip data {}", path.display()))?;
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    let header_line = bytes
        .split(|b| *b == b'\n')
        .next()
        .map(String::from_utf8_lossy)
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| anyhow!("{} has no header line", path.display()))?;
    let headers = header_names(&header_line);

    let fields: Vec<Field> = headers
        .iter()
        .map(|n| Field::new(n, DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .with_quote(b'"')
        .with_delimiter(b',')
        .build(Cursor::new(bytes))
        .context("creating CSV reader")?;

    let mut batches = Vec::new();
    for batch in reader {
        match batch {
            Ok(b) => batches.push(b),
            Err(e) => {
                warn!(path = %path.display(), "CSV parsing failed after {} batches", batches.len());
                return Err(e).with_context(|| format!("parsing {}", path.display()));
            }
        }
    }
    concat_batches(&schema, &batches).context("combining CSV batches")
}

/// Load and type the trips in `path`, with derived `month` / `day_of_week` columns.
pub fn load_trips_file(path: &Path) -> Result<TripTable> {
    let raw = read_csv(path)?;
    if raw.schema().index_of(START_TIME).is_err() {
        bail!("{} has no `{}` column", path.display(), START_TIME);
    }
    let typed = convert_to_final_types(&raw)
        .with_context(|| format!("converting {}", path.display()))?;
    let derived = append_derived_columns(&typed)?;
    debug!(path = %path.display(), rows = derived.num_rows(), "trip file loaded");
    Ok(TripTable::new(derived))
}

/// Rows whose trip started in `month`.
pub fn filter_month(table: &TripTable, month: Month) -> Result<TripTable> {
    filter_eq(table, MONTH, month.number())
}

/// Rows whose trip started on `day`.
pub fn filter_day(table: &TripTable, day: Day) -> Result<TripTable> {
    filter_eq(table, DAY_OF_WEEK, day.number())
}

fn filter_eq(table: &TripTable, column: &str, wanted: u32) -> Result<TripTable> {
    let values = table.numbers(column)?;
    let mask: BooleanArray = values.iter().map(|v| Some(v == Some(wanted))).collect();
    table.filter(&mask)
}

/// Load the selected city's trips and apply the month/day filters.
pub fn load_trip_table(catalog: &CityCatalog, selection: &FilterSelection) -> Result<TripTable> {
    let path = catalog.path(selection.city);
    info!(city = %selection.city, path = %path.display(), "loading trips");

    let mut table = load_trips_file(path)
        .with_context(|| format!("could not load data for {}", selection.city))?;
    let total = table.num_rows();

    if let Some(month) = selection.month {
        table = filter_month(&table, month)?;
        debug!(month = month.as_str(), rows = table.num_rows(), "month filter");
    }
    if let Some(day) = selection.day {
        table = filter_day(&table, day)?;
        debug!(day = day.as_str(), rows = table.num_rows(), "day filter");
    }

    info!(%selection, total, kept = table.num_rows(), "trip table ready");
    Ok(table)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::City;
    use crate::process::table::{START_STATION, TRIP_DURATION};
    use anyhow::Result;
    use chrono::Datelike;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,bikeshare::process=debug")),
            )
            .with_test_writer()
            .finish();
        // already set by another test is fine
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    pub(crate) const SAMPLE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
0,2017-06-05 08:00:00,2017-06-05 08:10:00,600,A,B,Subscriber,Male,1985.0
1,2017-06-06 09:00:00,2017-06-06 09:05:00,300,A,C,Customer,,
2,2017-07-03 17:30:00,2017-07-03 17:40:00,600,B,A,Subscriber,Female,1990.0
3,2017-01-01 10:00:00,2017-01-01 10:05:00,300,C,A,Subscriber,Female,1990.0
";

    pub(crate) fn sample_file() -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(SAMPLE.as_bytes())?;
        Ok(tmp)
    }

    #[test]
    fn reads_all_columns_and_rows() -> Result<()> {
        let tmp = sample_file()?;
        let table = load_trips_file(tmp.path())?;
        assert_eq!(table.num_rows(), 4);
        let names = table.column_names();
        assert_eq!(names[0], "column_0");
        assert!(names.contains(&MONTH.to_string()));
        assert!(names.contains(&DAY_OF_WEEK.to_string()));
        assert_eq!(table.floats(TRIP_DURATION)?.value(0), 600.0);
        assert_eq!(table.strings(START_STATION)?.value(2), "B");
        Ok(())
    }

    #[test]
    fn month_filter_keeps_only_that_month() -> Result<()> {
        let tmp = sample_file()?;
        let table = filter_month(&load_trips_file(tmp.path())?, Month::June)?;
        assert_eq!(table.num_rows(), 2);
        let ts = table.start_times()?;
        for i in 0..table.num_rows() {
            assert_eq!(ts.value_as_datetime(i).unwrap().month(), 6);
        }
        Ok(())
    }

    #[test]
    fn day_filter_uses_monday_one() -> Result<()> {
        let tmp = sample_file()?;
        let table = filter_day(&load_trips_file(tmp.path())?, Day::Monday)?;
        // 2017-06-05 and 2017-07-03 were Mondays
        assert_eq!(table.num_rows(), 2);
        let sunday = filter_day(&load_trips_file(tmp.path())?, Day::Sunday)?;
        assert_eq!(sunday.num_rows(), 1);
        Ok(())
    }

    #[test]
    fn all_filters_keep_every_row() -> Result<()> {
        init_test_logging();
        let tmp = sample_file()?;
        let catalog = CityCatalog::from_yaml(
            &format!("cities:\n  chicago: {}\n", tmp.path().display()),
            Path::new("."),
        )?;
        let sel = FilterSelection {
            city: City::Chicago,
            month: None,
            day: None,
        };
        assert_eq!(load_trip_table(&catalog, &sel)?.num_rows(), 4);

        let sel = FilterSelection {
            month: Some(Month::June),
            day: Some(Day::Tuesday),
            ..sel
        };
        assert_eq!(load_trip_table(&catalog, &sel)?.num_rows(), 1);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let catalog = CityCatalog::with_data_dir(dir.path());
        let sel = FilterSelection {
            city: City::Washington,
            month: None,
            day: None,
        };
        let err = format!("{:#}", load_trip_table(&catalog, &sel).unwrap_err());
        assert!(err.contains("washington.csv"), "{}", err);
    }

    #[test]
    fn missing_start_time_is_an_error() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"Trip Duration,User Type\n10,Subscriber\n")?;
        let err = load_trips_file(tmp.path()).unwrap_err().to_string();
        assert!(err.contains("Start Time"), "{}", err);
        Ok(())
    }

    #[test]
    fn byte_order_mark_is_ignored() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all("\u{feff}Start Time,Trip Duration\n2017-01-01 10:00:00,60\n".as_bytes())?;
        let table = load_trips_file(tmp.path())?;
        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.column_names()[0], START_TIME);
        Ok(())
    }

    #[test]
    fn header_only_file_is_empty_table() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"Start Time,Trip Duration\n")?;
        assert!(load_trips_file(tmp.path())?.is_empty());
        Ok(())
    }
}
