use crate::process::table::{BIRTH_YEAR, DAY_OF_WEEK, MONTH, START_TIME, TRIP_DURATION};
use crate::process::{date_parser, utils};
use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Float64Array, StringArray, TimestampSecondArray, UInt32Array},
    datatypes::{DataType, Field, FieldRef, Schema, TimeUnit},
    record_batch::RecordBatch,
};
use chrono::{Datelike, NaiveDateTime};
use std::sync::Arc;

/// Columns parsed as numbers; everything else stays text.
const NUMERIC_COLUMNS: [&str; 2] = [TRIP_DURATION, BIRTH_YEAR];

/// Convert the all-Utf8 batch read from CSV into its final types.
///
/// `Start Time` becomes a second-resolution timestamp and fails the whole load on the
/// first value that does not parse. Numeric columns turn unparseable cells into nulls.
pub fn convert_to_final_types(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = Vec::with_capacity(batch.num_columns());
    let mut out: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for (arr, fld) in batch.columns().iter().zip(schema.fields()) {
        let Some(sarr) = arr.as_any().downcast_ref::<StringArray>() else {
            fields.push(fld.clone());
            out.push(arr.clone());
            continue;
        };
        let name = fld.name().as_str();

        if name == START_TIME {
            out.push(Arc::new(parse_timestamps(sarr)?) as ArrayRef);
            fields.push(Arc::new(Field::new(
                name,
                DataType::Timestamp(TimeUnit::Second, None),
                false,
            )));
        } else if NUMERIC_COLUMNS.contains(&name) {
            let values: Float64Array = sarr
                .iter()
                .map(|v| utils::non_empty(v).and_then(|s| s.parse::<f64>().ok()))
                .collect();
            out.push(Arc::new(values) as ArrayRef);
            fields.push(Arc::new(Field::new(name, DataType::Float64, true)));
        } else {
            let cleaned: StringArray = sarr
                .iter()
                .map(|v| utils::non_empty(v).map(utils::clean_str))
                .collect();
            out.push(Arc::new(cleaned) as ArrayRef);
            fields.push(Arc::new(Field::new(name, DataType::Utf8, true)));
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), out)
        .context("building typed trip batch")
}

fn parse_timestamps(sarr: &StringArray) -> Result<TimestampSecondArray> {
    let mut secs = Vec::with_capacity(sarr.len());
    for (row, v) in sarr.iter().enumerate() {
        let raw = v.unwrap_or_default();
        let dt = date_parser::parse_start_time(raw).ok_or_else(|| {
            anyhow!(
                "unparseable `{}` value {:?} in data row {}",
                START_TIME,
                raw,
                row + 1
            )
        })?;
        secs.push(date_parser::to_epoch_seconds(&dt));
    }
    Ok(TimestampSecondArray::from(secs))
}

/// Naive wall-clock start time of every row.
pub fn start_datetimes(ts: &TimestampSecondArray) -> Result<Vec<NaiveDateTime>> {
    (0..ts.len())
        .map(|i| {
            ts.value_as_datetime(i)
                .ok_or_else(|| anyhow!("`{}` out of range in row {}", START_TIME, i + 1))
        })
        .collect()
}

/// Append the `month` and `day_of_week` columns derived from `Start Time`.
pub fn append_derived_columns(batch: &RecordBatch) -> Result<RecordBatch> {
    let ts = batch
        .column_by_name(START_TIME)
        .and_then(|c| c.as_any().downcast_ref::<TimestampSecondArray>())
        .ok_or_else(|| anyhow!("typed `{}` column missing", START_TIME))?;
    let times = start_datetimes(ts)?;

    let months: UInt32Array = times.iter().map(|t| t.month()).collect::<Vec<_>>().into();
    let days: UInt32Array = times
        .iter()
        .map(|t| t.weekday().number_from_monday())
        .collect::<Vec<_>>()
        .into();

    let batch = with_column(batch, MONTH, Arc::new(months))?;
    with_column(&batch, DAY_OF_WEEK, Arc::new(days))
}

fn with_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let mut fields: Vec<FieldRef> = batch.schema().fields().iter().cloned().collect();
    fields.push(Arc::new(Field::new(name, array.data_type().clone(), false)));
    let mut cols = batch.columns().to_vec();
    cols.push(array);
    RecordBatch::try_new(Arc::new(Schema::new(fields)), cols)
        .with_context(|| format!("appending derived column `{}`", name))
}
