use anyhow::{anyhow, Result};
use arrow::{
    array::{Array, BooleanArray, Float64Array, StringArray, TimestampSecondArray, UInt32Array},
    compute::filter_record_batch,
    record_batch::RecordBatch,
    util::pretty::pretty_format_batches,
};

pub const START_TIME: &str = "Start Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

/// Derived: calendar month of `Start Time` (1..12).
pub const MONTH: &str = "month";
/// Derived: weekday of `Start Time`, Monday = 1 .. Sunday = 7.
pub const DAY_OF_WEEK: &str = "day_of_week";

/// The trips of one session after filtering, backed by a single record batch.
#[derive(Debug, Clone)]
pub struct TripTable {
    batch: RecordBatch,
}

impl TripTable {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    fn typed_column<T: Array + 'static>(&self, name: &str, kind: &str) -> Result<&T> {
        let col = self
            .batch
            .column_by_name(name)
            .ok_or_else(|| anyhow!("column `{}` is missing from the trip data", name))?;
        col.as_any().downcast_ref::<T>().ok_or_else(|| {
            anyhow!(
                "column `{}` has type {}, expected {}",
                name,
                col.data_type(),
                kind
            )
        })
    }

    pub fn strings(&self, name: &str) -> Result<&StringArray> {
        self.typed_column(name, "Utf8")
    }

    pub fn floats(&self, name: &str) -> Result<&Float64Array> {
        self.typed_column(name, "Float64")
    }

    pub fn numbers(&self, name: &str) -> Result<&UInt32Array> {
        self.typed_column(name, "UInt32")
    }

    pub fn start_times(&self) -> Result<&TimestampSecondArray> {
        self.typed_column(START_TIME, "Timestamp(Second)")
    }

    /// Keep only the rows where `mask` is true.
    pub fn filter(&self, mask: &BooleanArray) -> Result<TripTable> {
        Ok(TripTable::new(filter_record_batch(&self.batch, mask)?))
    }

    /// Up to `len` rows starting at `offset`; empty once `offset` passes the end.
    pub fn slice(&self, offset: usize, len: usize) -> TripTable {
        let offset = offset.min(self.num_rows());
        let len = len.min(self.num_rows() - offset);
        TripTable::new(self.batch.slice(offset, len))
    }

    /// Render the table as an ASCII grid.
    pub fn pretty(&self) -> Result<String> {
        Ok(pretty_format_batches(&[self.batch.clone()])?.to_string())
    }
}
