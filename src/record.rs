//! Row and column model for the delay-cause table
//!
//! The table is held column-wise as an Arrow `RecordBatch`. `FlightDelayRecord`
//! is the row view, used to build small tables in memory and to read rows back.

use std::fmt;
use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const MONTH: &str = "Month";
pub const DAY_OF_MONTH: &str = "DayofMonth";
pub const UNIQUE_CARRIER: &str = "UniqueCarrier";
pub const DESTINATION: &str = "Dest";

/// Columns the query layer reads; everything else in a source file is projected away.
pub const REQUIRED_COLUMNS: &[&str] = &[
    MONTH,
    DAY_OF_MONTH,
    UNIQUE_CARRIER,
    DESTINATION,
    "CarrierDelay",
    "WeatherDelay",
    "NASDelay",
    "SecurityDelay",
    "LateAircraftDelay",
];

/// One of the five recorded causes of delay.
///
/// Declaration order is the output order of every per-category result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DelayCategory {
    CarrierDelay,
    WeatherDelay,
    #[serde(rename = "NASDelay")]
    NasDelay,
    SecurityDelay,
    LateAircraftDelay,
}

impl DelayCategory {
    pub const COUNT: usize = 5;

    pub const ALL: [DelayCategory; Self::COUNT] = [
        DelayCategory::CarrierDelay,
        DelayCategory::WeatherDelay,
        DelayCategory::NasDelay,
        DelayCategory::SecurityDelay,
        DelayCategory::LateAircraftDelay,
    ];

    /// Source column holding this category's minutes.
    pub fn column_name(self) -> &'static str {
        match self {
            DelayCategory::CarrierDelay => "CarrierDelay",
            DelayCategory::WeatherDelay => "WeatherDelay",
            DelayCategory::NasDelay => "NASDelay",
            DelayCategory::SecurityDelay => "SecurityDelay",
            DelayCategory::LateAircraftDelay => "LateAircraftDelay",
        }
    }

    /// Position in `ALL`
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DelayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Arrow schema of a loaded table, in `REQUIRED_COLUMNS` order
pub fn flight_schema() -> SchemaRef {
    let mut fields = vec![
        Field::new(MONTH, DataType::Int64, false),
        Field::new(DAY_OF_MONTH, DataType::Int64, false),
        Field::new(UNIQUE_CARRIER, DataType::Utf8, false),
        Field::new(DESTINATION, DataType::Utf8, false),
    ];
    fields.extend(
        DelayCategory::ALL
            .iter()
            .map(|c| Field::new(c.column_name(), DataType::Float64, false)),
    );
    Arc::new(Schema::new(fields))
}

/// One delayed flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDelayRecord {
    pub month: u32,
    pub day_of_month: u32,
    pub unique_carrier: String,
    pub destination: String,
    /// Delay minutes, indexed by `DelayCategory::index`
    pub delays: [f64; DelayCategory::COUNT],
}

impl FlightDelayRecord {
    pub fn new(
        month: u32,
        day_of_month: u32,
        unique_carrier: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            month,
            day_of_month,
            unique_carrier: unique_carrier.into(),
            destination: destination.into(),
            delays: [0.0; DelayCategory::COUNT],
        }
    }

    /// Set the minutes for one category.
    pub fn with_delay(mut self, category: DelayCategory, minutes: f64) -> Self {
        self.delays[category.index()] = minutes;
        self
    }

    pub fn delay(&self, category: DelayCategory) -> f64 {
        self.delays[category.index()]
    }
}

/// Column-wise accumulator that turns records into a `RecordBatch`
#[derive(Debug, Clone, Default)]
pub struct RecordColumns {
    month: Vec<i64>,
    day_of_month: Vec<i64>,
    unique_carrier: Vec<String>,
    destination: Vec<String>,
    delays: [Vec<f64>; DelayCategory::COUNT],
}

impl RecordColumns {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            month: Vec::with_capacity(capacity),
            day_of_month: Vec::with_capacity(capacity),
            unique_carrier: Vec::with_capacity(capacity),
            destination: Vec::with_capacity(capacity),
            delays: std::array::from_fn(|_| Vec::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.month.len()
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_empty()
    }

    pub fn push(&mut self, record: &FlightDelayRecord) {
        self.month.push(i64::from(record.month));
        self.day_of_month.push(i64::from(record.day_of_month));
        self.unique_carrier.push(record.unique_carrier.clone());
        self.destination.push(record.destination.clone());
        for (column, minutes) in self.delays.iter_mut().zip(record.delays) {
            column.push(minutes);
        }
    }

    pub fn finish(self) -> Result<RecordBatch> {
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(self.month)),
            Arc::new(Int64Array::from(self.day_of_month)),
            Arc::new(StringArray::from(self.unique_carrier)),
            Arc::new(StringArray::from(self.destination)),
        ];
        columns.extend(
            self.delays
                .into_iter()
                .map(|values| Arc::new(Float64Array::from(values)) as ArrayRef),
        );
        Ok(RecordBatch::try_new(flight_schema(), columns)?)
    }
}

impl<'a> FromIterator<&'a FlightDelayRecord> for RecordColumns {
    fn from_iter<I: IntoIterator<Item = &'a FlightDelayRecord>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut columns = RecordColumns::with_capacity(iter.size_hint().0);
        for record in iter {
            columns.push(record);
        }
        columns
    }
}
