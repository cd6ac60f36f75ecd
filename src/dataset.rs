//! The loaded delay-cause table
//!
//! A `Dataset` is built once and never mutated. Cloning is cheap (Arrow
//! buffers are reference counted), and every query borrows it immutably, so
//! one instance can serve any number of threads.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::RecordBatch;
use arrow_select::concat::concat_batches;
use tracing::info;

use crate::config::DataConfig;
use crate::error::Result;
use crate::reader::{clean_batch, read_flights};
use crate::record::{flight_schema, FlightDelayRecord, RecordColumns, UNIQUE_CARRIER};
use crate::utils::get_str_column;

#[derive(Debug, Clone)]
pub struct Dataset {
    batch: RecordBatch,
    carriers: Arc<[String]>,
}

impl Dataset {
    /// Load and clean a CSV or Parquet file.
    pub fn open(path: &Path, config: &DataConfig) -> Result<Self> {
        let start = Instant::now();
        let reader = read_flights(path, config)?;

        let mut batches = Vec::new();
        let mut read = 0;
        let mut dropped = 0;
        for batch in reader {
            let batch = batch?;
            if batch.num_rows() == 0 {
                continue;
            }
            read += batch.num_rows();
            let (cleaned, batch_dropped) = clean_batch(&batch)?;
            dropped += batch_dropped;
            batches.push(cleaned);
        }

        let dataset = Self::from_batch(concat_batches(&flight_schema(), &batches)?)?;
        info!(
            "Loaded {} rows ({} dropped of {} read, {} carriers) from {} in {:.2} ms",
            dataset.num_rows(),
            dropped,
            read,
            dataset.carriers().len(),
            path.display(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(dataset)
    }

    /// Wrap an in-memory batch, cleaning it to the table schema first.
    pub fn from_batch(batch: RecordBatch) -> Result<Self> {
        let (batch, _) = clean_batch(&batch)?;
        let carriers = distinct_carriers(&batch)?;
        Ok(Self { batch, carriers })
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FlightDelayRecord>) -> Result<Self> {
        Self::from_batch(records.into_iter().collect::<RecordColumns>().finish()?)
    }

    pub fn empty() -> Result<Self> {
        Self::from_batch(RecordColumns::default().finish()?)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Distinct carrier codes, in order of first appearance
    pub fn carriers(&self) -> &[String] {
        &self.carriers
    }
}

fn distinct_carriers(batch: &RecordBatch) -> Result<Arc<[String]>> {
    let column = get_str_column(batch, UNIQUE_CARRIER)?;
    let mut seen = HashSet::new();
    let carriers: Vec<String> = column
        .iter()
        .flatten()
        .filter(|code| seen.insert(*code))
        .map(str::to_string)
        .collect();
    Ok(carriers.into())
}
