//! CSV and Parquet readers with row cleaning
//!
//! Both formats are decoded into Arrow batches carrying every source column.
//! `clean_batch` drops rows the query layer must never see (a missing value
//! in any column, negative delay minutes, or a month/day outside the
//! calendar range) and keeps only the required columns, cast to the table
//! schema.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch};
use arrow::compute::{self, cast, kernels::cmp};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use tracing::{debug, warn};

use crate::config::DataConfig;
use crate::error::{Error, Result};
use crate::record::{flight_schema, DelayCategory, DAY_OF_MONTH, MONTH, REQUIRED_COLUMNS};
use crate::selection::MAX_DAY_OF_MONTH;

/// On-disk layout of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Parquet,
}

impl SourceFormat {
    /// `.parquet` / `.pq` files are Parquet; everything else is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") || ext.eq_ignore_ascii_case("pq") => {
                SourceFormat::Parquet
            }
            _ => SourceFormat::Csv,
        }
    }
}

/// Arrow type a required column is decoded as.
fn required_type(name: &str) -> DataType {
    flight_schema()
        .field_with_name(name)
        .map(|f| f.data_type().clone())
        .unwrap_or(DataType::Utf8)
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::DatasetOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Fail with `MissingColumn` for the first required column `schema` lacks
fn check_required_columns(schema: &Schema) -> Result<()> {
    for name in REQUIRED_COLUMNS {
        schema
            .index_of(name)
            .map_err(|_| Error::MissingColumn(name.to_string()))?;
    }
    Ok(())
}

/// Open a dataset file and return an iterator over its raw, uncleaned batches.
pub fn read_flights(path: &Path, config: &DataConfig) -> Result<FlightReader> {
    match SourceFormat::from_path(path) {
        SourceFormat::Csv => read_csv(path, config),
        SourceFormat::Parquet => read_parquet(path, config),
    }
}

fn read_csv(path: &Path, config: &DataConfig) -> Result<FlightReader> {
    // Header pass: only column names are needed from inference
    let (header, _) = Format::default()
        .with_header(true)
        .with_null_regex(config.null_regex()?)
        .infer_schema(open_file(path)?, Some(0))?;

    // Required columns get their table types; everything else stays text
    let fields: Vec<Field> = header
        .fields()
        .iter()
        .map(|f| {
            let data_type = if REQUIRED_COLUMNS.contains(&f.name().as_str()) {
                required_type(f.name())
            } else {
                DataType::Utf8
            };
            Field::new(f.name(), data_type, true)
        })
        .collect();
    let schema = Schema::new(fields);
    check_required_columns(&schema)?;

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .with_null_regex(config.null_regex()?)
        .with_batch_size(config.batch_size)
        .build(open_file(path)?)?;

    debug!("Reading CSV dataset from {}", path.display());
    Ok(FlightReader {
        path: path.to_path_buf(),
        inner: BatchSource::Csv(reader),
    })
}

fn read_parquet(path: &Path, config: &DataConfig) -> Result<FlightReader> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open_file(path)?)?;
    check_required_columns(builder.schema())?;

    let reader = builder.with_batch_size(config.batch_size).build()?;

    debug!("Reading Parquet dataset from {}", path.display());
    Ok(FlightReader {
        path: path.to_path_buf(),
        inner: BatchSource::Parquet(reader),
    })
}

enum BatchSource {
    Csv(arrow::csv::Reader<File>),
    Parquet(ParquetRecordBatchReader),
}

/// Full-width, not yet cleaned, batches of a dataset file
pub struct FlightReader {
    path: PathBuf,
    inner: BatchSource,
}

impl std::fmt::Debug for FlightReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let format = match self.inner {
            BatchSource::Csv(_) => SourceFormat::Csv,
            BatchSource::Parquet(_) => SourceFormat::Parquet,
        };
        f.debug_struct("FlightReader")
            .field("path", &self.path)
            .field("format", &format)
            .finish()
    }
}

impl Iterator for FlightReader {
    type Item = Result<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = match &mut self.inner {
            BatchSource::Csv(reader) => reader.next(),
            BatchSource::Parquet(reader) => reader.next(),
        };
        next.map(|batch| batch.map_err(Error::from))
    }
}

/// Cast `batch` to the table schema and drop rows that fail the load invariants.
///
/// A null in any column of `batch` drops the row, including columns outside
/// the table schema. Returns the cleaned batch and the number of rows dropped.
pub fn clean_batch(batch: &RecordBatch) -> Result<(RecordBatch, usize)> {
    let schema: SchemaRef = flight_schema();

    let columns = schema
        .fields()
        .iter()
        .map(|field| -> Result<ArrayRef> {
            let idx = batch
                .schema()
                .index_of(field.name())
                .map_err(|_| Error::MissingColumn(field.name().to_string()))?;
            let column = batch.column(idx);
            if column.data_type() == field.data_type() {
                Ok(Arc::clone(column))
            } else {
                Ok(cast(column, field.data_type())?)
            }
        })
        .collect::<Result<Vec<ArrayRef>>>()?;

    let mut keep = BooleanArray::from(vec![true; batch.num_rows()]);
    for column in batch.columns().iter().chain(&columns) {
        keep = compute::and(&keep, &compute::is_not_null(column.as_ref())?)?;
    }

    let month = &columns[schema.index_of(MONTH)?];
    keep = compute::and(&keep, &cmp::gt_eq(month, &Int64Array::new_scalar(1))?)?;
    keep = compute::and(&keep, &cmp::lt_eq(month, &Int64Array::new_scalar(12))?)?;

    let day = &columns[schema.index_of(DAY_OF_MONTH)?];
    keep = compute::and(&keep, &cmp::gt_eq(day, &Int64Array::new_scalar(1))?)?;
    keep = compute::and(
        &keep,
        &cmp::lt_eq(day, &Int64Array::new_scalar(i64::from(MAX_DAY_OF_MONTH)))?,
    )?;

    for category in DelayCategory::ALL {
        let minutes = &columns[schema.index_of(category.column_name())?];
        keep = compute::and(&keep, &cmp::gt_eq(minutes, &Float64Array::new_scalar(0.0))?)?;
    }

    let kept = keep.true_count();
    let dropped = batch.num_rows() - kept;

    let columns = if dropped == 0 {
        columns
    } else {
        columns
            .iter()
            .map(|column| compute::filter(column.as_ref(), &keep))
            .collect::<std::result::Result<Vec<ArrayRef>, _>>()?
    };

    let cleaned = RecordBatch::try_new(schema, columns)?;
    if dropped > 0 {
        warn!("Dropped {} of {} rows with missing or invalid values", dropped, batch.num_rows());
    }
    Ok((cleaned, dropped))
}
