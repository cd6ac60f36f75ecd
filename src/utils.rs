//! Typed column access on record batches

use arrow::array::{Array, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;

use crate::error::{Error, Result};

fn column_index(batch: &RecordBatch, name: &str) -> Result<usize> {
    batch
        .schema()
        .fields()
        .iter()
        .position(|f| f.name() == name)
        .ok_or_else(|| Error::MissingColumn(name.to_string()))
}

/// Get a column by name as Float64, casting integer or decimal sources with the Arrow cast kernel
pub fn get_f64_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let col = batch.column(column_index(batch, name)?);

    if let Some(array) = col.as_any().downcast_ref::<Float64Array>() {
        return Ok(array.clone());
    }

    let cast_array = cast(col, &DataType::Float64)?;
    cast_array
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| Error::column_type(name, "Float64"))
}

/// Borrow an Int64 column by name
pub fn get_i64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    batch
        .column(column_index(batch, name)?)
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| Error::column_type(name, "Int64"))
}

/// Borrow a Utf8 column by name
pub fn get_str_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column(column_index(batch, name)?)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| Error::column_type(name, "Utf8"))
}
