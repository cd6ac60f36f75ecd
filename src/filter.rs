//! Vectorized slice selection using Arrow compute kernels
//!
//! A `Predicate` is a conjunction of equality checks on month, day-of-month
//! and carrier. Every query builds one and applies it in a single pass.

use arrow::array::{BooleanArray, Int64Array, RecordBatch, StringArray};
use arrow::compute;
use arrow::compute::kernels::cmp;
use chrono::Month;

use crate::error::Result;
use crate::record::{DAY_OF_MONTH, MONTH, UNIQUE_CARRIER};
use crate::selection::{CarrierFilter, DayOfMonth};
use crate::utils::{get_i64_column, get_str_column};

/// Equality filter over the selection columns. Unset fields match every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    month: Option<i64>,
    day: Option<i64>,
    carrier: Option<String>,
}

impl Predicate {
    /// Predicate that selects every row
    pub fn all() -> Self {
        Self::default()
    }

    pub fn month(mut self, month: Month) -> Self {
        self.month = Some(i64::from(month.number_from_month()));
        self
    }

    pub fn day(mut self, day: DayOfMonth) -> Self {
        self.day = Some(i64::from(day.get()));
        self
    }

    /// `CarrierFilter::All` leaves the carrier unconstrained.
    pub fn carrier(mut self, carrier: &CarrierFilter) -> Self {
        self.carrier = carrier.as_code().map(str::to_string);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.month.is_none() && self.day.is_none() && self.carrier.is_none()
    }

    /// Build the selection mask for `batch`.
    pub fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let mut mask: Option<BooleanArray> = None;

        if let Some(month) = self.month {
            let column = get_i64_column(batch, MONTH)?;
            let matched = cmp::eq(column, &Int64Array::new_scalar(month))?;
            mask = Some(conjoin(mask, matched)?);
        }

        if let Some(day) = self.day {
            let column = get_i64_column(batch, DAY_OF_MONTH)?;
            let matched = cmp::eq(column, &Int64Array::new_scalar(day))?;
            mask = Some(conjoin(mask, matched)?);
        }

        if let Some(carrier) = &self.carrier {
            let column = get_str_column(batch, UNIQUE_CARRIER)?;
            let matched = cmp::eq(column, &StringArray::new_scalar(carrier.as_str()))?;
            mask = Some(conjoin(mask, matched)?);
        }

        Ok(mask.unwrap_or_else(|| BooleanArray::from(vec![true; batch.num_rows()])))
    }

    /// Apply the filter, returning only qualifying rows
    pub fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        if self.is_unconstrained() {
            return Ok(batch.clone());
        }
        let mask = self.mask(batch)?;
        Ok(compute::filter_record_batch(batch, &mask)?)
    }
}

fn conjoin(mask: Option<BooleanArray>, next: BooleanArray) -> Result<BooleanArray> {
    match mask {
        Some(mask) => Ok(compute::and(&mask, &next)?),
        None => Ok(next),
    }
}
