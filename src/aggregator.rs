//! Fixed-slot aggregation over a filtered slice
//!
//! Delay categories and months both have a closed key set, so their
//! accumulators are plain arrays indexed by a perfect hash
//! (`DelayCategory::index`, `month - 1`). Destinations are open-ended and
//! go through a hash map.

use std::collections::HashMap;

use arrow::array::{Array, RecordBatch};
use arrow::compute;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::record::{DelayCategory, DESTINATION, MONTH};
use crate::utils::{get_f64_column, get_i64_column, get_str_column};

/// One value per delay category, always in `DelayCategory::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryTotals {
    values: [f64; DelayCategory::COUNT],
}

impl CategoryTotals {
    pub fn from_values(values: [f64; DelayCategory::COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, category: DelayCategory) -> f64 {
        self.values[category.index()]
    }

    pub fn values(&self) -> &[f64; DelayCategory::COUNT] {
        &self.values
    }

    /// (category, value) pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (DelayCategory, f64)> + '_ {
        DelayCategory::ALL.iter().copied().zip(self.values.iter().copied())
    }

    /// Sum across all five categories
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            values: self.values.map(f),
        }
    }

    /// Merge another set of totals into this one
    pub fn merge(&mut self, other: &CategoryTotals) {
        for (value, other) in self.values.iter_mut().zip(other.values) {
            *value += other;
        }
    }
}

/// Serialized as a map whose keys keep category order.
impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DelayCategory::COUNT))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.column_name(), &value)?;
        }
        map.end()
    }
}

/// Sum each delay category's minutes over every row of `batch`.
///
/// An empty batch sums to zero in every category.
pub fn sum_categories(batch: &RecordBatch) -> Result<CategoryTotals> {
    let mut values = [0.0; DelayCategory::COUNT];
    for category in DelayCategory::ALL {
        let column = get_f64_column(batch, category.column_name())?;
        values[category.index()] = compute::sum(&column).unwrap_or(0.0);
    }
    Ok(CategoryTotals { values })
}

/// Row counts for the twelve calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthCounts {
    slots: [u64; 12],
}

impl MonthCounts {
    /// Perfect hash: month number 1..=12 to slot 0..=11
    #[inline(always)]
    fn slot(month: i64) -> Option<usize> {
        match month {
            1..=12 => Some((month - 1) as usize),
            _ => None,
        }
    }

    /// Count of rows for `month` (1 = January); zero for out-of-range months.
    pub fn get(&self, month: u32) -> u64 {
        Self::slot(i64::from(month))
            .map(|slot| self.slots[slot])
            .unwrap_or(0)
    }

    /// (month number, count) pairs in calendar order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        (1u32..).zip(self.slots.iter().copied())
    }

    pub fn total(&self) -> u64 {
        self.slots.iter().sum()
    }
}

/// Count rows per month.
pub fn count_by_month(batch: &RecordBatch) -> Result<MonthCounts> {
    let months = get_i64_column(batch, MONTH)?;
    let mut counts = MonthCounts::default();

    for (i, &month) in months.values().iter().enumerate() {
        if months.is_null(i) {
            continue;
        }
        if let Some(slot) = MonthCounts::slot(month) {
            counts.slots[slot] += 1;
        }
    }

    Ok(counts)
}

/// Count rows per destination code.
pub fn count_by_destination(batch: &RecordBatch) -> Result<HashMap<String, u64>> {
    let destinations = get_str_column(batch, DESTINATION)?;
    let mut counts: HashMap<String, u64> = HashMap::new();

    for destination in destinations.iter().flatten() {
        match counts.get_mut(destination) {
            Some(count) => *count += 1,
            None => {
                counts.insert(destination.to_string(), 1);
            }
        }
    }

    Ok(counts)
}

/// Sort (key, count) pairs by count descending, then key ascending, and keep the first `limit`.
pub fn rank_counts(counts: HashMap<String, u64>, limit: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}
