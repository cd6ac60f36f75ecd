//! Derived values computed from category totals

use crate::aggregator::CategoryTotals;
use crate::record::DelayCategory;

pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Convert minute totals to hours.
pub fn minutes_to_hours(minutes: &CategoryTotals) -> CategoryTotals {
    minutes.map(|m| m / MINUTES_PER_HOUR)
}

/// Each category's share of the five-way sum, in percent.
///
/// Returns `None` when the sum is zero: the shares are undefined, and
/// dividing would produce NaN.
pub fn percentages(totals: &CategoryTotals) -> Option<[f64; DelayCategory::COUNT]> {
    let total = totals.total();
    if total == 0.0 {
        return None;
    }
    Some(totals.values().map(|v| v * 100.0 / total))
}
