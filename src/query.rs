//! The four dashboard queries
//!
//! Each query is a pure function of an immutable `Dataset` and a selection:
//! build a `Predicate`, filter once, aggregate the slice. Empty slices give
//! zero/empty results, never errors.

use chrono::Month;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{count_by_destination, count_by_month, rank_counts, sum_categories, CategoryTotals};
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::expressions::{minutes_to_hours, percentages};
use crate::filter::Predicate;
use crate::record::DelayCategory;
use crate::selection::{CarrierFilter, DayOfMonth, Selection};

/// Destinations returned by `top_destinations` unless configured otherwise
pub const DEFAULT_TOP_DESTINATIONS: usize = 10;

/// One category's minutes and its share of the slice's total delay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: DelayCategory,
    pub minutes: f64,
    pub percent: f64,
}

/// Delay-type percentage breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "shares", rename_all = "snake_case")]
pub enum DelayProportions {
    /// Total delay in the slice is zero; shares are undefined.
    NoData,
    /// Shares in category order, summing to 100.
    Breakdown(Vec<CategoryShare>),
}

impl DelayProportions {
    pub fn is_no_data(&self) -> bool {
        matches!(self, DelayProportions::NoData)
    }

    pub fn shares(&self) -> &[CategoryShare] {
        match self {
            DelayProportions::NoData => &[],
            DelayProportions::Breakdown(shares) => shares,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyOccurrence {
    pub month: u32,
    pub month_name: &'static str,
    pub occurrences: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationCount {
    pub destination: String,
    pub occurrences: u64,
}

fn day_slice(month: Month, day: DayOfMonth, carrier: &CarrierFilter) -> Predicate {
    Predicate::all().month(month).day(day).carrier(carrier)
}

fn slice_minutes(dataset: &Dataset, predicate: &Predicate) -> Result<CategoryTotals> {
    let slice = predicate.apply(dataset.batch())?;
    debug!("{:?} matched {} of {} rows", predicate, slice.num_rows(), dataset.num_rows());
    sum_categories(&slice)
}

/// Total delay hours per category for one (month, day, carrier) slice.
pub fn delay_hours_by_type(
    dataset: &Dataset,
    month: Month,
    day: DayOfMonth,
    carrier: &CarrierFilter,
) -> Result<CategoryTotals> {
    let minutes = slice_minutes(dataset, &day_slice(month, day, carrier))?;
    Ok(minutes_to_hours(&minutes))
}

/// Each category's share of total delay minutes for one (month, day, carrier) slice.
pub fn delay_type_proportions(
    dataset: &Dataset,
    month: Month,
    day: DayOfMonth,
    carrier: &CarrierFilter,
) -> Result<DelayProportions> {
    let minutes = slice_minutes(dataset, &day_slice(month, day, carrier))?;

    let Some(shares) = percentages(&minutes) else {
        return Ok(DelayProportions::NoData);
    };

    Ok(DelayProportions::Breakdown(
        minutes
            .iter()
            .zip(shares)
            .map(|((category, minutes), percent)| CategoryShare {
                category,
                minutes,
                percent,
            })
            .collect(),
    ))
}

/// Delayed-flight count for every calendar month, across the whole dataset.
///
/// Ignores the selected month and day; always twelve entries.
pub fn monthly_occurrences(dataset: &Dataset, carrier: &CarrierFilter) -> Result<Vec<MonthlyOccurrence>> {
    let predicate = Predicate::all().carrier(carrier);
    let slice = predicate.apply(dataset.batch())?;
    debug!("{:?} matched {} of {} rows", predicate, slice.num_rows(), dataset.num_rows());

    let counts = count_by_month(&slice)?;
    counts
        .iter()
        .map(|(number, occurrences)| -> Result<MonthlyOccurrence> {
            let month = Month::try_from(number as u8)
                .map_err(|_| Error::validation("month", number, "must be between 1 and 12"))?;
            Ok(MonthlyOccurrence {
                month: number,
                month_name: month.name(),
                occurrences,
            })
        })
        .collect()
}

/// The `limit` most frequent destinations for one (month, carrier) slice.
///
/// Ignores the selected day. Ties are broken by destination code, ascending.
pub fn top_destinations(
    dataset: &Dataset,
    month: Month,
    carrier: &CarrierFilter,
    limit: usize,
) -> Result<Vec<DestinationCount>> {
    if limit == 0 {
        return Err(Error::validation("limit", limit, "must be greater than 0"));
    }

    let predicate = Predicate::all().month(month).carrier(carrier);
    let slice = predicate.apply(dataset.batch())?;
    debug!("{:?} matched {} of {} rows", predicate, slice.num_rows(), dataset.num_rows());

    let ranked = rank_counts(count_by_destination(&slice)?, limit);
    Ok(ranked
        .into_iter()
        .map(|(destination, occurrences)| DestinationCount {
            destination,
            occurrences,
        })
        .collect())
}

/// All four results for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub month: &'static str,
    pub day: DayOfMonth,
    pub carrier: CarrierFilter,
    pub delay_hours: CategoryTotals,
    pub delay_proportions: DelayProportions,
    pub monthly_occurrences: Vec<MonthlyOccurrence>,
    pub top_destinations: Vec<DestinationCount>,
}

/// Run every query for `selection`.
pub fn dashboard(dataset: &Dataset, selection: &Selection, limit: usize) -> Result<DashboardReport> {
    let Selection {
        month,
        day,
        carrier,
    } = selection;

    Ok(DashboardReport {
        month: month.name(),
        day: *day,
        carrier: carrier.clone(),
        delay_hours: delay_hours_by_type(dataset, *month, *day, carrier)?,
        delay_proportions: delay_type_proportions(dataset, *month, *day, carrier)?,
        monthly_occurrences: monthly_occurrences(dataset, carrier)?,
        top_destinations: top_destinations(dataset, *month, carrier, limit)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FlightDelayRecord;

    fn day(d: u32) -> DayOfMonth {
        DayOfMonth::new(d).unwrap()
    }

    fn aa() -> CarrierFilter {
        CarrierFilter::code("AA")
    }

    fn sample() -> Dataset {
        let mut records = vec![
            FlightDelayRecord::new(1, 5, "AA", "ORD").with_delay(DelayCategory::WeatherDelay, 60.0),
            FlightDelayRecord::new(1, 5, "AA", "ORD"),
            FlightDelayRecord::new(1, 5, "AA", "LAX").with_delay(DelayCategory::WeatherDelay, 120.0),
            FlightDelayRecord::new(1, 5, "UA", "SFO")
                .with_delay(DelayCategory::CarrierDelay, 30.0)
                .with_delay(DelayCategory::NasDelay, 90.0),
            FlightDelayRecord::new(1, 5, "DL", "ATL")
                .with_delay(DelayCategory::LateAircraftDelay, 45.0)
                .with_delay(DelayCategory::SecurityDelay, 15.0),
            FlightDelayRecord::new(1, 6, "AA", "ORD").with_delay(DelayCategory::CarrierDelay, 600.0),
            FlightDelayRecord::new(3, 1, "AA", "DFW"),
            FlightDelayRecord::new(12, 24, "UA", "DEN").with_delay(DelayCategory::WeatherDelay, 5.0),
        ];
        for dest in ["BOS", "BOS", "MIA", "SEA", "PHX", "IAH", "MSP", "DTW", "EWR", "CLT", "JFK"] {
            records.push(FlightDelayRecord::new(1, 20, "WN", dest));
        }
        Dataset::from_records(&records).unwrap()
    }

    #[test]
    fn test_weather_hours_scenario() {
        let hours = delay_hours_by_type(&sample(), Month::January, day(5), &aa()).unwrap();
        let values: Vec<(DelayCategory, f64)> = hours.iter().collect();
        assert_eq!(
            values,
            vec![
                (DelayCategory::CarrierDelay, 0.0),
                (DelayCategory::WeatherDelay, 3.0),
                (DelayCategory::NasDelay, 0.0),
                (DelayCategory::SecurityDelay, 0.0),
                (DelayCategory::LateAircraftDelay, 0.0),
            ]
        );
    }

    #[test]
    fn test_hours_additive_over_carriers() {
        let dataset = sample();
        let all = delay_hours_by_type(&dataset, Month::January, day(5), &CarrierFilter::All).unwrap();

        let mut per_carrier = CategoryTotals::default();
        for code in dataset.carriers() {
            let part = delay_hours_by_type(&dataset, Month::January, day(5), &CarrierFilter::code(code.clone())).unwrap();
            assert!(part.values().iter().all(|v| *v >= 0.0));
            per_carrier.merge(&part);
        }

        for (a, b) in all.values().iter().zip(per_carrier.values()) {
            assert!((a - b).abs() < 1e-9);
        }
        assert!((all.total() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_proportions_sum_to_hundred() {
        let proportions =
            delay_type_proportions(&sample(), Month::January, day(5), &CarrierFilter::All).unwrap();
        let shares = proportions.shares();
        assert_eq!(shares.len(), DelayCategory::COUNT);
        assert_eq!(shares[1].category, DelayCategory::WeatherDelay);
        assert_eq!(shares[1].minutes, 180.0);
        assert!((shares[1].percent - 50.0).abs() < 1e-9);
        let sum: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_proportions_no_data() {
        // Rows exist for this slice, but every delay is zero
        let proportions = delay_type_proportions(&sample(), Month::March, day(1), &aa()).unwrap();
        assert!(proportions.is_no_data());
        assert!(proportions.shares().is_empty());
    }

    #[test]
    fn test_monthly_occurrences() {
        let dataset = sample();
        let months = monthly_occurrences(&dataset, &CarrierFilter::All).unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month_name, "January");
        assert_eq!(months[0].occurrences, 17);
        assert_eq!(months[1].occurrences, 0);
        assert_eq!(months[2].occurrences, 1);
        assert_eq!(months[11].month, 12);
        assert_eq!(months[11].occurrences, 1);
        let total: u64 = months.iter().map(|m| m.occurrences).sum();
        assert_eq!(total, dataset.num_rows() as u64);

        let aa_months = monthly_occurrences(&dataset, &aa()).unwrap();
        assert_eq!(aa_months.len(), 12);
        assert_eq!(aa_months.iter().map(|m| m.occurrences).sum::<u64>(), 5);
    }

    #[test]
    fn test_top_destinations_limit_and_tie_break() {
        let dataset = sample();
        let top = top_destinations(&dataset, Month::January, &CarrierFilter::code("WN"), 3).unwrap();
        let codes: Vec<&str> = top.iter().map(|d| d.destination.as_str()).collect();
        assert_eq!(codes, vec!["BOS", "CLT", "DTW"]);
        assert_eq!(top[0].occurrences, 2);

        let all = top_destinations(&dataset, Month::January, &CarrierFilter::All, DEFAULT_TOP_DESTINATIONS).unwrap();
        assert_eq!(all.len(), DEFAULT_TOP_DESTINATIONS);
        for pair in all.windows(2) {
            assert!(
                pair[0].occurrences > pair[1].occurrences
                    || (pair[0].occurrences == pair[1].occurrences
                        && pair[0].destination < pair[1].destination)
            );
        }
        assert_eq!(all[0].destination, "ORD");
        assert_eq!(all[0].occurrences, 3);
    }

    #[test]
    fn test_top_destinations_ignores_day() {
        let top = top_destinations(&sample(), Month::January, &aa(), 10).unwrap();
        assert_eq!(
            top,
            vec![
                DestinationCount {
                    destination: "ORD".to_string(),
                    occurrences: 3
                },
                DestinationCount {
                    destination: "LAX".to_string(),
                    occurrences: 1
                },
            ]
        );
        // Fewer distinct destinations than the limit: counts cover the whole slice
        assert_eq!(top.iter().map(|d| d.occurrences).sum::<u64>(), 4);
    }

    #[test]
    fn test_top_destinations_zero_limit() {
        let err = top_destinations(&sample(), Month::January, &aa(), 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_slice_february_30() {
        let dataset = sample();
        let hours = delay_hours_by_type(&dataset, Month::February, day(30), &aa()).unwrap();
        assert_eq!(hours, CategoryTotals::default());

        let proportions = delay_type_proportions(&dataset, Month::February, day(30), &aa()).unwrap();
        assert_eq!(proportions, DelayProportions::NoData);

        let top = top_destinations(&dataset, Month::February, &aa(), 10).unwrap();
        assert!(top.is_empty());
    }

    #[test]
    fn test_unknown_carrier_is_empty() {
        let dataset = sample();
        let zz = CarrierFilter::code("ZZ");
        let months = monthly_occurrences(&dataset, &zz).unwrap();
        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.occurrences == 0));
        assert_eq!(
            delay_hours_by_type(&dataset, Month::January, day(5), &zz).unwrap().total(),
            0.0
        );
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::empty().unwrap();
        let report = dashboard(&dataset, &Selection::default(), 10).unwrap();
        assert_eq!(report.delay_hours.total(), 0.0);
        assert!(report.delay_proportions.is_no_data());
        assert_eq!(report.monthly_occurrences.len(), 12);
        assert!(report.top_destinations.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let dataset = sample();
        let selection = Selection::from_parts(1, 5, CarrierFilter::All).unwrap();
        let first = dashboard(&dataset, &selection, 10).unwrap();
        let second = dashboard(&dataset, &selection, 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dashboard_report_json() {
        let selection = Selection::from_parts(1, 5, aa()).unwrap();
        let report = dashboard(&sample(), &selection, 10).unwrap();
        assert_eq!(report.month, "January");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["carrier"], "AA");
        assert_eq!(json["day"], 5);
        assert_eq!(json["delay_hours"]["WeatherDelay"], 3.0);
        assert_eq!(json["delay_proportions"]["status"], "breakdown");
        assert_eq!(json["delay_proportions"]["shares"][1]["category"], "WeatherDelay");
        assert_eq!(json["monthly_occurrences"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn test_queries_share_dataset_across_threads() {
        let dataset = sample();
        let expected = delay_hours_by_type(&dataset, Month::January, day(5), &CarrierFilter::All).unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let hours = delay_hours_by_type(&dataset, Month::January, day(5), &CarrierFilter::All).unwrap();
                    assert_eq!(hours, expected);
                });
            }
        });
    }
}
