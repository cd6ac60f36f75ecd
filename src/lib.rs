//! `flight-delays` - filter-and-aggregate queries over a flight delay-cause table
//!
//! A dataset is loaded once (CSV or Parquet) into an immutable Arrow batch.
//! Four pure queries answer, for a selected month, day and carrier:
//!
//! * [`query::delay_hours_by_type`] - delay hours per cause for the exact day
//! * [`query::delay_type_proportions`] - each cause's share of that day's delay
//! * [`query::monthly_occurrences`] - delayed flights per month, whole dataset
//! * [`query::top_destinations`] - most frequent destinations for the month

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod expressions;
pub mod filter;
pub mod logging;
pub mod query;
pub mod reader;
pub mod record;
pub mod selection;
pub mod utils;

pub use aggregator::CategoryTotals;
pub use config::Config;
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use query::{
    dashboard, delay_hours_by_type, delay_type_proportions, monthly_occurrences,
    top_destinations, DashboardReport, DelayProportions, DestinationCount, MonthlyOccurrence,
};
pub use record::{DelayCategory, FlightDelayRecord};
pub use selection::{CarrierFilter, DayOfMonth, Selection};
