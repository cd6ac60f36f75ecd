//! User selection: month, day-of-month and carrier
//!
//! Range checks happen here, when a selection value is built. A query that
//! receives a `Month` and a `DayOfMonth` never has to re-validate them.

use std::fmt;
use std::str::FromStr;

use chrono::Month;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Label of the "no carrier filter" choice
pub const ALL_CARRIERS_LABEL: &str = "All Carriers";

pub const MAX_DAY_OF_MONTH: u32 = 31;

/// Month from its calendar number (1 = January).
pub fn month_from_number(number: u32) -> Result<Month> {
    u8::try_from(number)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
        .ok_or_else(|| Error::validation("month", number, "must be between 1 and 12"))
}

/// Month from a number (`"3"`) or an English name (`"March"`, `"mar"`).
pub fn parse_month(input: &str) -> Result<Month> {
    let input = input.trim();
    if let Ok(number) = input.parse::<u32>() {
        return month_from_number(number);
    }
    input
        .parse::<Month>()
        .map_err(|_| Error::validation("month", input, "expected a month name or 1-12"))
}

/// The twelve months in calendar order
pub fn months() -> impl Iterator<Item = Month> {
    (1..=12u8).filter_map(|n| Month::try_from(n).ok())
}

/// Day of month, 1 through 31.
///
/// Only the range is checked: February 30 is a valid selection that simply
/// matches no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DayOfMonth(u32);

impl DayOfMonth {
    pub fn new(day: u32) -> Result<Self> {
        if (1..=MAX_DAY_OF_MONTH).contains(&day) {
            Ok(Self(day))
        } else {
            Err(Error::validation("day", day, "must be between 1 and 31"))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// All selectable days
    pub fn all() -> impl Iterator<Item = DayOfMonth> {
        (1..=MAX_DAY_OF_MONTH).map(DayOfMonth)
    }
}

impl FromStr for DayOfMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let day = s
            .parse::<u32>()
            .map_err(|_| Error::validation("day", s, "expected a number between 1 and 31"))?;
        Self::new(day)
    }
}

impl fmt::Display for DayOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Carrier part of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CarrierFilter {
    /// No carrier filter
    #[default]
    All,
    /// Exactly this carrier code
    Code(String),
}

impl CarrierFilter {
    pub fn code(code: impl Into<String>) -> Self {
        Self::Code(code.into())
    }

    /// The carrier code to match, or `None` for all carriers
    pub fn as_code(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Code(code) => Some(code),
        }
    }

    pub fn label(&self) -> &str {
        self.as_code().unwrap_or(ALL_CARRIERS_LABEL)
    }
}

impl FromStr for CarrierFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::validation("carrier", s, "must not be empty"));
        }
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case(ALL_CARRIERS_LABEL) {
            Ok(Self::All)
        } else {
            Ok(Self::Code(s.to_string()))
        }
    }
}

impl fmt::Display for CarrierFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CarrierFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A validated (month, day, carrier) choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub month: Month,
    pub day: DayOfMonth,
    pub carrier: CarrierFilter,
}

impl Selection {
    pub fn new(month: Month, day: DayOfMonth, carrier: CarrierFilter) -> Self {
        Self {
            month,
            day,
            carrier,
        }
    }

    /// Build from raw numbers, rejecting out-of-range month or day.
    pub fn from_parts(month: u32, day: u32, carrier: CarrierFilter) -> Result<Self> {
        Ok(Self::new(month_from_number(month)?, DayOfMonth::new(day)?, carrier))
    }

    /// Build from text input, as typed on a command line.
    pub fn parse(month: &str, day: &str, carrier: &str) -> Result<Self> {
        Ok(Self::new(parse_month(month)?, day.parse()?, carrier.parse()?))
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            month: Month::January,
            day: DayOfMonth(1),
            carrier: CarrierFilter::All,
        }
    }
}
