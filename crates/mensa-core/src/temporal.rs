//! # Menu Periods
//!
//! A [`MenuPeriod`] is one calendar month at one level of precision:
//! the unit a compliance check is run over. All date arithmetic in the
//! engine (applicability windows, week counting, deposit validation)
//! goes through this type so that month-boundary handling lives in
//! exactly one place.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A calendar month, validated at construction.
///
/// Serializes to `"YYYY-MM"` (e.g. `"2026-01"`), matching the period
/// strings the dashboard exchanges. Deserialization routes through
/// [`MenuPeriod::parse`] so invalid values are rejected at the wire,
/// not silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuPeriod {
    year: i32,
    month: u32,
}

impl MenuPeriod {
    /// Create a period from a year and a 1-based month.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Parse a `"YYYY-MM"` period string.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidPeriod(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    /// The period's year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The period's 1-based month.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // Safe: month is validated to 1..=12 at construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("validated month always yields a first day")
    }

    /// Last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.expect("validated month always yields a successor")
            .pred_opt()
            .expect("first day of a month always has a predecessor")
    }

    /// Number of days in the month (28–31).
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Whether a date falls inside this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Count the distinct ISO weeks touched by the given dates.
    ///
    /// Weekly rule frequencies scale by this count, so it is derived
    /// from the days the site actually served rather than a fixed 4.
    pub fn iso_week_count(dates: &[NaiveDate]) -> u32 {
        let mut weeks: Vec<(i32, u32)> = dates
            .iter()
            .map(|d| {
                let w = d.iso_week();
                (w.year(), w.week())
            })
            .collect();
        weeks.sort_unstable();
        weeks.dedup();
        weeks.len() as u32
    }
}

impl std::fmt::Display for MenuPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MenuPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MenuPeriod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MenuPeriod {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
