//! Payroll period and date range models.
//!
//! This module contains the [`PayrollPeriod`] type identifying one calendar
//! month of payroll, and the [`DateRange`] used to query attendance within it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The highest year accepted for a payroll period.
pub const MAX_PAYROLL_YEAR: i32 = 9999;

/// An inclusive range of calendar dates.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange {
///     start: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
///     end: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
/// };
/// assert!(range.contains(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
/// assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// The first date of the range (inclusive).
    pub start: NaiveDate,
    /// The last date of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Checks if a given date falls within this range, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates over every date in the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPeriod {
    month: u32,
    year: i32,
}

/// One calendar month of payroll, identified by `(month, year)`.
///
/// A `PayrollPeriod` can only be constructed for a valid month (1–12) and a
/// positive year, so its first and last day are always defined. Deserializing
/// an invalid pair fails the same way [`PayrollPeriod::new`] does.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod::new(2, 2024).unwrap();
/// assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(period.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
///
/// assert!(PayrollPeriod::new(13, 2024).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod", into = "RawPeriod")]
pub struct PayrollPeriod {
    month: u32,
    year: i32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl PayrollPeriod {
    /// Creates a period for the given month and year.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `month` is outside 1–12 or
    /// `year` is outside 1–9999.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::validation(
                "month",
                format!("{} is not between 1 and 12", month),
            ));
        }
        if !(1..=MAX_PAYROLL_YEAR).contains(&year) {
            return Err(EngineError::validation(
                "year",
                format!("{} is not between 1 and {}", year, MAX_PAYROLL_YEAR),
            ));
        }

        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| EngineError::validation("month", "no first day"))?;
        let next_month_start = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = next_month_start
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| EngineError::validation("month", "no last day"))?;

        Ok(Self {
            month,
            year,
            first_day,
            last_day,
        })
    }

    /// Returns the period containing `date`.
    pub fn containing(date: NaiveDate) -> EngineResult<Self> {
        Self::new(date.month(), date.year())
    }

    /// The month, 1–12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The first calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// The inclusive range `[first day, last day]`.
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.first_day,
            end: self.last_day,
        }
    }

    /// Checks if a given date falls within this month.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.date_range().contains(date)
    }

    /// Number of calendar days in the month.
    pub fn day_count(&self) -> u32 {
        self.last_day.day()
    }
}

impl TryFrom<RawPeriod> for PayrollPeriod {
    type Error = EngineError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.month, raw.year)
    }
}

impl From<PayrollPeriod> for RawPeriod {
    fn from(period: PayrollPeriod) -> Self {
        RawPeriod {
            month: period.month,
            year: period.year,
        }
    }
}

impl std::fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_january_bounds() {
        let period = PayrollPeriod::new(1, 2025).unwrap();
        assert_eq!(period.first_day(), date(2025, 1, 1));
        assert_eq!(period.last_day(), date(2025, 1, 31));
        assert_eq!(period.day_count(), 31);
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let period = PayrollPeriod::new(12, 2024).unwrap();
        assert_eq!(period.last_day(), date(2024, 12, 31));
    }

    #[test]
    fn test_february_leap_and_common_years() {
        assert_eq!(PayrollPeriod::new(2, 2024).unwrap().day_count(), 29);
        assert_eq!(PayrollPeriod::new(2, 2025).unwrap().day_count(), 28);
        assert_eq!(PayrollPeriod::new(2, 1900).unwrap().day_count(), 28);
    }

    #[test]
    fn test_rejects_month_zero_and_thirteen() {
        for month in [0, 13] {
            match PayrollPeriod::new(month, 2025) {
                Err(EngineError::Validation { field, .. }) => assert_eq!(field, "month"),
                other => panic!("Expected month validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rejects_non_positive_year() {
        match PayrollPeriod::new(6, 0) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "year"),
            other => panic!("Expected year validation error, got {:?}", other),
        }
        assert!(PayrollPeriod::new(6, -2025).is_err());
    }

    #[test]
    fn test_contains_date_is_inclusive() {
        let period = PayrollPeriod::new(3, 2025).unwrap();
        assert!(period.contains_date(date(2025, 3, 1)));
        assert!(period.contains_date(date(2025, 3, 31)));
        assert!(!period.contains_date(date(2025, 2, 28)));
        assert!(!period.contains_date(date(2025, 4, 1)));
    }

    #[test]
    fn test_date_range_days_iterates_whole_month() {
        let period = PayrollPeriod::new(4, 2025).unwrap();
        let days: Vec<NaiveDate> = period.date_range().days().collect();
        assert_eq!(days.len(), 30);
        assert_eq!(days[0], date(2025, 4, 1));
        assert_eq!(days[29], date(2025, 4, 30));
    }

    #[test]
    fn test_containing_date() {
        let period = PayrollPeriod::containing(date(2025, 7, 19)).unwrap();
        assert_eq!((period.month(), period.year()), (7, 2025));
    }

    #[test]
    fn test_serializes_as_month_and_year_only() {
        let period = PayrollPeriod::new(5, 2025).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, r#"{"month":5,"year":2025}"#);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: PayrollPeriod = serde_json::from_str(r#"{"month":11,"year":2025}"#).unwrap();
        assert_eq!(ok.last_day(), date(2025, 11, 30));

        let bad = serde_json::from_str::<PayrollPeriod>(r#"{"month":0,"year":2025}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(PayrollPeriod::new(3, 2025).unwrap().to_string(), "2025-03");
    }
}
