//! Date range and public holiday models.
//!
//! This module contains the [`DateRange`] type used for pay periods, leave
//! spans and simulation windows, and the [`PublicHoliday`] entries that feed
//! the optional holiday calendar.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a public holiday.
///
/// Holidays are only consulted when classifying time entries; business-day
/// counting for leave deliberately ignores them.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let holiday = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2026, 12, 25).unwrap(),
///     name: "Christmas Day".to_string(),
///     region: "national".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday.
    pub name: String,
    /// The region where this holiday applies (e.g., "national").
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "national".to_string()
}

/// An inclusive range of calendar dates.
///
/// Both `start_date` and `end_date` belong to the range. A range can only be
/// built through [`DateRange::new`], which rejects a start after the end.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let period = DateRange::new(
///     NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 18).unwrap(),
/// )
/// .unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()));
/// assert_eq!(period.len_days(), 14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = EngineError;

    fn try_from(raw: RawDateRange) -> EngineResult<Self> {
        DateRange::new(raw.start_date, raw.end_date)
    }
}

impl DateRange {
    /// Creates a new inclusive range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDateRange`] when `start_date` is after
    /// `end_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if start_date > end_date {
            return Err(EngineError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The first date of the range.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The last date of the range.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Checks if a given date falls within this range, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days in the range, counting both ends.
    pub fn len_days(&self) -> u32 {
        ((self.end_date - self.start_date).num_days() + 1) as u32
    }

    /// Iterates every calendar date in the range in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let start = self.start_date;
        (0..i64::from(self.len_days())).map(move |offset| start + Duration::days(offset))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        let result = DateRange::new(date("2026-01-20"), date("2026-01-05"));
        match result {
            Err(EngineError::InvalidDateRange { start, end }) => {
                assert_eq!(start, date("2026-01-20"));
                assert_eq!(end, date("2026-01-05"));
            }
            other => panic!("Expected InvalidDateRange, got {:?}", other),
        }
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(date("2026-01-05"), date("2026-01-05")).unwrap();
        assert_eq!(range.len_days(), 1);
        assert!(range.contains_date(date("2026-01-05")));
    }

    #[test]
    fn test_contains_date_bounds() {
        let range = DateRange::new(date("2026-01-05"), date("2026-01-20")).unwrap();
        assert!(range.contains_date(range.start_date()));
        assert!(range.contains_date(range.end_date()));
        assert!(!range.contains_date(date("2026-01-04")));
        assert!(!range.contains_date(date("2026-01-21")));
    }

    #[test]
    fn test_dates_iterates_inclusive() {
        let range = DateRange::new(date("2026-01-30"), date("2026-02-02")).unwrap();
        let dates: Vec<NaiveDate> = range.dates().collect();
        assert_eq!(
            dates,
            vec![
                date("2026-01-30"),
                date("2026-01-31"),
                date("2026-02-01"),
                date("2026-02-02")
            ]
        );
    }

    #[test]
    fn test_deserialize_valid_range() {
        let json = r#"{"start_date": "2026-01-05", "end_date": "2026-01-18"}"#;
        let range: DateRange = serde_json::from_str(json).unwrap();
        assert_eq!(range.start_date(), date("2026-01-05"));
        assert_eq!(range.end_date(), date("2026-01-18"));
    }

    #[test]
    fn test_deserialize_inverted_range_fails() {
        let json = r#"{"start_date": "2026-01-18", "end_date": "2026-01-05"}"#;
        let result: Result<DateRange, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_range() {
        let range = DateRange::new(date("2026-01-05"), date("2026-01-18")).unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert!(json.contains("\"start_date\":\"2026-01-05\""));
        assert!(json.contains("\"end_date\":\"2026-01-18\""));
    }

    #[test]
    fn test_public_holiday_region_defaults_to_national() {
        let json = r#"{"date": "2026-12-25", "name": "Christmas Day"}"#;
        let holiday: PublicHoliday = serde_json::from_str(json).unwrap();
        assert_eq!(holiday.region, "national");
    }
}
