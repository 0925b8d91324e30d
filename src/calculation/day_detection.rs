//! Day detection for time entries.
//!
//! This module classifies a company-local timestamp into a [`DayType`]
//! (regular, weekend, night or holiday) so that rules scoped to a day type
//! can be matched against it.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::PublicHoliday;

/// Represents the classified type of a worked day.
///
/// Classification precedence is holiday, then weekend, then night, then
/// regular.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::calculation::DayType;
///
/// let day_type = DayType::Weekend;
/// assert_eq!(day_type.to_string(), "weekend");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday, outside the night window.
    Regular,
    /// Saturday or Sunday.
    Weekend,
    /// A weekday inside the night window.
    Night,
    /// A date listed in the holiday calendar.
    Holiday,
}

impl DayType {
    /// Returns true for the day types that attract a shift differential.
    pub fn is_differential(self) -> bool {
        matches!(self, DayType::Night | DayType::Weekend)
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Regular => write!(f, "regular"),
            DayType::Weekend => write!(f, "weekend"),
            DayType::Night => write!(f, "night"),
            DayType::Holiday => write!(f, "holiday"),
        }
    }
}

/// Hours of the day that count as night work.
///
/// The window wraps midnight when `start_hour > end_hour`: the default
/// window of 22 to 6 covers 22:00 to 05:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightWindow {
    /// First night hour (inclusive).
    pub start_hour: u32,
    /// First hour after the night ends (exclusive).
    pub end_hour: u32,
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            start_hour: 22,
            end_hour: 6,
        }
    }
}

impl NightWindow {
    /// Returns true if `hour` falls within the night window.
    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }
}

/// A set of holiday dates consulted during classification.
///
/// An empty calendar never yields [`DayType::Holiday`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Builds a calendar from public holiday entries.
    pub fn from_holidays<'a, I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = &'a PublicHoliday>,
    {
        Self {
            dates: holidays.into_iter().map(|h| h.date).collect(),
        }
    }

    /// Returns true if `date` is a holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Returns true if the calendar holds no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// The classification of a single timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayClassification {
    /// The local calendar date.
    pub date: NaiveDate,
    /// The local hour of day, 0 to 23.
    pub hour: u32,
    /// The classified day type.
    pub day_type: DayType,
}

/// Classifies a company-local timestamp.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::calculation::{classify, DayType, HolidayCalendar, NightWindow};
/// use chrono::NaiveDateTime;
///
/// let calendar = HolidayCalendar::default();
/// let night = NightWindow::default();
///
/// // 2026-01-17 is a Saturday
/// let saturday = NaiveDateTime::parse_from_str("2026-01-17 23:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(classify(saturday, &calendar, night).day_type, DayType::Weekend);
///
/// // 2026-01-15 is a Thursday
/// let late = NaiveDateTime::parse_from_str("2026-01-15 22:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(classify(late, &calendar, night).day_type, DayType::Night);
///
/// let morning = NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(classify(morning, &calendar, night).day_type, DayType::Regular);
/// ```
pub fn classify(
    local: NaiveDateTime,
    holidays: &HolidayCalendar,
    night: NightWindow,
) -> DayClassification {
    let date = local.date();
    let hour = local.hour();

    let day_type = if holidays.is_holiday(date) {
        DayType::Holiday
    } else if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        DayType::Weekend
    } else if night.contains_hour(hour) {
        DayType::Night
    } else {
        DayType::Regular
    };

    DayClassification {
        date,
        hour,
        day_type,
    }
}

/// Converts a UTC timestamp to the wall-clock time of `timezone`.
pub fn to_local(timestamp: DateTime<Utc>, timezone: Tz) -> NaiveDateTime {
    timestamp.with_timezone(&timezone).naive_local()
}
