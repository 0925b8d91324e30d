//! Interval arithmetic for leave and pay periods.
//!
//! Provides the overlap of two inclusive date ranges and a Monday-to-Friday
//! business-day count. Holidays are not excluded from the count.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::DateRange;

/// Returns the portion of `a` that falls inside `b`, or `None` when the two
/// ranges do not share a day.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::calculation::overlap;
/// use payroll_rule_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
/// let leave = DateRange::new(d(1), d(10)).unwrap();
/// let period = DateRange::new(d(5), d(20)).unwrap();
///
/// let shared = overlap(&leave, &period).unwrap();
/// assert_eq!(shared.start_date(), d(5));
/// assert_eq!(shared.end_date(), d(10));
/// ```
pub fn overlap(a: &DateRange, b: &DateRange) -> Option<DateRange> {
    let start = a.start_date().max(b.start_date());
    let end = a.end_date().min(b.end_date());
    DateRange::new(start, end).ok()
}

/// Returns true for Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts the Monday-to-Friday days in `range`, inclusive of both ends.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::calculation::count_business_days;
/// use payroll_rule_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// // Monday 2026-01-05 to Sunday 2026-01-11
/// let week = DateRange::new(
///     NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 11).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(count_business_days(&week), 5);
/// ```
pub fn count_business_days(range: &DateRange) -> u32 {
    range.dates().filter(|date| is_business_day(*date)).count() as u32
}
