//! Time entry model.
//!
//! A [`TimeEntry`] is one clock-in/clock-out record captured by the time
//! clock. Entries are immutable input to the time-rule simulator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents one clocked work interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The employee who clocked the entry.
    pub employee_id: String,
    /// When the employee clocked in.
    pub clock_in: DateTime<Utc>,
    /// When the employee clocked out, if they have.
    #[serde(default)]
    pub clock_out: Option<DateTime<Utc>>,
    /// Hours recorded for the entry. Open entries may not have a total yet.
    #[serde(default)]
    pub total_hours: Option<Decimal>,
}

impl TimeEntry {
    /// Returns the hours worked, treating a missing total as zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_rule_engine::models::TimeEntry;
    /// use chrono::{TimeZone, Utc};
    /// use rust_decimal::Decimal;
    ///
    /// let entry = TimeEntry {
    ///     id: "te_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     clock_in: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
    ///     clock_out: None,
    ///     total_hours: None,
    /// };
    /// assert_eq!(entry.hours_worked(), Decimal::ZERO);
    /// ```
    pub fn hours_worked(&self) -> Decimal {
        self.total_hours.unwrap_or(Decimal::ZERO)
    }

    /// Checks the entry for structural faults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimeEntry`] when the recorded hours are
    /// negative or the clock-out precedes the clock-in.
    pub fn validate(&self) -> EngineResult<()> {
        if self.hours_worked() < Decimal::ZERO {
            return Err(EngineError::InvalidTimeEntry {
                entry_id: self.id.clone(),
                message: format!("total_hours {} is negative", self.hours_worked()),
            });
        }

        if let Some(clock_out) = self.clock_out {
            if clock_out < self.clock_in {
                return Err(EngineError::InvalidTimeEntry {
                    entry_id: self.id.clone(),
                    message: "clock_out is before clock_in".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_entry(total_hours: Option<&str>) -> TimeEntry {
        TimeEntry {
            id: "te_001".to_string(),
            employee_id: "emp_001".to_string(),
            clock_in: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
            clock_out: Some(Utc.with_ymd_and_hms(2026, 1, 15, 17, 0, 0).unwrap()),
            total_hours: total_hours.map(dec),
        }
    }

    #[test]
    fn test_hours_worked_uses_total() {
        assert_eq!(make_entry(Some("8.0")).hours_worked(), dec("8.0"));
    }

    #[test]
    fn test_valid_entry_passes() {
        assert!(make_entry(Some("8.0")).validate().is_ok());
    }

    #[test]
    fn test_negative_hours_rejected() {
        let result = make_entry(Some("-1")).validate();
        match result {
            Err(EngineError::InvalidTimeEntry { entry_id, message }) => {
                assert_eq!(entry_id, "te_001");
                assert!(message.contains("negative"));
            }
            other => panic!("Expected InvalidTimeEntry, got {:?}", other),
        }
    }

    #[test]
    fn test_clock_out_before_clock_in_rejected() {
        let mut entry = make_entry(Some("8.0"));
        entry.clock_out = Some(Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap());
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_deserialization_of_open_entry() {
        let json = r#"{
            "id": "te_002",
            "employee_id": "emp_001",
            "clock_in": "2026-01-15T09:00:00Z"
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.clock_out, None);
        assert_eq!(entry.total_hours, None);
        assert!(entry.validate().is_ok());
    }
}
