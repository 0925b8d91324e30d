//! Error types for the Payroll Rule Evaluation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading configuration,
//! evaluating rules, or reading and writing records.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Payroll Rule Evaluation Engine.
///
/// Expected missing-data cases (no rules, unknown leave type, no matching
/// tier) never produce an error; they degrade to documented defaults. Errors
/// are reserved for structurally invalid input, invalid records and store
/// failures.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::error::EngineError;
///
/// let error = EngineError::MissingField {
///     field: "company_id".to_string(),
/// };
/// assert_eq!(error.to_string(), "Missing required field: company_id");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required identifier was missing or blank.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A request field held a value the engine cannot work with.
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// A date range whose start falls after its end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// A time entry was malformed.
    #[error("Invalid time entry '{entry_id}': {message}")]
    InvalidTimeEntry {
        /// The ID of the invalid time entry.
        entry_id: String,
        /// A description of what made the entry invalid.
        message: String,
    },

    /// A leave request was malformed.
    #[error("Invalid leave request '{leave_request_id}': {message}")]
    InvalidLeaveRequest {
        /// The ID of the invalid leave request.
        leave_request_id: String,
        /// A description of what made the request invalid.
        message: String,
    },

    /// Reading from or writing to the record store failed.
    #[error("Persistence failure during {operation}: {message}")]
    Persistence {
        /// The store operation that failed.
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns true for errors caused by the record store rather than the
    /// calculation itself.
    pub fn is_persistence(&self) -> bool {
        matches!(self, EngineError::Persistence { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_missing_field_displays_field() {
        let error = EngineError::MissingField {
            field: "employee_id".to_string(),
        };
        assert_eq!(error.to_string(), "Missing required field: employee_id");
    }

    #[test]
    fn test_invalid_date_range_displays_both_dates() {
        let error = EngineError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date range: 2026-02-01 is after 2026-01-01"
        );
    }

    #[test]
    fn test_invalid_time_entry_displays_id_and_message() {
        let error = EngineError::InvalidTimeEntry {
            entry_id: "te_001".to_string(),
            message: "clock_out before clock_in".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid time entry 'te_001': clock_out before clock_in"
        );
    }

    #[test]
    fn test_persistence_error_is_flagged() {
        let error = EngineError::Persistence {
            operation: "upsert_leave_transactions".to_string(),
            message: "connection reset".to_string(),
        };
        assert!(error.is_persistence());
        assert_eq!(
            error.to_string(),
            "Persistence failure during upsert_leave_transactions: connection reset"
        );

        let other = EngineError::CalculationError {
            message: "overflow".to_string(),
        };
        assert!(!other.is_persistence());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_field() -> EngineResult<()> {
            Err(EngineError::MissingField {
                field: "company_id".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing_field()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
