//! Daily rate derivation from an employee's compensation.
//!
//! Salaries are annualised by their pay frequency and spread over a
//! 260-day working year (52 weeks of 5 days).

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::Compensation;

/// Working days in a year.
pub const WORKING_DAYS_PER_YEAR: Decimal = Decimal::from_parts(260, 0, 0, false, 0);

/// Working hours in a day (2080 hours over 260 days).
pub const WORKING_HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Derives the daily rate used to value leave days.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] when the salary is negative.
/// - [`EngineError::CalculationError`] when annualising overflows.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::calculation::daily_rate;
/// use payroll_rule_engine::models::{Compensation, PayFrequency};
/// use rust_decimal::Decimal;
///
/// let weekly = Compensation { salary: Decimal::from(1000), pay_frequency: PayFrequency::Weekly };
/// assert_eq!(daily_rate(&weekly).unwrap(), Decimal::from(200));
/// ```
pub fn daily_rate(compensation: &Compensation) -> EngineResult<Decimal> {
    if compensation.salary < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "salary".to_string(),
            message: format!("must not be negative, got {}", compensation.salary),
        });
    }

    let annual = compensation
        .salary
        .checked_mul(compensation.pay_frequency.periods_per_year())
        .ok_or_else(|| EngineError::CalculationError {
            message: format!(
                "annual salary overflowed for {} at {:?} frequency",
                compensation.salary, compensation.pay_frequency
            ),
        })?;

    Ok(annual / WORKING_DAYS_PER_YEAR)
}

/// Derives the hourly rate recorded alongside leave transactions.
///
/// # Errors
///
/// Same as [`daily_rate`].
pub fn hourly_rate(compensation: &Compensation) -> EngineResult<Decimal> {
    Ok(daily_rate(compensation)? / WORKING_HOURS_PER_DAY)
}
