//! Employee compensation model.
//!
//! This module defines the [`Compensation`] struct and [`PayFrequency`] enum
//! used to derive the daily rate that leave deductions are valued at.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The period a salary figure is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Salary is an hourly rate.
    Hourly,
    /// Salary is a daily rate.
    Daily,
    /// Salary is paid every week.
    Weekly,
    /// Salary is paid every two weeks.
    Biweekly,
    /// Salary is paid twice a month.
    SemiMonthly,
    /// Salary is paid every month.
    Monthly,
    /// Salary is an annual figure.
    Annual,
}

impl PayFrequency {
    /// Number of pay periods of this frequency in a year.
    ///
    /// Hourly and daily figures are expressed through the standard 2080-hour,
    /// 260-day working year.
    pub fn periods_per_year(self) -> Decimal {
        match self {
            PayFrequency::Hourly => Decimal::from(2080),
            PayFrequency::Daily => Decimal::from(260),
            PayFrequency::Weekly => Decimal::from(52),
            PayFrequency::Biweekly => Decimal::from(26),
            PayFrequency::SemiMonthly => Decimal::from(24),
            PayFrequency::Monthly => Decimal::from(12),
            PayFrequency::Annual => Decimal::ONE,
        }
    }
}

/// An employee's configured pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compensation {
    /// The salary amount, per `pay_frequency`.
    pub salary: Decimal,
    /// The period `salary` is expressed in.
    pub pay_frequency: PayFrequency,
}
