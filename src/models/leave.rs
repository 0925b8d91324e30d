//! Leave request, leave type and payment tier models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::DateRange;

/// Approval state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting approval.
    Pending,
    /// Approved; the only state that affects payroll.
    Approved,
    /// Rejected by an approver.
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

/// An employee's request for leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The employee taking leave.
    pub employee_id: String,
    /// The leave type the request was filed under.
    pub leave_type_id: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Current approval state.
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Returns the leave span as a [`DateRange`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLeaveRequest`] when the end date is
    /// before the start date.
    pub fn date_range(&self) -> EngineResult<DateRange> {
        DateRange::new(self.start_date, self.end_date).map_err(|_| {
            EngineError::InvalidLeaveRequest {
                leave_request_id: self.id.clone(),
                message: format!(
                    "end_date {} is before start_date {}",
                    self.end_date, self.start_date
                ),
            }
        })
    }

    /// Returns true if the request is approved.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }
}

/// How leave of a given type is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid at 100%.
    #[default]
    FullPay,
    /// Not paid; the full value is deducted.
    Unpaid,
    /// Paid at a tiered or default reduced percentage.
    ReducedPay,
    /// Paid at the statutory sick pay percentage.
    Statutory,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::FullPay => write!(f, "full_pay"),
            PaymentMethod::Unpaid => write!(f, "unpaid"),
            PaymentMethod::ReducedPay => write!(f, "reduced_pay"),
            PaymentMethod::Statutory => write!(f, "statutory"),
        }
    }
}

/// A configured category of leave.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::models::{LeaveType, PaymentMethod};
///
/// let sick = LeaveType {
///     id: "lt_sick".to_string(),
///     name: "Sick Leave".to_string(),
///     is_paid: None,
///     payment_method: Some(PaymentMethod::Statutory),
/// };
/// assert!(sick.is_paid());
/// assert_eq!(sick.payment_method(), PaymentMethod::Statutory);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// Unique identifier for the leave type.
    pub id: String,
    /// Display name, used in transaction descriptions.
    pub name: String,
    /// Whether the leave is paid. Only an explicit `false` makes it unpaid.
    #[serde(default)]
    pub is_paid: Option<bool>,
    /// Payment method; defaults to full pay when unset.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

impl LeaveType {
    /// Returns false only when the leave type is explicitly marked unpaid.
    pub fn is_paid(&self) -> bool {
        self.is_paid != Some(false)
    }

    /// Returns the configured payment method, defaulting to full pay.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method.unwrap_or_default()
    }
}

/// A day-count band with an associated payment percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTier {
    /// First day count covered by the tier (inclusive).
    pub from_day: u32,
    /// Last day count covered (inclusive); `None` is unbounded.
    #[serde(default)]
    pub to_day: Option<u32>,
    /// Percentage of the daily rate paid, 0 to 100.
    pub payment_percentage: Decimal,
    /// Evaluation order, ascending.
    #[serde(default)]
    pub sort_order: i32,
}

impl PaymentTier {
    /// Returns true if `days` falls inside this tier's band.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_rule_engine::models::PaymentTier;
    /// use rust_decimal::Decimal;
    ///
    /// let tier = PaymentTier {
    ///     from_day: 4,
    ///     to_day: None,
    ///     payment_percentage: Decimal::from(50),
    ///     sort_order: 2,
    /// };
    /// assert!(!tier.contains(3));
    /// assert!(tier.contains(4));
    /// assert!(tier.contains(400));
    /// ```
    pub fn contains(&self, days: u32) -> bool {
        days >= self.from_day && self.to_day.is_none_or(|to_day| days <= to_day)
    }
}
