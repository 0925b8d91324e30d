//! Leave deduction result models.
//!
//! [`LeaveDeductionItem`] and [`LeaveDeductionResult`] are produced by the
//! pure leave calculator. [`LeavePayrollTransaction`] is the persisted row
//! written by the separate save step, identified by its [`TransactionKey`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PaymentMethod;

/// How a leave line item affects payroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Leave paid in full or at a reduced percentage.
    PaidLeave,
    /// Leave that is not paid and reduces gross pay.
    UnpaidDeduction,
    /// Sick leave paid at the statutory percentage.
    SickLeaveStatutory,
}

/// One leave request's effect on one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDeductionItem {
    /// The leave request this item was computed from.
    pub leave_request_id: String,
    /// The leave type of the request.
    pub leave_type_id: String,
    /// Display name of the leave type.
    pub leave_type_name: String,
    /// Human-readable summary, e.g. "Sick Leave (3 days at 66%)".
    pub description: String,
    /// Business days of the request that fall inside the pay period.
    pub days_in_period: u32,
    /// Whether the leave type is paid.
    pub is_paid: bool,
    /// The resolved payment method.
    pub payment_method: PaymentMethod,
    /// Percentage of the daily rate paid.
    pub payment_percentage: Decimal,
    /// The daily rate used for the amounts.
    pub daily_rate: Decimal,
    /// `days_in_period * daily_rate`.
    pub gross_amount: Decimal,
    /// `gross_amount * payment_percentage / 100`.
    pub net_amount: Decimal,
    /// `gross_amount - net_amount`.
    pub deduction_amount: Decimal,
    /// How the item is booked.
    pub transaction_type: TransactionType,
}

/// Aggregated leave deductions for one employee and pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDeductionResult {
    /// Unpaid share of leave days, in days.
    pub total_unpaid_days: Decimal,
    /// Sum of all deduction amounts.
    pub total_unpaid_deduction: Decimal,
    /// Paid share of leave days, in days.
    pub total_paid_leave_days: Decimal,
    /// The individual line items.
    pub transactions: Vec<LeaveDeductionItem>,
}

impl LeaveDeductionResult {
    /// A result with no items and zero totals.
    pub fn empty() -> Self {
        Self {
            total_unpaid_days: Decimal::ZERO,
            total_unpaid_deduction: Decimal::ZERO,
            total_paid_leave_days: Decimal::ZERO,
            transactions: Vec::new(),
        }
    }
}

/// The natural key of a persisted leave transaction.
///
/// Saving the same key twice replaces the earlier row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionKey {
    /// The employee the transaction belongs to.
    pub employee_id: String,
    /// The leave request the transaction was computed from.
    pub leave_request_id: String,
    /// The pay period the transaction was booked in.
    pub pay_period_id: String,
}

/// A persisted leave payroll transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePayrollTransaction {
    /// Row identifier.
    pub id: Uuid,
    /// Owning company.
    pub company_id: String,
    /// The employee the transaction belongs to.
    pub employee_id: String,
    /// The leave request the transaction was computed from.
    pub leave_request_id: String,
    /// The leave type of the request.
    pub leave_type_id: String,
    /// The pay period the transaction was booked in.
    pub pay_period_id: String,
    /// The payroll run that booked the transaction.
    pub payroll_run_id: String,
    /// How the transaction is booked.
    pub transaction_type: TransactionType,
    /// Leave days in the period.
    pub leave_days: u32,
    /// Leave hours in the period (`leave_days * hours_per_leave_day`).
    pub leave_hours: Decimal,
    /// Daily rate used for the amounts.
    pub daily_rate: Decimal,
    /// Hourly rate recorded alongside the daily rate.
    pub hourly_rate: Decimal,
    /// Gross value of the leave.
    pub gross_amount: Decimal,
    /// Percentage paid.
    pub payment_percentage: Decimal,
    /// Net amount paid.
    pub net_amount: Decimal,
    /// Amount deducted.
    pub deduction_amount: Decimal,
    /// Human-readable summary.
    pub description: String,
    /// When the transaction was written.
    pub processed_at: DateTime<Utc>,
}

impl LeavePayrollTransaction {
    /// Returns the upsert key of this row.
    pub fn key(&self) -> TransactionKey {
        TransactionKey {
            employee_id: self.employee_id.clone(),
            leave_request_id: self.leave_request_id.clone(),
            pay_period_id: self.pay_period_id.clone(),
        }
    }
}
