//! Record store abstraction.
//!
//! The calculators never touch persistence. The service layer reads rules and
//! records through a [`RecordStore`], hands them to the calculators as plain
//! data, and writes leave transactions back through the same trait.

mod memory;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    DateRange, LeavePayrollTransaction, LeaveRequest, LeaveType, PaymentTier, RuleDayType,
    RuleKind, TimeEntry, WorkRule,
};

pub use memory::InMemoryStore;

/// A persisted collective-agreement time rule.
///
/// The stored shape carries a single `value_numeric` whose meaning depends on
/// `rule_type`; converting into a [`WorkRule`] splits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbaTimeRule {
    /// The agreement the rule belongs to.
    pub agreement_id: String,
    /// Human-readable rule name.
    pub rule_name: String,
    /// What the rule does.
    pub rule_type: RuleKind,
    /// The day types the rule is scoped to.
    #[serde(default)]
    pub day_type: RuleDayType,
    /// Threshold hours or multiplier, depending on `rule_type`.
    #[serde(default)]
    pub value_numeric: Option<Decimal>,
    /// Free-form value for `other` rules.
    #[serde(default)]
    pub value_text: Option<String>,
    /// Evaluation order, ascending.
    #[serde(default)]
    pub priority: i32,
    /// Inactive rules are never matched.
    pub is_active: bool,
}

impl From<CbaTimeRule> for WorkRule {
    fn from(record: CbaTimeRule) -> Self {
        WorkRule::from_numeric_value(
            record.rule_name,
            record.rule_type,
            record.day_type,
            record.value_numeric,
            record.value_text,
            record.priority,
            record.is_active,
        )
    }
}

/// Read and write access to the records the engine works on.
///
/// Implementations own their synchronisation; every method takes `&self`.
/// Failures are reported as [`crate::error::EngineError::Persistence`].
pub trait RecordStore: Send + Sync {
    /// Returns the rules of one agreement. An unknown agreement has no rules.
    fn agreement_rules(&self, company_id: &str, agreement_id: &str) -> EngineResult<Vec<WorkRule>>;

    /// Returns up to `limit` of the company's most recent time entries that
    /// clocked in within `[from, until)`.
    fn time_entries(
        &self,
        company_id: &str,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: usize,
    ) -> EngineResult<Vec<TimeEntry>>;

    /// Returns the employee's approved leave requests that touch `period`.
    fn approved_leave_requests(
        &self,
        company_id: &str,
        employee_id: &str,
        period: &DateRange,
    ) -> EngineResult<Vec<LeaveRequest>>;

    /// Returns the company's leave types.
    fn leave_types(&self, company_id: &str) -> EngineResult<Vec<LeaveType>>;

    /// Returns the payment tiers configured for one leave type.
    fn payment_tiers(&self, company_id: &str, leave_type_id: &str)
    -> EngineResult<Vec<PaymentTier>>;

    /// Inserts or replaces transactions by their
    /// `(employee_id, leave_request_id, pay_period_id)` key and returns the
    /// number of rows written.
    fn upsert_leave_transactions(
        &self,
        transactions: Vec<LeavePayrollTransaction>,
    ) -> EngineResult<usize>;

    /// Returns the transactions booked for an employee in a pay period.
    fn leave_transactions(
        &self,
        employee_id: &str,
        pay_period_id: &str,
    ) -> EngineResult<Vec<LeavePayrollTransaction>>;
}
