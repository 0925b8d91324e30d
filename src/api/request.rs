//! Request types for the Payroll Rule Evaluation Engine API.
//!
//! This module defines the JSON request structures for the time-rule and
//! leave deduction endpoints, and their conversion into service scopes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{LeaveDeductionItem, RuleDayType, RuleKind, WorkRule};
use crate::service::{LeaveCalculationScope, RuleSource, SimulationScope, TransactionBatch};

/// Request body for the `/time-rules/simulate` endpoint.
///
/// Exactly one of `agreement_id` and `rules` must be given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateRequest {
    /// Simulate the stored rules of this agreement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_id: Option<String>,
    /// Simulate these rules instead of stored ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<WorkRuleRequest>>,
    /// First local date to sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Last local date to sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    /// The company whose time entries are sampled.
    #[serde(default)]
    pub company_id: String,
    /// Maximum number of entries to sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<usize>,
}

/// A rule supplied inline with a simulation request.
///
/// Uses the persisted field names. `threshold_hours` and `multiplier`, when
/// given, override the value derived from `value_numeric`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkRuleRequest {
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
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Explicit threshold in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_hours: Option<Decimal>,
    /// Explicit pay multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<Decimal>,
}

fn default_active() -> bool {
    true
}

impl From<WorkRuleRequest> for WorkRule {
    fn from(req: WorkRuleRequest) -> Self {
        let rule = WorkRule::from_numeric_value(
            req.rule_name,
            req.rule_type,
            req.day_type,
            req.value_numeric,
            req.value_text,
            req.priority,
            req.is_active,
        );
        WorkRule {
            threshold_hours: req.threshold_hours.or(rule.threshold_hours),
            multiplier: req.multiplier.or(rule.multiplier),
            ..rule
        }
    }
}

impl TryFrom<SimulateRequest> for SimulationScope {
    type Error = EngineError;

    fn try_from(req: SimulateRequest) -> Result<Self, Self::Error> {
        let rules = match (req.agreement_id, req.rules) {
            (Some(agreement_id), None) => RuleSource::Agreement(agreement_id),
            (None, Some(rules)) => RuleSource::AdHoc(rules.into_iter().map(Into::into).collect()),
            (Some(_), Some(_)) => {
                return Err(EngineError::InvalidInput {
                    field: "rules".to_string(),
                    message: "provide either agreement_id or rules, not both".to_string(),
                });
            }
            (None, None) => {
                return Err(EngineError::InvalidInput {
                    field: "rules".to_string(),
                    message: "one of agreement_id or rules is required".to_string(),
                });
            }
        };

        Ok(SimulationScope {
            company_id: req.company_id,
            rules,
            date_from: req.date_from,
            date_to: req.date_to,
            sample_size: req.sample_size,
        })
    }
}

/// Request body for the `/leave-deductions/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateLeaveRequest {
    /// Owning company.
    #[serde(default)]
    pub company_id: String,
    /// The employee whose leave is valued.
    #[serde(default)]
    pub employee_id: String,
    /// First day of the pay period (inclusive).
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub pay_period_end: NaiveDate,
    /// The employee's daily rate.
    pub daily_rate: Decimal,
}

impl From<CalculateLeaveRequest> for LeaveCalculationScope {
    fn from(req: CalculateLeaveRequest) -> Self {
        LeaveCalculationScope {
            company_id: req.company_id,
            employee_id: req.employee_id,
            pay_period_start: req.pay_period_start,
            pay_period_end: req.pay_period_end,
            daily_rate: req.daily_rate,
        }
    }
}

/// Request body for the `/leave-deductions/save` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveLeaveRequest {
    /// Owning company.
    #[serde(default)]
    pub company_id: String,
    /// The employee the items belong to.
    #[serde(default)]
    pub employee_id: String,
    /// The pay period the items are booked in.
    #[serde(default)]
    pub pay_period_id: String,
    /// The payroll run booking the items.
    #[serde(default)]
    pub payroll_run_id: String,
    /// Items returned by a previous calculation.
    #[serde(default)]
    pub items: Vec<LeaveDeductionItem>,
    /// The daily rate the items were valued at.
    pub daily_rate: Decimal,
    /// The hourly rate; derived from the daily rate when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Decimal>,
}

impl From<SaveLeaveRequest> for TransactionBatch {
    fn from(req: SaveLeaveRequest) -> Self {
        TransactionBatch {
            company_id: req.company_id,
            employee_id: req.employee_id,
            pay_period_id: req.pay_period_id,
            payroll_run_id: req.payroll_run_id,
            items: req.items,
            daily_rate: req.daily_rate,
            hourly_rate: req.hourly_rate,
        }
    }
}

/// Request body for the `/leave-deductions/process` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessLeaveRequest {
    /// The calculation part of the request.
    #[serde(flatten)]
    pub calculation: CalculateLeaveRequest,
    /// The pay period the items are booked in.
    #[serde(default)]
    pub pay_period_id: String,
    /// The payroll run booking the items.
    #[serde(default)]
    pub payroll_run_id: String,
}
