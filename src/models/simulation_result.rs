//! Time-rule simulation result models.
//!
//! This module contains the [`SimulationResult`] produced for each time entry
//! that matched at least one rule, the [`RuleEffect`] audit records inside it,
//! and the run-level [`SimulationSummary`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DayType;

use super::{DateRange, RuleKind};

/// The recorded effect of one rule on one time entry.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::models::{RuleEffect, RuleKind};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let effect = RuleEffect {
///     rule_name: "Daily overtime".to_string(),
///     kind: RuleKind::Overtime,
///     effect_description: "2 overtime hours beyond 8 at 1.5x".to_string(),
///     multiplier: Some(Decimal::from_str("1.5").unwrap()),
///     is_violation: false,
///     violation_message: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEffect {
    /// Name of the rule that produced this effect.
    pub rule_name: String,
    /// Kind of the rule.
    pub kind: RuleKind,
    /// Human-readable description of the effect.
    pub effect_description: String,
    /// Pay multiplier contributed by the rule, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<Decimal>,
    /// Whether the effect flags a breach of a configured limit.
    pub is_violation: bool,
    /// The violation message when `is_violation` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_message: Option<String>,
}

/// The outcome of evaluating a rule set against one time entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// The time entry the result was computed for.
    pub entry_id: String,
    /// The employee who worked the entry.
    pub employee_id: String,
    /// Company-local date of the clock-in.
    pub date: NaiveDate,
    /// The classified day type of the clock-in.
    pub day_type: DayType,
    /// Hours worked on the entry.
    pub hours_worked: Decimal,
    /// Effects in rule priority order.
    pub rules_applied: Vec<RuleEffect>,
    /// Combined multiplier, never below 1.
    pub pay_multiplier: Decimal,
    /// Violation messages, in rule priority order.
    pub violations: Vec<String>,
}

impl SimulationResult {
    /// Returns true if any rule flagged a violation.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// Run-level counts for a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Number of time entries examined, including skipped ones.
    pub total_entries: usize,
    /// Number of entries that produced at least one effect.
    pub entries_with_rules: usize,
    /// Number of entries with at least one violation.
    pub violations: usize,
    /// Total effects recorded across all entries.
    pub rules_applied: usize,
    /// The queried date range, when the run was scoped to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// Number of rules supplied to the run.
    pub rules_tested: usize,
}

/// Results and summary of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// One result per entry that produced an effect.
    pub results: Vec<SimulationResult>,
    /// Run-level counts.
    pub summary: SimulationSummary,
}
