//! Rule matching.
//!
//! Selects the active rules applicable to a classified day type and orders
//! them by priority.

use crate::models::WorkRule;

use super::DayType;

/// Returns the active rules scoped to `day_type` (or to all days), sorted
/// ascending by priority.
///
/// The sort is stable, so rules with equal priority keep their input order.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::calculation::{match_rules, DayType};
/// use payroll_rule_engine::models::{RuleDayType, RuleKind, WorkRule};
///
/// let rules = vec![
///     WorkRule::from_numeric_value("Max hours", RuleKind::MaxHours, RuleDayType::All, None, None, 2, true),
///     WorkRule::from_numeric_value("Overtime", RuleKind::Overtime, RuleDayType::All, None, None, 1, true),
///     WorkRule::from_numeric_value("Weekend", RuleKind::ShiftDifferential, RuleDayType::Weekend, None, None, 0, true),
/// ];
///
/// let matched = match_rules(&rules, DayType::Regular);
/// let names: Vec<&str> = matched.iter().map(|r| r.name.as_str()).collect();
/// assert_eq!(names, vec!["Overtime", "Max hours"]);
/// ```
pub fn match_rules(rules: &[WorkRule], day_type: DayType) -> Vec<&WorkRule> {
    let mut matched: Vec<&WorkRule> = rules
        .iter()
        .filter(|rule| rule.active && rule.day_type.covers(day_type))
        .collect();
    matched.sort_by_key(|rule| rule.priority);
    matched
}
