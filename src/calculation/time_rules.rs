//! Collective-agreement time-rule simulation.
//!
//! This module applies an ordered rule set to clocked time entries. Each
//! matched rule yields at most one [`RuleEffect`]; the effects of an entry are
//! combined into a single pay multiplier according to a
//! [`CombinationPolicy`], and breaches of configured limits are reported as
//! violations without affecting pay.
//!
//! ## Rule kinds
//!
//! | Kind                 | Reads             | Default     | Effect when it fires          |
//! |----------------------|-------------------|-------------|-------------------------------|
//! | `overtime`           | `threshold_hours` | 8 hours     | multiplier (default 1.5)      |
//! | `shift_differential` | `multiplier`      | 1.1         | multiplier on night/weekend   |
//! | `max_hours`          | `threshold_hours` | 12 hours    | violation                     |
//! | `rest_period`        | `threshold_hours` | none        | informational only            |
//! | `other`              | `text_value`      | none        | informational only            |

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EngineResult;
use crate::models::{
    DateRange, RuleEffect, RuleKind, SimulationOutcome, SimulationResult, TimeEntry, WorkRule,
};

use super::aggregation::summarize_simulation;
use super::day_detection::{DayClassification, HolidayCalendar, NightWindow, classify, to_local};
use super::rule_matching::match_rules;

/// Default daily hours before overtime applies.
pub const DEFAULT_OVERTIME_THRESHOLD_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Default overtime pay multiplier (1.5).
pub const DEFAULT_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Default shift differential multiplier (1.1).
pub const DEFAULT_SHIFT_DIFFERENTIAL_MULTIPLIER: Decimal = Decimal::from_parts(11, 0, 0, false, 1);

/// Default maximum daily hours before a violation is flagged.
pub const DEFAULT_MAX_HOURS_THRESHOLD: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// How the multipliers of several effects on one entry are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationPolicy {
    /// The largest multiplier wins; multipliers never stack.
    #[default]
    Max,
    /// Multipliers compound multiplicatively.
    Stack,
}

impl CombinationPolicy {
    /// Combines effect multipliers into one pay multiplier, never below 1.
    ///
    /// A stacked product that overflows saturates at [`Decimal::MAX`].
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_rule_engine::calculation::CombinationPolicy;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let multipliers = [Decimal::from_str("1.5").unwrap(), Decimal::from_str("1.2").unwrap()];
    /// assert_eq!(CombinationPolicy::Max.combine(multipliers), Decimal::from_str("1.5").unwrap());
    /// assert_eq!(CombinationPolicy::Stack.combine(multipliers), Decimal::from_str("1.8").unwrap());
    /// ```
    pub fn combine<I>(self, multipliers: I) -> Decimal
    where
        I: IntoIterator<Item = Decimal>,
    {
        let combined = match self {
            CombinationPolicy::Max => multipliers.into_iter().fold(Decimal::ONE, Decimal::max),
            CombinationPolicy::Stack => multipliers
                .into_iter()
                .fold(Decimal::ONE, |product, multiplier| {
                    product.checked_mul(multiplier).unwrap_or(
                        if product.is_sign_negative() == multiplier.is_sign_negative() {
                            Decimal::MAX
                        } else {
                            Decimal::MIN
                        },
                    )
                }),
        };
        combined.max(Decimal::ONE)
    }
}

/// Fallback values for rules whose numeric fields are missing or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRuleDefaults {
    /// Overtime threshold in hours.
    pub overtime_threshold_hours: Decimal,
    /// Overtime multiplier.
    pub overtime_multiplier: Decimal,
    /// Shift differential multiplier.
    pub shift_differential_multiplier: Decimal,
    /// Maximum daily hours.
    pub max_hours_threshold: Decimal,
}

impl Default for TimeRuleDefaults {
    fn default() -> Self {
        Self {
            overtime_threshold_hours: DEFAULT_OVERTIME_THRESHOLD_HOURS,
            overtime_multiplier: DEFAULT_OVERTIME_MULTIPLIER,
            shift_differential_multiplier: DEFAULT_SHIFT_DIFFERENTIAL_MULTIPLIER,
            max_hours_threshold: DEFAULT_MAX_HOURS_THRESHOLD,
        }
    }
}

/// Everything besides rules and entries that a simulation run depends on.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    /// The company's timezone; its local calendar decides day types.
    pub timezone: Tz,
    /// Holidays to classify as [`super::DayType::Holiday`].
    pub holidays: HolidayCalendar,
    /// Hours that count as night work.
    pub night: NightWindow,
    /// Fallbacks for missing rule values.
    pub defaults: TimeRuleDefaults,
    /// How multipliers combine.
    pub policy: CombinationPolicy,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            holidays: HolidayCalendar::default(),
            night: NightWindow::default(),
            defaults: TimeRuleDefaults::default(),
            policy: CombinationPolicy::default(),
        }
    }
}

// Zero and negative values are malformed configuration.
fn configured(value: Option<Decimal>, default: Decimal) -> Decimal {
    value.filter(|v| *v > Decimal::ZERO).unwrap_or(default)
}

/// Evaluates one matched rule against an entry's worked hours.
///
/// Returns `None` when the rule does not fire (hours within the threshold, a
/// differential on the wrong day type, an `other` rule with no value).
pub fn evaluate_rule(
    rule: &WorkRule,
    classification: &DayClassification,
    hours_worked: Decimal,
    defaults: &TimeRuleDefaults,
) -> Option<RuleEffect> {
    let effect = |description: String, multiplier: Option<Decimal>| RuleEffect {
        rule_name: rule.name.clone(),
        kind: rule.kind,
        effect_description: description,
        multiplier,
        is_violation: false,
        violation_message: None,
    };

    match rule.kind {
        RuleKind::Overtime => {
            let threshold = configured(rule.threshold_hours, defaults.overtime_threshold_hours);
            if hours_worked <= threshold {
                return None;
            }
            let multiplier = configured(rule.multiplier, defaults.overtime_multiplier);
            let overtime_hours = hours_worked - threshold;
            Some(effect(
                format!(
                    "{} overtime hours beyond {} hour threshold at {}x",
                    overtime_hours.normalize(),
                    threshold.normalize(),
                    multiplier.normalize()
                ),
                Some(multiplier),
            ))
        }
        RuleKind::ShiftDifferential => {
            let day_type = classification.day_type;
            if !day_type.is_differential() || rule.day_type.as_day_type() != Some(day_type) {
                return None;
            }
            let multiplier = configured(rule.multiplier, defaults.shift_differential_multiplier);
            Some(effect(
                format!(
                    "{} shift differential at {}x",
                    day_type,
                    multiplier.normalize()
                ),
                Some(multiplier),
            ))
        }
        RuleKind::MaxHours => {
            let threshold = configured(rule.threshold_hours, defaults.max_hours_threshold);
            if hours_worked <= threshold {
                return None;
            }
            let message = format!(
                "Exceeded max {} hours/day (worked {})",
                threshold.normalize(),
                hours_worked.normalize()
            );
            Some(RuleEffect {
                is_violation: true,
                violation_message: Some(message.clone()),
                ..effect(message, None)
            })
        }
        // Enforcement needs the previous shift, which a single entry does not carry.
        RuleKind::RestPeriod => {
            let description = match rule.threshold_hours.filter(|h| *h > Decimal::ZERO) {
                Some(hours) => format!(
                    "Rest period of {} hours noted; not checked against previous shift",
                    hours.normalize()
                ),
                None => "Rest period noted; not checked against previous shift".to_string(),
            };
            Some(effect(description, None))
        }
        RuleKind::Other => {
            let description = match (&rule.text_value, rule.numeric_value) {
                (Some(text), _) if !text.trim().is_empty() => text.clone(),
                (_, Some(value)) => format!("Value: {}", value.normalize()),
                _ => return None,
            };
            Some(effect(description, None))
        }
    }
}

/// Applies the rule set to a single time entry.
///
/// Returns `Ok(None)` when no matched rule fired.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidTimeEntry`] when the entry
/// fails validation.
pub fn simulate_entry(
    entry: &TimeEntry,
    rules: &[WorkRule],
    context: &SimulationContext,
) -> EngineResult<Option<SimulationResult>> {
    entry.validate()?;

    let local = to_local(entry.clock_in, context.timezone);
    let classification = classify(local, &context.holidays, context.night);
    let hours_worked = entry.hours_worked();

    let rules_applied: Vec<RuleEffect> = match_rules(rules, classification.day_type)
        .into_iter()
        .filter_map(|rule| evaluate_rule(rule, &classification, hours_worked, &context.defaults))
        .collect();

    if rules_applied.is_empty() {
        return Ok(None);
    }

    let pay_multiplier = context
        .policy
        .combine(rules_applied.iter().filter_map(|effect| effect.multiplier));

    let violations: Vec<String> = rules_applied
        .iter()
        .filter_map(|effect| effect.violation_message.clone())
        .collect();

    Ok(Some(SimulationResult {
        entry_id: entry.id.clone(),
        employee_id: entry.employee_id.clone(),
        date: classification.date,
        day_type: classification.day_type,
        hours_worked,
        rules_applied,
        pay_multiplier,
        violations,
    }))
}

/// Runs the rule set over a batch of time entries.
///
/// Entries that fail validation are logged and skipped but still count
/// towards `total_entries`. An empty or fully inactive rule set yields no
/// results and a zeroed summary.
pub fn simulate(
    rules: &[WorkRule],
    entries: &[TimeEntry],
    context: &SimulationContext,
    date_range: Option<DateRange>,
) -> SimulationOutcome {
    let mut results = Vec::new();

    for entry in entries {
        match simulate_entry(entry, rules, context) {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(err) => {
                warn!(entry_id = %entry.id, error = %err, "Skipping invalid time entry");
            }
        }
    }

    let summary = summarize_simulation(entries.len(), &results, rules.len(), date_range);

    debug!(
        total_entries = summary.total_entries,
        entries_with_rules = summary.entries_with_rules,
        violations = summary.violations,
        rules_applied = summary.rules_applied,
        "Time-rule simulation finished"
    );

    SimulationOutcome { results, summary }
}
