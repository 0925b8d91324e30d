//! Work rule model for collective-agreement time rules.
//!
//! A [`WorkRule`] is read-only configuration for one evaluation run. The
//! persisted rule shape stores a single numeric value whose meaning depends on
//! the rule kind; [`WorkRule::from_numeric_value`] splits it into explicit
//! threshold and multiplier fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DayType;

/// The kind of effect a work rule has on a time entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Hours beyond a daily threshold are paid at a multiplier.
    Overtime,
    /// Night or weekend work is paid at a multiplier.
    ShiftDifferential,
    /// Working beyond a daily limit is flagged as a violation.
    MaxHours,
    /// Minimum rest between shifts (recorded, not enforced).
    RestPeriod,
    /// Free-form rule recorded for information.
    Other,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Overtime => write!(f, "overtime"),
            RuleKind::ShiftDifferential => write!(f, "shift_differential"),
            RuleKind::MaxHours => write!(f, "max_hours"),
            RuleKind::RestPeriod => write!(f, "rest_period"),
            RuleKind::Other => write!(f, "other"),
        }
    }
}

/// The day types a rule is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDayType {
    /// Applies on every day type.
    #[default]
    All,
    /// Weekday daytime work only.
    Regular,
    /// Saturday and Sunday work only.
    Weekend,
    /// Night work only.
    Night,
    /// Work on a holiday from the supplied holiday calendar only.
    Holiday,
}

impl RuleDayType {
    /// Returns true if a rule with this scope is applicable to `day_type`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_rule_engine::calculation::DayType;
    /// use payroll_rule_engine::models::RuleDayType;
    ///
    /// assert!(RuleDayType::All.covers(DayType::Night));
    /// assert!(RuleDayType::Weekend.covers(DayType::Weekend));
    /// assert!(!RuleDayType::Weekend.covers(DayType::Regular));
    /// ```
    pub fn covers(self, day_type: DayType) -> bool {
        match self {
            RuleDayType::All => true,
            scoped => scoped.as_day_type() == Some(day_type),
        }
    }

    /// The single day type this scope names, or `None` for [`RuleDayType::All`].
    pub fn as_day_type(self) -> Option<DayType> {
        match self {
            RuleDayType::All => None,
            RuleDayType::Regular => Some(DayType::Regular),
            RuleDayType::Weekend => Some(DayType::Weekend),
            RuleDayType::Night => Some(DayType::Night),
            RuleDayType::Holiday => Some(DayType::Holiday),
        }
    }
}

/// A configured rule governing pay computation for a collective agreement.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::models::{RuleDayType, RuleKind, WorkRule};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rule = WorkRule::from_numeric_value(
///     "Daily overtime",
///     RuleKind::Overtime,
///     RuleDayType::All,
///     Some(Decimal::from_str("8").unwrap()),
///     None,
///     1,
///     true,
/// );
/// assert_eq!(rule.threshold_hours, Some(Decimal::from_str("8").unwrap()));
/// assert_eq!(rule.multiplier, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRule {
    /// Human-readable rule name.
    pub name: String,
    /// What the rule does.
    pub kind: RuleKind,
    /// The day types the rule is scoped to.
    #[serde(default)]
    pub day_type: RuleDayType,
    /// Hour threshold for overtime, max-hours and rest-period rules.
    #[serde(default)]
    pub threshold_hours: Option<Decimal>,
    /// Pay multiplier for overtime and shift-differential rules.
    #[serde(default)]
    pub multiplier: Option<Decimal>,
    /// The raw configured numeric value, kept for audit and `other` rules.
    #[serde(default)]
    pub numeric_value: Option<Decimal>,
    /// Free-form effect description for `other` rules.
    #[serde(default)]
    pub text_value: Option<String>,
    /// Evaluation order, ascending.
    #[serde(default)]
    pub priority: i32,
    /// Inactive rules are never matched.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl WorkRule {
    /// Builds a rule from the single dual-purpose numeric value used by the
    /// persisted rule shape.
    ///
    /// The value becomes `threshold_hours` for overtime, max-hours and
    /// rest-period rules and `multiplier` for shift differentials. It is
    /// always retained in `numeric_value`.
    pub fn from_numeric_value(
        name: impl Into<String>,
        kind: RuleKind,
        day_type: RuleDayType,
        numeric_value: Option<Decimal>,
        text_value: Option<String>,
        priority: i32,
        active: bool,
    ) -> Self {
        let (threshold_hours, multiplier) = match kind {
            RuleKind::Overtime | RuleKind::MaxHours | RuleKind::RestPeriod => (numeric_value, None),
            RuleKind::ShiftDifferential => (None, numeric_value),
            RuleKind::Other => (None, None),
        };

        Self {
            name: name.into(),
            kind,
            day_type,
            threshold_hours,
            multiplier,
            numeric_value,
            text_value,
            priority,
            active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_numeric_value_becomes_threshold_for_overtime() {
        let rule = WorkRule::from_numeric_value(
            "OT",
            RuleKind::Overtime,
            RuleDayType::All,
            Some(dec("9")),
            None,
            1,
            true,
        );
        assert_eq!(rule.threshold_hours, Some(dec("9")));
        assert_eq!(rule.multiplier, None);
        assert_eq!(rule.numeric_value, Some(dec("9")));
    }

    #[test]
    fn test_numeric_value_becomes_multiplier_for_shift_differential() {
        let rule = WorkRule::from_numeric_value(
            "Night loading",
            RuleKind::ShiftDifferential,
            RuleDayType::Night,
            Some(dec("1.25")),
            None,
            1,
            true,
        );
        assert_eq!(rule.threshold_hours, None);
        assert_eq!(rule.multiplier, Some(dec("1.25")));
    }

    #[test]
    fn test_other_rule_keeps_only_raw_value() {
        let rule = WorkRule::from_numeric_value(
            "Meal break",
            RuleKind::Other,
            RuleDayType::All,
            Some(dec("30")),
            Some("Paid meal break".to_string()),
            5,
            true,
        );
        assert_eq!(rule.threshold_hours, None);
        assert_eq!(rule.multiplier, None);
        assert_eq!(rule.numeric_value, Some(dec("30")));
        assert_eq!(rule.text_value.as_deref(), Some("Paid meal break"));
    }

    #[test]
    fn test_rule_day_type_coverage() {
        assert!(RuleDayType::All.covers(DayType::Regular));
        assert!(RuleDayType::All.covers(DayType::Holiday));
        assert!(RuleDayType::Night.covers(DayType::Night));
        assert!(!RuleDayType::Night.covers(DayType::Weekend));
        assert!(RuleDayType::Holiday.covers(DayType::Holiday));
        assert!(!RuleDayType::Regular.covers(DayType::Night));
    }

    #[test]
    fn test_deserialize_rule_defaults() {
        let json = r#"{"name": "OT", "kind": "overtime"}"#;
        let rule: WorkRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.day_type, RuleDayType::All);
        assert_eq!(rule.priority, 0);
        assert!(rule.active);
        assert_eq!(rule.threshold_hours, None);
    }

    #[test]
    fn test_rule_kind_display_matches_serde_name() {
        let json = serde_json::to_string(&RuleKind::ShiftDifferential).unwrap();
        assert_eq!(json, "\"shift_differential\"");
        assert_eq!(RuleKind::ShiftDifferential.to_string(), "shift_differential");
    }
}
