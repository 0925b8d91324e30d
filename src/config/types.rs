//! Configuration types for the rule engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::{
    CombinationPolicy, DEFAULT_MAX_HOURS_THRESHOLD, DEFAULT_OVERTIME_MULTIPLIER,
    DEFAULT_OVERTIME_THRESHOLD_HOURS, DEFAULT_REDUCED_PAY_PERCENTAGE,
    DEFAULT_SHIFT_DIFFERENTIAL_MULTIPLIER, DEFAULT_STATUTORY_PERCENTAGE, LeavePaymentDefaults,
    NightWindow, TimeRuleDefaults, WORKING_HOURS_PER_DAY,
};
use crate::models::PublicHoliday;

/// Identifying information about the engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// Human-readable name of the configuration.
    pub name: String,
    /// Version or effective date of the configuration.
    pub version: String,
}

impl Default for EngineMetadata {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            version: "built-in".to_string(),
        }
    }
}

/// Time-rule simulation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeRuleSettings {
    /// How the multipliers of an entry's effects combine.
    pub combination_policy: CombinationPolicy,
    /// Fallback overtime threshold in hours.
    pub overtime_threshold_hours: Decimal,
    /// Fallback overtime multiplier.
    pub overtime_multiplier: Decimal,
    /// Fallback shift differential multiplier.
    pub shift_differential_multiplier: Decimal,
    /// Fallback maximum daily hours.
    pub max_hours_threshold: Decimal,
    /// First hour of the night window.
    pub night_start_hour: u32,
    /// First hour after the night window.
    pub night_end_hour: u32,
    /// Entries examined when a request does not say.
    pub default_sample_size: usize,
    /// Days before `date_to` that a request without `date_from` covers.
    pub default_lookback_days: u32,
}

impl Default for TimeRuleSettings {
    fn default() -> Self {
        let night = NightWindow::default();
        Self {
            combination_policy: CombinationPolicy::default(),
            overtime_threshold_hours: DEFAULT_OVERTIME_THRESHOLD_HOURS,
            overtime_multiplier: DEFAULT_OVERTIME_MULTIPLIER,
            shift_differential_multiplier: DEFAULT_SHIFT_DIFFERENTIAL_MULTIPLIER,
            max_hours_threshold: DEFAULT_MAX_HOURS_THRESHOLD,
            night_start_hour: night.start_hour,
            night_end_hour: night.end_hour,
            default_sample_size: 100,
            default_lookback_days: 30,
        }
    }
}

impl TimeRuleSettings {
    /// Fallback values handed to the simulator.
    pub fn defaults(&self) -> TimeRuleDefaults {
        TimeRuleDefaults {
            overtime_threshold_hours: self.overtime_threshold_hours,
            overtime_multiplier: self.overtime_multiplier,
            shift_differential_multiplier: self.shift_differential_multiplier,
            max_hours_threshold: self.max_hours_threshold,
        }
    }

    /// The configured night window.
    pub fn night_window(&self) -> NightWindow {
        NightWindow {
            start_hour: self.night_start_hour,
            end_hour: self.night_end_hour,
        }
    }
}

/// Leave deduction settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeaveSettings {
    /// Percentage paid for reduced-pay leave with no matching tier.
    pub reduced_pay_default_percentage: Decimal,
    /// Percentage paid for statutory sick leave.
    pub statutory_percentage: Decimal,
    /// Hours recorded per leave day on persisted transactions.
    pub hours_per_leave_day: Decimal,
}

impl Default for LeaveSettings {
    fn default() -> Self {
        Self {
            reduced_pay_default_percentage: DEFAULT_REDUCED_PAY_PERCENTAGE,
            statutory_percentage: DEFAULT_STATUTORY_PERCENTAGE,
            hours_per_leave_day: WORKING_HOURS_PER_DAY,
        }
    }
}

impl LeaveSettings {
    /// Payment percentages handed to the leave calculator.
    pub fn payment_defaults(&self) -> LeavePaymentDefaults {
        LeavePaymentDefaults {
            reduced_pay_percentage: self.reduced_pay_default_percentage,
            statutory_percentage: self.statutory_percentage,
        }
    }
}

/// Engine settings file structure (`engine.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Configuration metadata.
    pub metadata: EngineMetadata,
    /// Default IANA timezone name for companies without an override.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Per-company IANA timezone overrides, keyed by company id.
    #[serde(default)]
    pub company_timezones: HashMap<String, String>,
    /// Time-rule simulation settings.
    #[serde(default)]
    pub time_rules: TimeRuleSettings,
    /// Leave deduction settings.
    #[serde(default)]
    pub leave: LeaveSettings,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            metadata: EngineMetadata::default(),
            timezone: default_timezone(),
            company_timezones: HashMap::new(),
            time_rules: TimeRuleSettings::default(),
            leave: LeaveSettings::default(),
        }
    }
}

/// Holidays file structure (`holidays.yaml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidaysConfig {
    /// Public holidays applied to every company.
    #[serde(default)]
    pub holidays: Vec<PublicHoliday>,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    settings: EngineSettings,
    holidays: Vec<PublicHoliday>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    ///
    /// Holidays are kept sorted by date.
    pub fn new(settings: EngineSettings, holidays: Vec<PublicHoliday>) -> Self {
        let mut sorted_holidays = holidays;
        sorted_holidays.sort_by(|a, b| a.date.cmp(&b.date));
        Self {
            settings,
            holidays: sorted_holidays,
        }
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.settings.metadata
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the configured holidays, oldest first.
    pub fn holidays(&self) -> &[PublicHoliday] {
        &self.holidays
    }
}
