//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::calculation::{HolidayCalendar, LeavePaymentDefaults, SimulationContext};
use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, EngineMetadata, EngineSettings, HolidaysConfig, LeaveSettings};

/// Loads and provides access to engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// resolves per-company simulation settings from them.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml     # Metadata, timezones, time-rule and leave defaults
/// └── holidays.yaml   # Optional public holiday list
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_rule_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let context = loader.simulation_context("company_001");
/// println!("Simulating in {}", context.timezone);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    default_timezone: Tz,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            default_timezone: Tz::UTC,
        }
    }
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - Any file contains invalid YAML
    /// - Any configured timezone is not a known IANA name
    /// - `hours_per_leave_day` is not positive
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let settings = Self::load_yaml::<EngineSettings>(&engine_path)?;

        let holidays_path = path.join("holidays.yaml");
        let holidays = if holidays_path.exists() {
            Self::load_yaml::<HolidaysConfig>(&holidays_path)?.holidays
        } else {
            Vec::new()
        };

        Self::from_config(EngineConfig::new(settings, holidays), &engine_path)
    }

    /// Builds a loader from an in-memory configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParseError`] for an unknown timezone or a
    /// non-positive `hours_per_leave_day`.
    pub fn from_settings(settings: EngineSettings) -> EngineResult<Self> {
        Self::from_config(EngineConfig::new(settings, Vec::new()), Path::new("<memory>"))
    }

    fn from_config(config: EngineConfig, source: &Path) -> EngineResult<Self> {
        let settings = config.settings();
        let default_timezone = parse_timezone(&settings.timezone, source)?;
        for timezone in settings.company_timezones.values() {
            parse_timezone(timezone, source)?;
        }

        let hours_per_leave_day = settings.leave.hours_per_leave_day;
        if hours_per_leave_day <= Decimal::ZERO {
            return Err(EngineError::ConfigParseError {
                path: source.display().to_string(),
                message: format!(
                    "hours_per_leave_day must be positive, got {}",
                    hours_per_leave_day
                ),
            });
        }

        Ok(Self {
            config,
            default_timezone,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        self.config.metadata()
    }

    /// Returns the timezone whose calendar governs `company_id`.
    ///
    /// Company overrides take precedence over the engine default.
    pub fn timezone_for(&self, company_id: &str) -> Tz {
        self.config
            .settings()
            .company_timezones
            .get(company_id)
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or(self.default_timezone)
    }

    /// Builds the simulation context for `company_id`.
    pub fn simulation_context(&self, company_id: &str) -> SimulationContext {
        let time_rules = &self.config.settings().time_rules;
        SimulationContext {
            timezone: self.timezone_for(company_id),
            holidays: HolidayCalendar::from_holidays(self.config.holidays()),
            night: time_rules.night_window(),
            defaults: time_rules.defaults(),
            policy: time_rules.combination_policy,
        }
    }

    /// Returns the leave deduction settings.
    pub fn leave_settings(&self) -> &LeaveSettings {
        &self.config.settings().leave
    }

    /// Returns the payment percentages for the leave calculator.
    pub fn leave_payment_defaults(&self) -> LeavePaymentDefaults {
        self.leave_settings().payment_defaults()
    }

    /// Returns the number of entries a simulation examines by default.
    pub fn default_sample_size(&self) -> usize {
        self.config.settings().time_rules.default_sample_size
    }

    /// Returns how many days back a simulation looks by default.
    pub fn default_lookback_days(&self) -> u32 {
        self.config.settings().time_rules.default_lookback_days
    }
}

fn parse_timezone(name: &str, source: &Path) -> EngineResult<Tz> {
    name.parse::<Tz>().map_err(|_| EngineError::ConfigParseError {
        path: source.display().to_string(),
        message: format!("Unknown timezone: {}", name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::CombinationPolicy;
    use crate::models::PublicHoliday;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().name, "Default payroll rules");
        assert_eq!(loader.metadata().version, "2026-01-01");
    }

    #[test]
    fn test_time_rule_defaults_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let context = loader.simulation_context("company_001");

        assert_eq!(context.defaults.overtime_threshold_hours, dec("8"));
        assert_eq!(context.defaults.overtime_multiplier, dec("1.5"));
        assert_eq!(context.defaults.shift_differential_multiplier, dec("1.1"));
        assert_eq!(context.defaults.max_hours_threshold, dec("12"));
        assert_eq!(context.policy, CombinationPolicy::Max);
        assert_eq!(context.night.start_hour, 22);
        assert_eq!(context.night.end_hour, 6);
    }

    #[test]
    fn test_default_timezone_is_utc() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.timezone_for("company_001"), Tz::UTC);
    }

    #[test]
    fn test_company_timezone_override() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(
            loader.timezone_for("company_nordic"),
            chrono_tz::Europe::Stockholm
        );
    }

    #[test]
    fn test_default_holiday_calendar_is_empty() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert!(loader.config().holidays().is_empty());

        let context = loader.simulation_context("company_001");
        let boxing_day = NaiveDate::from_ymd_opt(2026, 12, 26).unwrap();
        assert!(!context.holidays.is_holiday(boxing_day));
    }

    #[test]
    fn test_holidays_loaded_from_calendar_file() {
        let loader = ConfigLoader::load("./config/nordic").unwrap();
        let holidays = loader.config().holidays();

        assert_eq!(holidays.len(), 4);
        assert!(holidays.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(holidays[0].region, "SE");

        let context = loader.simulation_context("company_001");
        assert_eq!(context.timezone, chrono_tz::Europe::Stockholm);
        let christmas = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        assert!(context.holidays.is_holiday(christmas));
        assert_eq!(loader.leave_settings().statutory_percentage, dec("80"));
    }

    #[test]
    fn test_in_memory_holidays_reach_the_context() {
        let midsummer = NaiveDate::from_ymd_opt(2026, 6, 19).unwrap();
        let config = EngineConfig::new(
            EngineSettings::default(),
            vec![PublicHoliday {
                date: midsummer,
                name: "Midsummer Eve".to_string(),
                region: "national".to_string(),
            }],
        );
        let loader = ConfigLoader::from_config(config, Path::new("<memory>")).unwrap();

        assert!(loader.simulation_context("any").holidays.is_holiday(midsummer));
    }

    #[test]
    fn test_leave_settings_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let leave = loader.leave_settings();

        assert_eq!(leave.reduced_pay_default_percentage, dec("50"));
        assert_eq!(leave.statutory_percentage, dec("66"));
        assert_eq!(leave.hours_per_leave_day, dec("8"));
    }

    #[test]
    fn test_sampling_defaults_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.default_sample_size(), 100);
        assert_eq!(loader.default_lookback_days(), 30);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_unknown_timezone_is_a_parse_error() {
        let settings = EngineSettings {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..EngineSettings::default()
        };
        match ConfigLoader::from_settings(settings) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("Mars/Olympus_Mons"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_company_timezone_is_a_parse_error() {
        let mut settings = EngineSettings::default();
        settings
            .company_timezones
            .insert("company_x".to_string(), "Nowhere/City".to_string());
        assert!(matches!(
            ConfigLoader::from_settings(settings),
            Err(EngineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_zero_hours_per_leave_day_is_rejected() {
        let mut settings = EngineSettings::default();
        settings.leave.hours_per_leave_day = Decimal::ZERO;
        match ConfigLoader::from_settings(settings) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("hours_per_leave_day"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_hours_per_leave_day_in_yaml_is_rejected() {
        let yaml = r#"
metadata:
  name: Negative
  version: "1"
leave:
  hours_per_leave_day: "-8"
"#;
        let settings: EngineSettings = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            ConfigLoader::from_settings(settings),
            Err(EngineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_partial_settings_fall_back_to_defaults() {
        let yaml = r#"
metadata:
  name: Minimal
  version: "1"
time_rules:
  combination_policy: stack
  overtime_multiplier: "2.0"
"#;
        let settings: EngineSettings = serde_yaml::from_str(yaml).unwrap();
        let loader = ConfigLoader::from_settings(settings).unwrap();
        let context = loader.simulation_context("any");

        assert_eq!(context.policy, CombinationPolicy::Stack);
        assert_eq!(context.defaults.overtime_multiplier, dec("2.0"));
        assert_eq!(context.defaults.overtime_threshold_hours, dec("8"));
        assert_eq!(context.timezone, Tz::UTC);
        assert!(context.holidays.is_empty());
        assert_eq!(loader.leave_settings().statutory_percentage, dec("66"));
    }

    #[test]
    fn test_default_loader() {
        let loader = ConfigLoader::default();
        assert_eq!(loader.metadata().name, "default");
        assert_eq!(loader.timezone_for("anyone"), Tz::UTC);
        assert_eq!(loader.default_sample_size(), 100);
    }
}
