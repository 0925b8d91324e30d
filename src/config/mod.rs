//! Configuration loading and management for the Payroll Rule Evaluation Engine.
//!
//! This module provides functionality to load engine configuration from YAML
//! files, including timezone settings, time-rule defaults, leave payment
//! percentages and an optional public holiday list.
//!
//! # Example
//!
//! ```no_run
//! use payroll_rule_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded configuration: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EngineConfig, EngineMetadata, EngineSettings, HolidaysConfig, LeaveSettings, TimeRuleSettings,
};
