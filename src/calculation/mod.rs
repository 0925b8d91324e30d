//! Calculation logic for the Payroll Rule Evaluation Engine.
//!
//! This module contains the pure calculators: day-type classification of
//! timestamps, interval overlap and business-day counting, rule matching by
//! priority, the collective-agreement time-rule simulator, leave payment
//! resolution against tiered schedules, the leave deduction calculator,
//! run-level aggregation, and the daily-rate helper.

mod aggregation;
mod daily_rate;
mod day_detection;
mod interval;
mod leave_deduction;
mod leave_payment;
mod rule_matching;
mod time_rules;

pub use aggregation::{aggregate_leave_items, summarize_simulation};
pub use daily_rate::{WORKING_DAYS_PER_YEAR, WORKING_HOURS_PER_DAY, daily_rate, hourly_rate};
pub use day_detection::{
    DayClassification, DayType, HolidayCalendar, NightWindow, classify, to_local,
};
pub use interval::{count_business_days, is_business_day, overlap};
pub use leave_deduction::{calculate_deductions, calculate_leave_item};
pub use leave_payment::{
    DEFAULT_REDUCED_PAY_PERCENTAGE, DEFAULT_STATUTORY_PERCENTAGE, FULL_PAY_PERCENTAGE,
    LeavePaymentDefaults, PaymentResolution, resolve_payment, select_tier,
};
pub use rule_matching::match_rules;
pub use time_rules::{
    CombinationPolicy, DEFAULT_MAX_HOURS_THRESHOLD, DEFAULT_OVERTIME_MULTIPLIER,
    DEFAULT_OVERTIME_THRESHOLD_HOURS, DEFAULT_SHIFT_DIFFERENTIAL_MULTIPLIER, SimulationContext,
    TimeRuleDefaults, evaluate_rule, simulate, simulate_entry,
};
