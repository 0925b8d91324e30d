//! Core data models for the Payroll Rule Evaluation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod date_range;
mod employee;
mod leave;
mod leave_deduction;
mod simulation_result;
mod time_entry;
mod work_rule;

pub use date_range::{DateRange, PublicHoliday};
pub use employee::{Compensation, PayFrequency};
pub use leave::{LeaveRequest, LeaveStatus, LeaveType, PaymentMethod, PaymentTier};
pub use leave_deduction::{
    LeaveDeductionItem, LeaveDeductionResult, LeavePayrollTransaction, TransactionKey,
    TransactionType,
};
pub use simulation_result::{RuleEffect, SimulationOutcome, SimulationResult, SimulationSummary};
pub use time_entry::TimeEntry;
pub use work_rule::{RuleDayType, RuleKind, WorkRule};
