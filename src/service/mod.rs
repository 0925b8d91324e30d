//! Service layer connecting the record store to the calculators.
//!
//! Each service function validates its scope, loads the records it needs
//! through a [`crate::store::RecordStore`], runs the pure calculators over
//! them, and (for leave) writes the outcome back. Input validation always
//! happens before the store is touched.

mod leave;
mod time_rules;

pub use leave::{
    LeaveCalculationScope, ProcessOutcome, TransactionBatch, build_leave_transactions,
    calculate_leave_deductions, process_leave_deductions, save_leave_payroll_transactions,
};
pub use time_rules::{RuleSource, SimulationScope, run_simulation};

use crate::error::{EngineError, EngineResult};

fn require(field: &str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::MissingField {
            field: field.to_string(),
        });
    }
    Ok(())
}
