//! Run-level aggregation for both calculators.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    DateRange, LeaveDeductionItem, LeaveDeductionResult, SimulationResult, SimulationSummary,
};

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Builds the summary of a simulation run.
///
/// `total_entries` counts every entry examined, including those that were
/// skipped or produced no effect.
pub fn summarize_simulation(
    total_entries: usize,
    results: &[SimulationResult],
    rules_tested: usize,
    date_range: Option<DateRange>,
) -> SimulationSummary {
    SimulationSummary {
        total_entries,
        entries_with_rules: results.len(),
        violations: results.iter().filter(|r| r.has_violations()).count(),
        rules_applied: results.iter().map(|r| r.rules_applied.len()).sum(),
        date_range,
        rules_tested,
    }
}

/// Totals leave deduction items.
///
/// Each item's days are split into a paid and an unpaid share by its payment
/// percentage, so `total_unpaid_days + total_paid_leave_days` always equals
/// the sum of `days_in_period`.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] when a total overflows.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::calculation::aggregate_leave_items;
///
/// let result = aggregate_leave_items(Vec::new()).unwrap();
/// assert!(result.transactions.is_empty());
/// assert!(result.total_unpaid_deduction.is_zero());
/// ```
pub fn aggregate_leave_items(
    items: Vec<LeaveDeductionItem>,
) -> EngineResult<LeaveDeductionResult> {
    let mut result = LeaveDeductionResult::empty();

    for item in &items {
        let days = Decimal::from(item.days_in_period);
        let percentage = item.payment_percentage;

        if percentage < ONE_HUNDRED {
            let share = share_of(days, ONE_HUNDRED - percentage, "total_unpaid_days")?;
            result.total_unpaid_days = add(result.total_unpaid_days, share, "total_unpaid_days")?;
        }
        if percentage > Decimal::ZERO {
            let share = share_of(days, percentage, "total_paid_leave_days")?;
            result.total_paid_leave_days =
                add(result.total_paid_leave_days, share, "total_paid_leave_days")?;
        }
        result.total_unpaid_deduction = add(
            result.total_unpaid_deduction,
            item.deduction_amount,
            "total_unpaid_deduction",
        )?;
    }

    result.transactions = items;
    Ok(result)
}

fn share_of(days: Decimal, percentage: Decimal, total: &str) -> EngineResult<Decimal> {
    days.checked_mul(percentage)
        .and_then(|v| v.checked_div(ONE_HUNDRED))
        .ok_or_else(|| total_overflow(total))
}

fn add(total: Decimal, amount: Decimal, name: &str) -> EngineResult<Decimal> {
    total.checked_add(amount).ok_or_else(|| total_overflow(name))
}

fn total_overflow(total: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} overflowed while aggregating leave items", total),
    }
}
