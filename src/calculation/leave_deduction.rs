//! Leave deduction calculation.
//!
//! This module values the business days of approved leave that fall inside
//! a pay period. Each leave request produces at most one
//! [`LeaveDeductionItem`]; the items are then aggregated into a
//! [`LeaveDeductionResult`].
//!
//! ## Calculation
//!
//! ```text
//! days      = business days of (leave ∩ pay period)
//! gross     = days × daily_rate
//! net       = gross × percentage / 100
//! deduction = gross − net
//! ```
//!
//! The payment tier is selected once for the whole overlapping span.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    DateRange, LeaveDeductionItem, LeaveDeductionResult, LeaveRequest, LeaveType, PaymentTier,
};

use super::aggregation::aggregate_leave_items;
use super::interval::{count_business_days, overlap};
use super::leave_payment::{LeavePaymentDefaults, resolve_payment};

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Values one leave request against a pay period.
///
/// Returns `Ok(None)` when the request has no business days inside the
/// period.
///
/// # Errors
///
/// - [`EngineError::InvalidLeaveRequest`] when the request ends before it
///   starts.
/// - [`EngineError::CalculationError`] when an amount overflows.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::calculation::{calculate_leave_item, LeavePaymentDefaults};
/// use payroll_rule_engine::models::{DateRange, LeaveRequest, LeaveStatus, LeaveType, PaymentMethod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
/// let request = LeaveRequest {
///     id: "lr_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     leave_type_id: "lt_unpaid".to_string(),
///     start_date: d(12),
///     end_date: d(13),
///     status: LeaveStatus::Approved,
/// };
/// let leave_type = LeaveType {
///     id: "lt_unpaid".to_string(),
///     name: "Unpaid Leave".to_string(),
///     is_paid: Some(false),
///     payment_method: Some(PaymentMethod::Unpaid),
/// };
/// let period = DateRange::new(d(1), d(31)).unwrap();
///
/// let item = calculate_leave_item(
///     &request,
///     &leave_type,
///     &[],
///     &period,
///     Decimal::from(200),
///     &LeavePaymentDefaults::default(),
/// )
/// .unwrap()
/// .unwrap();
///
/// assert_eq!(item.days_in_period, 2);
/// assert_eq!(item.deduction_amount, Decimal::from(400));
/// assert_eq!(item.description, "Unpaid Leave (2 days at 0%)");
/// ```
pub fn calculate_leave_item(
    request: &LeaveRequest,
    leave_type: &LeaveType,
    tiers: &[PaymentTier],
    period: &DateRange,
    daily_rate: Decimal,
    defaults: &LeavePaymentDefaults,
) -> EngineResult<Option<LeaveDeductionItem>> {
    let leave_range = request.date_range()?;

    let Some(shared) = overlap(&leave_range, period) else {
        return Ok(None);
    };

    let days = count_business_days(&shared);
    if days == 0 {
        return Ok(None);
    }

    let resolution = resolve_payment(leave_type, days, tiers, defaults);
    let percentage = resolution.payment_percentage;

    let gross_amount = Decimal::from(days)
        .checked_mul(daily_rate)
        .ok_or_else(|| overflow(request, "gross amount"))?;
    let net_amount = gross_amount
        .checked_mul(percentage)
        .and_then(|amount| amount.checked_div(ONE_HUNDRED))
        .ok_or_else(|| overflow(request, "net amount"))?;
    let deduction_amount = gross_amount - net_amount;

    Ok(Some(LeaveDeductionItem {
        leave_request_id: request.id.clone(),
        leave_type_id: leave_type.id.clone(),
        leave_type_name: leave_type.name.clone(),
        description: format!(
            "{} ({} days at {}%)",
            leave_type.name,
            days,
            percentage.normalize()
        ),
        days_in_period: days,
        is_paid: leave_type.is_paid(),
        payment_method: resolution.payment_method,
        payment_percentage: percentage,
        daily_rate,
        gross_amount,
        net_amount,
        deduction_amount,
        transaction_type: resolution.transaction_type,
    }))
}

fn overflow(request: &LeaveRequest, amount: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} overflowed for leave request {}", amount, request.id),
    }
}

/// Calculates the leave deductions for one employee's pay period.
///
/// `leave_types` is keyed by leave type id and `tiers` by the leave type id
/// they belong to. Requests that are not approved, reference an unknown leave
/// type, or end before they start are logged and skipped.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] when `daily_rate` is negative.
/// - [`EngineError::CalculationError`] when an amount or a total overflows.
pub fn calculate_deductions(
    requests: &[LeaveRequest],
    leave_types: &HashMap<String, LeaveType>,
    tiers: &HashMap<String, Vec<PaymentTier>>,
    period: &DateRange,
    daily_rate: Decimal,
    defaults: &LeavePaymentDefaults,
) -> EngineResult<LeaveDeductionResult> {
    if daily_rate < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "daily_rate".to_string(),
            message: format!("must not be negative, got {}", daily_rate),
        });
    }

    let mut items = Vec::new();

    for request in requests {
        if !request.is_approved() {
            warn!(
                leave_request_id = %request.id,
                status = ?request.status,
                "Skipping leave request that is not approved"
            );
            continue;
        }

        let Some(leave_type) = leave_types.get(&request.leave_type_id) else {
            warn!(
                leave_request_id = %request.id,
                leave_type_id = %request.leave_type_id,
                "Skipping leave request with unknown leave type"
            );
            continue;
        };

        let type_tiers = tiers
            .get(&leave_type.id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        match calculate_leave_item(request, leave_type, type_tiers, period, daily_rate, defaults) {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {
                debug!(leave_request_id = %request.id, "No business days in pay period");
            }
            Err(err @ EngineError::InvalidLeaveRequest { .. }) => {
                warn!(leave_request_id = %request.id, error = %err, "Skipping invalid leave request");
            }
            Err(err) => return Err(err),
        }
    }

    aggregate_leave_items(items)
}
