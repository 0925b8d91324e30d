//! Leave payment resolution.
//!
//! Decides the payment percentage and transaction type for a leave span from
//! its leave type's payment method and, for reduced pay, the leave type's
//! payment tiers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{LeaveType, PaymentMethod, PaymentTier, TransactionType};

/// Percentage paid for full-pay leave.
pub const FULL_PAY_PERCENTAGE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Percentage paid for reduced-pay leave when no tier matches.
pub const DEFAULT_REDUCED_PAY_PERCENTAGE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Statutory sick pay percentage.
pub const DEFAULT_STATUTORY_PERCENTAGE: Decimal = Decimal::from_parts(66, 0, 0, false, 0);

/// Percentages used when a leave type's own configuration does not decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePaymentDefaults {
    /// Fallback for reduced-pay leave with no matching tier.
    pub reduced_pay_percentage: Decimal,
    /// Percentage paid for statutory leave.
    pub statutory_percentage: Decimal,
}

impl Default for LeavePaymentDefaults {
    fn default() -> Self {
        Self {
            reduced_pay_percentage: DEFAULT_REDUCED_PAY_PERCENTAGE,
            statutory_percentage: DEFAULT_STATUTORY_PERCENTAGE,
        }
    }
}

/// The outcome of payment resolution for one leave span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentResolution {
    /// The effective payment method (`unpaid` when the type is unpaid).
    pub payment_method: PaymentMethod,
    /// Percentage of the daily rate paid, 0 to 100.
    pub payment_percentage: Decimal,
    /// How the span is booked.
    pub transaction_type: TransactionType,
}

/// Returns the first tier, in ascending `sort_order`, whose band contains
/// `days`.
///
/// Tiers with equal `sort_order` are tried in input order.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::calculation::select_tier;
/// use payroll_rule_engine::models::PaymentTier;
/// use rust_decimal::Decimal;
///
/// let tiers = vec![
///     PaymentTier { from_day: 4, to_day: None, payment_percentage: Decimal::from(50), sort_order: 2 },
///     PaymentTier { from_day: 1, to_day: Some(3), payment_percentage: Decimal::from(100), sort_order: 1 },
/// ];
///
/// assert_eq!(select_tier(&tiers, 2).unwrap().payment_percentage, Decimal::from(100));
/// assert_eq!(select_tier(&tiers, 5).unwrap().payment_percentage, Decimal::from(50));
/// assert!(select_tier(&tiers, 0).is_none());
/// ```
pub fn select_tier(tiers: &[PaymentTier], days: u32) -> Option<&PaymentTier> {
    let mut ordered: Vec<&PaymentTier> = tiers.iter().collect();
    ordered.sort_by_key(|tier| tier.sort_order);
    ordered.into_iter().find(|tier| tier.contains(days))
}

/// Resolves how `days` of leave of `leave_type` are paid.
///
/// An explicitly unpaid leave type overrides whatever payment method it
/// carries. Tiers are only consulted for reduced-pay leave.
pub fn resolve_payment(
    leave_type: &LeaveType,
    days: u32,
    tiers: &[PaymentTier],
    defaults: &LeavePaymentDefaults,
) -> PaymentResolution {
    let method = leave_type.payment_method();

    if method == PaymentMethod::Unpaid || !leave_type.is_paid() {
        return PaymentResolution {
            payment_method: PaymentMethod::Unpaid,
            payment_percentage: Decimal::ZERO,
            transaction_type: TransactionType::UnpaidDeduction,
        };
    }

    match method {
        PaymentMethod::ReducedPay => {
            let percentage = select_tier(tiers, days)
                .map(|tier| tier.payment_percentage)
                .unwrap_or(defaults.reduced_pay_percentage);
            let percentage = clamp_percentage(percentage);
            let transaction_type = if percentage.is_zero() {
                TransactionType::UnpaidDeduction
            } else {
                TransactionType::PaidLeave
            };
            PaymentResolution {
                payment_method: method,
                payment_percentage: percentage,
                transaction_type,
            }
        }
        PaymentMethod::Statutory => PaymentResolution {
            payment_method: method,
            payment_percentage: clamp_percentage(defaults.statutory_percentage),
            transaction_type: TransactionType::SickLeaveStatutory,
        },
        PaymentMethod::FullPay | PaymentMethod::Unpaid => PaymentResolution {
            payment_method: PaymentMethod::FullPay,
            payment_percentage: FULL_PAY_PERCENTAGE,
            transaction_type: TransactionType::PaidLeave,
        },
    }
}

fn clamp_percentage(percentage: Decimal) -> Decimal {
    percentage.clamp(Decimal::ZERO, FULL_PAY_PERCENTAGE)
}
