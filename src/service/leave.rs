//! Leave deduction services.
//!
//! Calculation and persistence are separate phases. Saving is an upsert on
//! `(employee_id, leave_request_id, pay_period_id)`, so recomputing and
//! saving a pay period again replaces its rows instead of duplicating them.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_deductions;
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{DateRange, LeaveDeductionItem, LeaveDeductionResult, LeavePayrollTransaction};
use crate::store::RecordStore;

use super::require;

/// The employee and pay period a leave calculation covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveCalculationScope {
    /// Owning company.
    pub company_id: String,
    /// The employee whose leave is valued.
    pub employee_id: String,
    /// First day of the pay period (inclusive).
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub pay_period_end: NaiveDate,
    /// The employee's daily rate.
    pub daily_rate: Decimal,
}

/// Calculated leave items to be booked against a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBatch {
    /// Owning company.
    pub company_id: String,
    /// The employee the items belong to.
    pub employee_id: String,
    /// The pay period the items are booked in.
    pub pay_period_id: String,
    /// The payroll run booking the items.
    pub payroll_run_id: String,
    /// Items from a previous calculation.
    pub items: Vec<LeaveDeductionItem>,
    /// The daily rate the items were valued at.
    pub daily_rate: Decimal,
    /// The hourly rate; derived from the daily rate when absent.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

/// The result of a combined calculate-and-save run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// The calculated deductions.
    pub result: LeaveDeductionResult,
    /// Whether the transactions were written.
    pub persisted: bool,
    /// Rows written.
    pub saved: usize,
    /// The store failure, when the write failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence_error: Option<String>,
}

/// Calculates an employee's leave deductions for a pay period.
///
/// # Errors
///
/// - [`EngineError::MissingField`](crate::error::EngineError::MissingField) for a blank company or employee id,
///   raised before the store is read.
/// - [`EngineError::InvalidDateRange`](crate::error::EngineError::InvalidDateRange) when the period starts after it ends.
/// - [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput) for a negative daily rate.
/// - [`EngineError::Persistence`](crate::error::EngineError::Persistence) when the store cannot be read.
pub fn calculate_leave_deductions(
    store: &dyn RecordStore,
    config: &ConfigLoader,
    scope: &LeaveCalculationScope,
) -> EngineResult<LeaveDeductionResult> {
    require("company_id", &scope.company_id)?;
    require("employee_id", &scope.employee_id)?;
    let period = DateRange::new(scope.pay_period_start, scope.pay_period_end)?;

    let requests =
        store.approved_leave_requests(&scope.company_id, &scope.employee_id, &period)?;
    if requests.is_empty() {
        info!(
            company_id = %scope.company_id,
            employee_id = %scope.employee_id,
            pay_period = %period,
            "No approved leave in pay period"
        );
        return Ok(LeaveDeductionResult::empty());
    }

    let leave_types: HashMap<_, _> = store
        .leave_types(&scope.company_id)?
        .into_iter()
        .map(|leave_type| (leave_type.id.clone(), leave_type))
        .collect();

    let referenced: BTreeSet<&str> = requests
        .iter()
        .map(|request| request.leave_type_id.as_str())
        .filter(|id| leave_types.contains_key(*id))
        .collect();

    let mut tiers = HashMap::new();
    for leave_type_id in referenced {
        let type_tiers = store.payment_tiers(&scope.company_id, leave_type_id)?;
        tiers.insert(leave_type_id.to_string(), type_tiers);
    }

    let result = calculate_deductions(
        &requests,
        &leave_types,
        &tiers,
        &period,
        scope.daily_rate,
        &config.leave_payment_defaults(),
    )?;

    info!(
        company_id = %scope.company_id,
        employee_id = %scope.employee_id,
        pay_period = %period,
        items = result.transactions.len(),
        total_unpaid_deduction = %result.total_unpaid_deduction,
        "Leave deductions calculated"
    );

    Ok(result)
}

/// Turns calculated items into transaction rows.
///
/// `leave_hours` is `days × hours_per_leave_day`; a missing hourly rate is
/// derived as `daily_rate / hours_per_leave_day`.
pub fn build_leave_transactions(
    config: &ConfigLoader,
    batch: &TransactionBatch,
    processed_at: DateTime<Utc>,
) -> Vec<LeavePayrollTransaction> {
    let hours_per_day = config.leave_settings().hours_per_leave_day;
    let hourly_rate = batch.hourly_rate.unwrap_or_else(|| {
        if hours_per_day.is_zero() {
            Decimal::ZERO
        } else {
            batch.daily_rate / hours_per_day
        }
    });

    batch
        .items
        .iter()
        .map(|item| LeavePayrollTransaction {
            id: Uuid::new_v4(),
            company_id: batch.company_id.clone(),
            employee_id: batch.employee_id.clone(),
            leave_request_id: item.leave_request_id.clone(),
            leave_type_id: item.leave_type_id.clone(),
            pay_period_id: batch.pay_period_id.clone(),
            payroll_run_id: batch.payroll_run_id.clone(),
            transaction_type: item.transaction_type,
            leave_days: item.days_in_period,
            leave_hours: Decimal::from(item.days_in_period) * hours_per_day,
            daily_rate: batch.daily_rate,
            hourly_rate,
            gross_amount: item.gross_amount,
            payment_percentage: item.payment_percentage,
            net_amount: item.net_amount,
            deduction_amount: item.deduction_amount,
            description: item.description.clone(),
            processed_at,
        })
        .collect()
}

/// Persists calculated leave items and returns the number of rows written.
///
/// An empty batch writes nothing and does not touch the store.
///
/// # Errors
///
/// - [`EngineError::MissingField`](crate::error::EngineError::MissingField) for any blank id, raised before writing.
/// - [`EngineError::Persistence`](crate::error::EngineError::Persistence) when the write fails.
pub fn save_leave_payroll_transactions(
    store: &dyn RecordStore,
    config: &ConfigLoader,
    batch: &TransactionBatch,
    processed_at: DateTime<Utc>,
) -> EngineResult<usize> {
    require("company_id", &batch.company_id)?;
    require("employee_id", &batch.employee_id)?;
    require("pay_period_id", &batch.pay_period_id)?;
    require("payroll_run_id", &batch.payroll_run_id)?;

    if batch.items.is_empty() {
        return Ok(0);
    }

    let transactions = build_leave_transactions(config, batch, processed_at);
    let saved = store.upsert_leave_transactions(transactions)?;

    info!(
        company_id = %batch.company_id,
        employee_id = %batch.employee_id,
        pay_period_id = %batch.pay_period_id,
        payroll_run_id = %batch.payroll_run_id,
        saved,
        "Leave payroll transactions saved"
    );

    Ok(saved)
}

/// Calculates and persists in one call.
///
/// A failed write does not discard the calculation: the outcome carries the
/// result with `persisted: false` and the store error.
///
/// # Errors
///
/// Any error from [`calculate_leave_deductions`], and
/// [`EngineError::MissingField`](crate::error::EngineError::MissingField) for a blank pay period or payroll run id.
pub fn process_leave_deductions(
    store: &dyn RecordStore,
    config: &ConfigLoader,
    scope: &LeaveCalculationScope,
    pay_period_id: &str,
    payroll_run_id: &str,
    processed_at: DateTime<Utc>,
) -> EngineResult<ProcessOutcome> {
    require("pay_period_id", pay_period_id)?;
    require("payroll_run_id", payroll_run_id)?;

    let result = calculate_leave_deductions(store, config, scope)?;

    let batch = TransactionBatch {
        company_id: scope.company_id.clone(),
        employee_id: scope.employee_id.clone(),
        pay_period_id: pay_period_id.to_string(),
        payroll_run_id: payroll_run_id.to_string(),
        items: result.transactions.clone(),
        daily_rate: scope.daily_rate,
        hourly_rate: None,
    };

    match save_leave_payroll_transactions(store, config, &batch, processed_at) {
        Ok(saved) => Ok(ProcessOutcome {
            result,
            persisted: true,
            saved,
            persistence_error: None,
        }),
        Err(err) if err.is_persistence() => {
            warn!(
                company_id = %scope.company_id,
                employee_id = %scope.employee_id,
                pay_period_id,
                error = %err,
                "Leave deductions calculated but not persisted"
            );
            Ok(ProcessOutcome {
                result,
                persisted: false,
                saved: 0,
                persistence_error: Some(err.to_string()),
            })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{LeaveRequest, LeaveStatus, LeaveType, PaymentMethod, PaymentTier};
    use crate::store::InMemoryStore;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn processed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 6, 0, 0).unwrap()
    }

    fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert_leave_type(
                "company_001",
                LeaveType {
                    id: "lt_extended".to_string(),
                    name: "Extended Leave".to_string(),
                    is_paid: Some(true),
                    payment_method: Some(PaymentMethod::ReducedPay),
                },
            )
            .unwrap();
        for tier in [
            PaymentTier {
                from_day: 1,
                to_day: Some(3),
                payment_percentage: dec("100"),
                sort_order: 1,
            },
            PaymentTier {
                from_day: 4,
                to_day: None,
                payment_percentage: dec("50"),
                sort_order: 2,
            },
        ] {
            store
                .insert_payment_tier("company_001", "lt_extended", tier)
                .unwrap();
        }
        store
            .insert_leave_request(
                "company_001",
                LeaveRequest {
                    id: "lr_001".to_string(),
                    employee_id: "emp_001".to_string(),
                    leave_type_id: "lt_extended".to_string(),
                    start_date: date("2026-01-12"),
                    end_date: date("2026-01-16"),
                    status: LeaveStatus::Approved,
                },
            )
            .unwrap();
        store
    }

    fn scope() -> LeaveCalculationScope {
        LeaveCalculationScope {
            company_id: "company_001".to_string(),
            employee_id: "emp_001".to_string(),
            pay_period_start: date("2026-01-01"),
            pay_period_end: date("2026-01-31"),
            daily_rate: dec("100"),
        }
    }

    #[test]
    fn test_calculate_reads_tiers_from_store() {
        let result =
            calculate_leave_deductions(&seeded_store(), &ConfigLoader::default(), &scope())
                .unwrap();

        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].payment_percentage, dec("50"));
        assert_eq!(result.total_unpaid_deduction, dec("250"));
    }

    #[test]
    fn test_no_leave_is_empty_result() {
        let mut request = scope();
        request.employee_id = "emp_without_leave".to_string();
        let result =
            calculate_leave_deductions(&seeded_store(), &ConfigLoader::default(), &request)
                .unwrap();
        assert_eq!(result, LeaveDeductionResult::empty());
    }

    #[test]
    fn test_blank_employee_is_missing_field() {
        let mut request = scope();
        request.employee_id = String::new();
        match calculate_leave_deductions(&seeded_store(), &ConfigLoader::default(), &request) {
            Err(EngineError::MissingField { field }) => assert_eq!(field, "employee_id"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_period_is_rejected() {
        let mut request = scope();
        request.pay_period_start = date("2026-02-01");
        assert!(matches!(
            calculate_leave_deductions(&seeded_store(), &ConfigLoader::default(), &request),
            Err(EngineError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_transactions_carry_hours_and_rates() {
        let store = seeded_store();
        let config = ConfigLoader::default();
        let result = calculate_leave_deductions(&store, &config, &scope()).unwrap();

        let batch = TransactionBatch {
            company_id: "company_001".to_string(),
            employee_id: "emp_001".to_string(),
            pay_period_id: "pp_2026_01".to_string(),
            payroll_run_id: "run_001".to_string(),
            items: result.transactions,
            daily_rate: dec("100"),
            hourly_rate: None,
        };
        let rows = build_leave_transactions(&config, &batch, processed_at());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].leave_days, 5);
        assert_eq!(rows[0].leave_hours, dec("40"));
        assert_eq!(rows[0].hourly_rate, dec("12.5"));
        assert_eq!(rows[0].net_amount, dec("250"));
        assert_eq!(rows[0].processed_at, processed_at());
    }

    #[test]
    fn test_save_is_idempotent() {
        let store = seeded_store();
        let config = ConfigLoader::default();
        let result = calculate_leave_deductions(&store, &config, &scope()).unwrap();

        let batch = TransactionBatch {
            company_id: "company_001".to_string(),
            employee_id: "emp_001".to_string(),
            pay_period_id: "pp_2026_01".to_string(),
            payroll_run_id: "run_001".to_string(),
            items: result.transactions,
            daily_rate: dec("100"),
            hourly_rate: Some(dec("12.5")),
        };

        save_leave_payroll_transactions(&store, &config, &batch, processed_at()).unwrap();
        save_leave_payroll_transactions(&store, &config, &batch, processed_at()).unwrap();

        let rows = store.leave_transactions("emp_001", "pp_2026_01").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_save_empty_batch_writes_nothing() {
        let batch = TransactionBatch {
            company_id: "company_001".to_string(),
            employee_id: "emp_001".to_string(),
            pay_period_id: "pp_2026_01".to_string(),
            payroll_run_id: "run_001".to_string(),
            items: Vec::new(),
            daily_rate: dec("100"),
            hourly_rate: None,
        };
        let saved = save_leave_payroll_transactions(
            &InMemoryStore::new(),
            &ConfigLoader::default(),
            &batch,
            processed_at(),
        )
        .unwrap();
        assert_eq!(saved, 0);
    }

    #[test]
    fn test_save_requires_payroll_run() {
        let batch = TransactionBatch {
            company_id: "company_001".to_string(),
            employee_id: "emp_001".to_string(),
            pay_period_id: "pp_2026_01".to_string(),
            payroll_run_id: " ".to_string(),
            items: Vec::new(),
            daily_rate: dec("100"),
            hourly_rate: None,
        };
        assert!(matches!(
            save_leave_payroll_transactions(
                &InMemoryStore::new(),
                &ConfigLoader::default(),
                &batch,
                processed_at()
            ),
            Err(EngineError::MissingField { .. })
        ));
    }

    #[test]
    fn test_process_calculates_and_saves() {
        let store = seeded_store();
        let outcome = process_leave_deductions(
            &store,
            &ConfigLoader::default(),
            &scope(),
            "pp_2026_01",
            "run_001",
            processed_at(),
        )
        .unwrap();

        assert!(outcome.persisted);
        assert_eq!(outcome.saved, 1);
        assert_eq!(outcome.persistence_error, None);
        assert_eq!(
            store.leave_transactions("emp_001", "pp_2026_01").unwrap().len(),
            1
        );
    }
}
