//! In-memory record store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    DateRange, LeavePayrollTransaction, LeaveRequest, LeaveType, PaymentTier, TimeEntry,
    TransactionKey, WorkRule,
};

use super::{CbaTimeRule, RecordStore};

#[derive(Debug, Default)]
struct Records {
    // (company_id, agreement_id)
    rules: HashMap<(String, String), Vec<CbaTimeRule>>,
    time_entries: HashMap<String, Vec<TimeEntry>>,
    // (company_id, employee_id)
    leave_requests: HashMap<(String, String), Vec<LeaveRequest>>,
    leave_types: HashMap<String, Vec<LeaveType>>,
    // (company_id, leave_type_id)
    payment_tiers: HashMap<(String, String), Vec<PaymentTier>>,
    transactions: BTreeMap<TransactionKey, LeavePayrollTransaction>,
}

/// A [`RecordStore`] held entirely in memory behind a [`RwLock`].
///
/// Used by the HTTP integration tests and for embedding the engine without a
/// database.
///
/// # Example
///
/// ```
/// use payroll_rule_engine::store::{InMemoryStore, RecordStore};
/// use payroll_rule_engine::models::LeaveType;
///
/// let store = InMemoryStore::new();
/// store
///     .insert_leave_type("company_001", LeaveType {
///         id: "lt_annual".to_string(),
///         name: "Annual Leave".to_string(),
///         is_paid: Some(true),
///         payment_method: None,
///     })
///     .unwrap();
///
/// assert_eq!(store.leave_types("company_001").unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Records>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, operation: &str) -> EngineResult<RwLockReadGuard<'_, Records>> {
        self.records.read().map_err(|_| poisoned(operation))
    }

    fn write(&self, operation: &str) -> EngineResult<RwLockWriteGuard<'_, Records>> {
        self.records.write().map_err(|_| poisoned(operation))
    }

    /// Adds a persisted agreement rule.
    pub fn insert_rule(&self, company_id: &str, rule: CbaTimeRule) -> EngineResult<()> {
        let mut records = self.write("insert_rule")?;
        records
            .rules
            .entry((company_id.to_string(), rule.agreement_id.clone()))
            .or_default()
            .push(rule);
        Ok(())
    }

    /// Adds a time entry.
    pub fn insert_time_entry(&self, company_id: &str, entry: TimeEntry) -> EngineResult<()> {
        let mut records = self.write("insert_time_entry")?;
        records
            .time_entries
            .entry(company_id.to_string())
            .or_default()
            .push(entry);
        Ok(())
    }

    /// Adds a leave request.
    pub fn insert_leave_request(&self, company_id: &str, request: LeaveRequest) -> EngineResult<()> {
        let mut records = self.write("insert_leave_request")?;
        records
            .leave_requests
            .entry((company_id.to_string(), request.employee_id.clone()))
            .or_default()
            .push(request);
        Ok(())
    }

    /// Adds a leave type.
    pub fn insert_leave_type(&self, company_id: &str, leave_type: LeaveType) -> EngineResult<()> {
        let mut records = self.write("insert_leave_type")?;
        records
            .leave_types
            .entry(company_id.to_string())
            .or_default()
            .push(leave_type);
        Ok(())
    }

    /// Adds a payment tier to a leave type.
    pub fn insert_payment_tier(
        &self,
        company_id: &str,
        leave_type_id: &str,
        tier: PaymentTier,
    ) -> EngineResult<()> {
        let mut records = self.write("insert_payment_tier")?;
        records
            .payment_tiers
            .entry((company_id.to_string(), leave_type_id.to_string()))
            .or_default()
            .push(tier);
        Ok(())
    }
}

fn poisoned(operation: &str) -> EngineError {
    EngineError::Persistence {
        operation: operation.to_string(),
        message: "record store lock poisoned".to_string(),
    }
}

impl RecordStore for InMemoryStore {
    fn agreement_rules(&self, company_id: &str, agreement_id: &str) -> EngineResult<Vec<WorkRule>> {
        let records = self.read("agreement_rules")?;
        Ok(records
            .rules
            .get(&(company_id.to_string(), agreement_id.to_string()))
            .map(|rules| rules.iter().cloned().map(WorkRule::from).collect())
            .unwrap_or_default())
    }

    fn time_entries(
        &self,
        company_id: &str,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: usize,
    ) -> EngineResult<Vec<TimeEntry>> {
        let records = self.read("time_entries")?;
        let mut entries: Vec<TimeEntry> = records
            .time_entries
            .get(company_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.clock_in >= from && e.clock_in < until)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        entries.sort_by(|a, b| b.clock_in.cmp(&a.clock_in).then_with(|| a.id.cmp(&b.id)));
        entries.truncate(limit);
        Ok(entries)
    }

    fn approved_leave_requests(
        &self,
        company_id: &str,
        employee_id: &str,
        period: &DateRange,
    ) -> EngineResult<Vec<LeaveRequest>> {
        let records = self.read("approved_leave_requests")?;
        Ok(records
            .leave_requests
            .get(&(company_id.to_string(), employee_id.to_string()))
            .map(|requests| {
                requests
                    .iter()
                    .filter(|r| r.is_approved())
                    .filter(|r| {
                        r.start_date <= period.end_date() && r.end_date >= period.start_date()
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn leave_types(&self, company_id: &str) -> EngineResult<Vec<LeaveType>> {
        let records = self.read("leave_types")?;
        Ok(records
            .leave_types
            .get(company_id)
            .cloned()
            .unwrap_or_default())
    }

    fn payment_tiers(
        &self,
        company_id: &str,
        leave_type_id: &str,
    ) -> EngineResult<Vec<PaymentTier>> {
        let records = self.read("payment_tiers")?;
        Ok(records
            .payment_tiers
            .get(&(company_id.to_string(), leave_type_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn upsert_leave_transactions(
        &self,
        transactions: Vec<LeavePayrollTransaction>,
    ) -> EngineResult<usize> {
        let mut records = self.write("upsert_leave_transactions")?;
        let written = transactions.len();

        for mut transaction in transactions {
            let key = transaction.key();
            // A replaced row keeps its original id.
            if let Some(existing) = records.transactions.get(&key) {
                transaction.id = existing.id;
            }
            records.transactions.insert(key, transaction);
        }

        Ok(written)
    }

    fn leave_transactions(
        &self,
        employee_id: &str,
        pay_period_id: &str,
    ) -> EngineResult<Vec<LeavePayrollTransaction>> {
        let records = self.read("leave_transactions")?;
        Ok(records
            .transactions
            .values()
            .filter(|t| t.employee_id == employee_id && t.pay_period_id == pay_period_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeaveStatus, RuleDayType, RuleKind, TransactionType};
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(id: &str, day: u32) -> TimeEntry {
        TimeEntry {
            id: id.to_string(),
            employee_id: "emp_001".to_string(),
            clock_in: Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap(),
            clock_out: None,
            total_hours: Some(Decimal::from(8)),
        }
    }

    fn request(id: &str, start: &str, end: &str, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: id.to_string(),
            employee_id: "emp_001".to_string(),
            leave_type_id: "lt_annual".to_string(),
            start_date: date(start),
            end_date: date(end),
            status,
        }
    }

    fn transaction(leave_request_id: &str, net: i64) -> LeavePayrollTransaction {
        LeavePayrollTransaction {
            id: Uuid::new_v4(),
            company_id: "company_001".to_string(),
            employee_id: "emp_001".to_string(),
            leave_request_id: leave_request_id.to_string(),
            leave_type_id: "lt_annual".to_string(),
            pay_period_id: "pp_2026_01".to_string(),
            payroll_run_id: "run_001".to_string(),
            transaction_type: TransactionType::PaidLeave,
            leave_days: 1,
            leave_hours: Decimal::from(8),
            daily_rate: Decimal::from(net),
            hourly_rate: Decimal::ZERO,
            gross_amount: Decimal::from(net),
            payment_percentage: Decimal::from(100),
            net_amount: Decimal::from(net),
            deduction_amount: Decimal::ZERO,
            description: "Annual Leave (1 days at 100%)".to_string(),
            processed_at: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_agreement_rules_are_converted() {
        let store = InMemoryStore::new();
        store
            .insert_rule(
                "company_001",
                CbaTimeRule {
                    agreement_id: "cba_001".to_string(),
                    rule_name: "Overtime".to_string(),
                    rule_type: RuleKind::Overtime,
                    day_type: RuleDayType::All,
                    value_numeric: Some(Decimal::from(8)),
                    value_text: None,
                    priority: 1,
                    is_active: true,
                },
            )
            .unwrap();

        let rules = store.agreement_rules("company_001", "cba_001").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].threshold_hours, Some(Decimal::from(8)));

        assert!(store.agreement_rules("company_002", "cba_001").unwrap().is_empty());
        assert!(store.agreement_rules("company_001", "cba_999").unwrap().is_empty());
    }

    #[test]
    fn test_time_entries_window_and_limit() {
        let store = InMemoryStore::new();
        for (id, day) in [("a", 5), ("b", 6), ("c", 7), ("d", 20)] {
            store.insert_time_entry("company_001", entry(id, day)).unwrap();
        }

        let from = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2026, 1, 8, 0, 0, 0).unwrap();

        let all = store.time_entries("company_001", from, until, 10).unwrap();
        let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);

        let limited = store.time_entries("company_001", from, until, 2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, "c");
    }

    #[test]
    fn test_approved_leave_requests_filter() {
        let store = InMemoryStore::new();
        store
            .insert_leave_request(
                "company_001",
                request("lr_in", "2026-01-12", "2026-01-13", LeaveStatus::Approved),
            )
            .unwrap();
        store
            .insert_leave_request(
                "company_001",
                request("lr_pending", "2026-01-12", "2026-01-13", LeaveStatus::Pending),
            )
            .unwrap();
        store
            .insert_leave_request(
                "company_001",
                request("lr_out", "2026-02-02", "2026-02-03", LeaveStatus::Approved),
            )
            .unwrap();

        let period = DateRange::new(date("2026-01-01"), date("2026-01-31")).unwrap();
        let requests = store
            .approved_leave_requests("company_001", "emp_001", &period)
            .unwrap();

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, "lr_in");
    }

    #[test]
    fn test_upsert_replaces_by_key_and_keeps_id() {
        let store = InMemoryStore::new();

        let first = transaction("lr_001", 100);
        let original_id = first.id;
        assert_eq!(store.upsert_leave_transactions(vec![first]).unwrap(), 1);

        let second = transaction("lr_001", 150);
        store.upsert_leave_transactions(vec![second]).unwrap();

        let rows = store.leave_transactions("emp_001", "pp_2026_01").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, original_id);
        assert_eq!(rows[0].net_amount, Decimal::from(150));
    }

    #[test]
    fn test_distinct_keys_are_kept() {
        let store = InMemoryStore::new();
        store
            .upsert_leave_transactions(vec![transaction("lr_001", 100), transaction("lr_002", 50)])
            .unwrap();

        assert_eq!(
            store.leave_transactions("emp_001", "pp_2026_01").unwrap().len(),
            2
        );
        assert!(store.leave_transactions("emp_001", "pp_2026_02").unwrap().is_empty());
    }
}
