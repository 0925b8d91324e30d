//! Time-rule simulation service.

use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::calculation::{simulate, to_local};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, SimulationOutcome, WorkRule};
use crate::store::RecordStore;

use super::require;

/// Where the rules of a simulation come from.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSource {
    /// The stored rules of a collective agreement.
    Agreement(String),
    /// Rules supplied with the request, for what-if runs.
    AdHoc(Vec<WorkRule>),
}

/// The company and date window a simulation runs over.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationScope {
    /// The company whose time entries are sampled.
    pub company_id: String,
    /// The rules to evaluate.
    pub rules: RuleSource,
    /// First local date to sample; defaults to the lookback before `date_to`.
    pub date_from: Option<NaiveDate>,
    /// Last local date to sample; defaults to today in the company timezone.
    pub date_to: Option<NaiveDate>,
    /// Maximum number of entries to sample.
    pub sample_size: Option<usize>,
}

/// Runs a time-rule simulation for a company.
///
/// `now` anchors the default date window.
///
/// # Errors
///
/// - [`EngineError::MissingField`] for a blank company or agreement id.
/// - [`EngineError::InvalidInput`] for a zero sample size.
/// - [`EngineError::InvalidDateRange`] when `date_from` is after `date_to`,
///   or when the window reaches past the representable calendar.
/// - [`EngineError::Persistence`] when the store cannot be read.
pub fn run_simulation(
    store: &dyn RecordStore,
    config: &ConfigLoader,
    scope: &SimulationScope,
    now: DateTime<Utc>,
) -> EngineResult<SimulationOutcome> {
    require("company_id", &scope.company_id)?;
    if let RuleSource::Agreement(agreement_id) = &scope.rules {
        require("agreement_id", agreement_id)?;
    }

    let sample_size = scope
        .sample_size
        .unwrap_or_else(|| config.default_sample_size());
    if sample_size == 0 {
        return Err(EngineError::InvalidInput {
            field: "sample_size".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    let context = config.simulation_context(&scope.company_id);
    let today = to_local(now, context.timezone).date();
    let date_to = scope.date_to.unwrap_or(today);
    let date_from = match scope.date_from {
        Some(date_from) => date_from,
        None => date_to
            .checked_sub_signed(Duration::days(i64::from(config.default_lookback_days())))
            .ok_or(EngineError::InvalidDateRange {
                start: NaiveDate::MIN,
                end: date_to,
            })?,
    };
    let window = DateRange::new(date_from, date_to)?;

    let rules = match &scope.rules {
        RuleSource::Agreement(agreement_id) => {
            store.agreement_rules(&scope.company_id, agreement_id)?
        }
        RuleSource::AdHoc(rules) => rules.clone(),
    };

    if rules.is_empty() {
        info!(company_id = %scope.company_id, "No rules to simulate");
        return Ok(simulate(&[], &[], &context, Some(window)));
    }

    let from = local_day_start(window.start_date(), context.timezone)?;
    let day_after = window
        .end_date()
        .checked_add_days(Days::new(1))
        .ok_or(EngineError::InvalidDateRange {
            start: window.start_date(),
            end: window.end_date(),
        })?;
    let until = local_day_start(day_after, context.timezone)?;
    let entries = store.time_entries(&scope.company_id, from, until, sample_size)?;

    info!(
        company_id = %scope.company_id,
        date_range = %window,
        rules = rules.len(),
        entries = entries.len(),
        "Running time-rule simulation"
    );

    Ok(simulate(&rules, &entries, &context, Some(window)))
}

/// The UTC instant at which `date` begins in `timezone`.
///
/// Where a DST transition skips local midnight, the first valid hour is used.
fn local_day_start(date: NaiveDate, timezone: Tz) -> EngineResult<DateTime<Utc>> {
    (0..3)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|local| timezone.from_local_datetime(&local).earliest())
        .map(|start| start.with_timezone(&Utc))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("No valid start of day for {} in {}", date, timezone),
        })
}
