//! HTTP request handlers for the Payroll Rule Evaluation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::service::{
    LeaveCalculationScope, SimulationScope, TransactionBatch, calculate_leave_deductions,
    process_leave_deductions, run_simulation, save_leave_payroll_transactions,
};

use super::request::{CalculateLeaveRequest, ProcessLeaveRequest, SaveLeaveRequest, SimulateRequest};
use super::response::{
    ApiError, ApiErrorResponse, ProcessResponse, SaveResponse, SimulateResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/time-rules/simulate", post(simulate_handler))
        .route("/leave-deductions/calculate", post(calculate_leave_handler))
        .route("/leave-deductions/save", post(save_leave_handler))
        .route("/leave-deductions/process", post(process_leave_handler))
        .with_state(state)
}

/// Handler for POST /time-rules/simulate.
///
/// Evaluates an agreement's stored rules, or rules supplied inline, against
/// a sample of the company's recent time entries.
async fn simulate_handler(
    State(state): State<AppState>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing simulation request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let scope = match SimulationScope::try_from(request) {
        Ok(scope) => scope,
        Err(err) => return engine_error(correlation_id, "Invalid simulation request", err),
    };

    let start_time = Instant::now();
    match run_simulation(state.store(), state.config(), &scope, Utc::now()) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                company_id = %scope.company_id,
                total_entries = outcome.summary.total_entries,
                entries_with_rules = outcome.summary.entries_with_rules,
                violations = outcome.summary.violations,
                duration_us = start_time.elapsed().as_micros(),
                "Simulation completed successfully"
            );
            json_response(
                StatusCode::OK,
                SimulateResponse {
                    success: true,
                    results: outcome.results,
                    summary: outcome.summary,
                },
            )
        }
        Err(err) => engine_error(correlation_id, "Simulation failed", err),
    }
}

/// Handler for POST /leave-deductions/calculate.
async fn calculate_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculateLeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave calculation request");

    let scope: LeaveCalculationScope = match parse_body(correlation_id, payload) {
        Ok(request) => request.into(),
        Err(response) => return response,
    };

    match calculate_leave_deductions(state.store(), state.config(), &scope) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                company_id = %scope.company_id,
                employee_id = %scope.employee_id,
                pay_period_start = %scope.pay_period_start,
                pay_period_end = %scope.pay_period_end,
                items = result.transactions.len(),
                "Leave calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error(correlation_id, "Leave calculation failed", err),
    }
}

/// Handler for POST /leave-deductions/save.
///
/// Persists items from an earlier calculation. Saving the same items again
/// replaces the stored rows.
async fn save_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveLeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave save request");

    let batch: TransactionBatch = match parse_body(correlation_id, payload) {
        Ok(request) => request.into(),
        Err(response) => return response,
    };

    match save_leave_payroll_transactions(state.store(), state.config(), &batch, Utc::now()) {
        Ok(saved) => {
            info!(
                correlation_id = %correlation_id,
                company_id = %batch.company_id,
                employee_id = %batch.employee_id,
                pay_period_id = %batch.pay_period_id,
                saved,
                "Leave transactions saved"
            );
            json_response(
                StatusCode::OK,
                SaveResponse {
                    success: true,
                    saved,
                },
            )
        }
        Err(err) => engine_error(correlation_id, "Saving leave transactions failed", err),
    }
}

/// Handler for POST /leave-deductions/process.
///
/// A failed write still returns 200 with the calculated result and
/// `persisted: false`.
async fn process_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProcessLeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave process request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let scope: LeaveCalculationScope = request.calculation.into();

    match process_leave_deductions(
        state.store(),
        state.config(),
        &scope,
        &request.pay_period_id,
        &request.payroll_run_id,
        Utc::now(),
    ) {
        Ok(outcome) => {
            if outcome.persisted {
                info!(
                    correlation_id = %correlation_id,
                    company_id = %scope.company_id,
                    employee_id = %scope.employee_id,
                    pay_period_id = %request.pay_period_id,
                    saved = outcome.saved,
                    "Leave deductions processed"
                );
            } else {
                warn!(
                    correlation_id = %correlation_id,
                    company_id = %scope.company_id,
                    employee_id = %scope.employee_id,
                    pay_period_id = %request.pay_period_id,
                    "Leave deductions calculated but not persisted"
                );
            }
            json_response(
                StatusCode::OK,
                ProcessResponse {
                    success: outcome.persisted,
                    outcome,
                },
            )
        }
        Err(err) => engine_error(correlation_id, "Leave processing failed", err),
    }
}

/// Unwraps a JSON body, turning extractor rejections into 400 responses.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(json_response(StatusCode::BAD_REQUEST, error))
        }
    }
}

fn engine_error(correlation_id: Uuid, context: &str, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "{}", context
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{
        LeaveDeductionResult, LeaveRequest, LeaveStatus, LeaveType, PaymentMethod,
    };
    use crate::store::InMemoryStore;
    use axum::{body::Body, http::Request};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        let store = InMemoryStore::new();
        store
            .insert_leave_type(
                "company_001",
                LeaveType {
                    id: "lt_unpaid".to_string(),
                    name: "Unpaid Leave".to_string(),
                    is_paid: Some(false),
                    payment_method: Some(PaymentMethod::Unpaid),
                },
            )
            .unwrap();
        store
            .insert_leave_request(
                "company_001",
                LeaveRequest {
                    id: "lr_001".to_string(),
                    employee_id: "emp_001".to_string(),
                    leave_type_id: "lt_unpaid".to_string(),
                    start_date: make_date("2026-01-05"),
                    end_date: make_date("2026-01-06"),
                    status: LeaveStatus::Approved,
                },
            )
            .unwrap();
        AppState::new(config, Arc::new(store))
    }

    async fn post(router: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_calculate_returns_200() {
        let router = create_router(create_test_state());
        let body = r#"{
            "company_id": "company_001",
            "employee_id": "emp_001",
            "pay_period_start": "2026-01-01",
            "pay_period_end": "2026-01-31",
            "daily_rate": "200"
        }"#;

        let (status, body) = post(router, "/leave-deductions/calculate", body).await;
        assert_eq!(status, StatusCode::OK);

        let result: LeaveDeductionResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.total_unpaid_days, dec("2"));
        assert_eq!(result.total_unpaid_deduction, dec("400"));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let (status, body) = post(router, "/time-rules/simulate", "{invalid json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_daily_rate_returns_400() {
        let router = create_router(create_test_state());
        let body = r#"{
            "company_id": "company_001",
            "employee_id": "emp_001",
            "pay_period_start": "2026-01-01",
            "pay_period_end": "2026-01-31"
        }"#;

        let (status, body) = post(router, "/leave-deductions/calculate", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(
            error.message.contains("daily_rate"),
            "Expected error message to name the field, got: {}",
            error.message
        );
    }

    #[tokio::test]
    async fn test_blank_employee_returns_missing_field() {
        let router = create_router(create_test_state());
        let body = r#"{
            "company_id": "company_001",
            "pay_period_start": "2026-01-01",
            "pay_period_end": "2026-01-31",
            "daily_rate": "200"
        }"#;

        let (status, body) = post(router, "/leave-deductions/calculate", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_FIELD");
        assert!(error.message.contains("employee_id"));
    }

    #[tokio::test]
    async fn test_simulate_without_rule_source_returns_400() {
        let router = create_router(create_test_state());

        let (status, body) =
            post(router, "/time-rules/simulate", r#"{"company_id": "company_001"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_simulate_unknown_agreement_is_empty() {
        let router = create_router(create_test_state());
        let body = r#"{
            "company_id": "company_001",
            "agreement_id": "cba_unknown",
            "date_from": "2026-01-01",
            "date_to": "2026-01-31"
        }"#;

        let (status, body) = post(router, "/time-rules/simulate", body).await;
        assert_eq!(status, StatusCode::OK);

        let response: SimulateResponse = serde_json::from_slice(&body).unwrap();
        assert!(response.success);
        assert!(response.results.is_empty());
        assert_eq!(response.summary.total_entries, 0);
    }

    #[tokio::test]
    async fn test_process_reports_saved_rows() {
        let router = create_router(create_test_state());
        let body = r#"{
            "company_id": "company_001",
            "employee_id": "emp_001",
            "pay_period_start": "2026-01-01",
            "pay_period_end": "2026-01-31",
            "daily_rate": "200",
            "pay_period_id": "pp_2026_01",
            "payroll_run_id": "run_001"
        }"#;

        let (status, body) = post(router, "/leave-deductions/process", body).await;
        assert_eq!(status, StatusCode::OK);

        let response: ProcessResponse = serde_json::from_slice(&body).unwrap();
        assert!(response.success);
        assert!(response.outcome.persisted);
        assert_eq!(response.outcome.saved, 1);
    }
}
