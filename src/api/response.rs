//! Response types for the Payroll Rule Evaluation Engine API.
//!
//! This module defines the success bodies, the error response structures and
//! the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{SimulationResult, SimulationSummary};
use crate::service::ProcessOutcome;

/// Response body for the `/time-rules/simulate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateResponse {
    /// Always true; failures use [`ApiError`].
    pub success: bool,
    /// One result per entry that produced an effect.
    pub results: Vec<SimulationResult>,
    /// Run-level counts.
    pub summary: SimulationSummary,
}

/// Response body for the `/leave-deductions/save` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Always true; failures use [`ApiError`].
    pub success: bool,
    /// Rows written.
    pub saved: usize,
}

/// Response body for the `/leave-deductions/process` endpoint.
///
/// `success` is false when the calculation succeeded but the write did not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// True when the result was both calculated and persisted.
    pub success: bool,
    /// The calculation and persistence outcome.
    #[serde(flatten)]
    pub outcome: ProcessOutcome,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a missing field error response.
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::with_details(
            "MISSING_FIELD",
            format!("missing field: {}", field),
            format!("Required field '{}' was not provided in the request", field),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::MissingField { field } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::missing_field(field),
            },
            EngineError::InvalidInput { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_INPUT", message),
            },
            EngineError::InvalidDateRange { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_DATE_RANGE",
                    message,
                    "The start date must be on or before the end date",
                ),
            },
            EngineError::InvalidTimeEntry { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_TIME_ENTRY", message),
            },
            EngineError::InvalidLeaveRequest { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_LEAVE_REQUEST", message),
            },
            EngineError::Persistence { operation, .. } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "PERSISTENCE_ERROR",
                    message,
                    format!("The record store could not complete '{}'", operation),
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
