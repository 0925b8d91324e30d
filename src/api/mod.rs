//! HTTP API module for the Payroll Rule Evaluation Engine.
//!
//! This module provides the REST endpoints for simulating collective
//! agreement time rules and for calculating and saving leave deductions.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalculateLeaveRequest, ProcessLeaveRequest, SaveLeaveRequest, SimulateRequest,
    WorkRuleRequest,
};
pub use response::{ApiError, ProcessResponse, SaveResponse, SimulateResponse};
pub use state::AppState;
