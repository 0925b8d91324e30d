//! Payroll Rule Evaluation Engine
//!
//! This crate evaluates collective-agreement time rules against clocked time
//! entries and splits approved leave within a pay period into paid and unpaid
//! portions. Both calculators are pure functions of their inputs; the
//! [`service`] layer loads records from a [`store::RecordStore`] and the
//! [`api`] module exposes the operations over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
