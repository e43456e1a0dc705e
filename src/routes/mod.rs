// ABOUTME: HTTP route registration and shared request helpers
// ABOUTME: Merges every route group and validates path parameters and JSON bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Routes
//!
//! One module per resource, each exposing `routes(resources)` the way the
//! server assembles them:
//!
//! - `health`: liveness and readiness probes
//! - `summary`: the stateless summary contract and per-user summaries
//! - `profile`: profile storage and sign-up
//! - `entries`: daily entries, templates and quick weight logging
//! - `dashboard`: progress, month calendar and week completeness
//! - `state`: export and import of the persisted records

/// Daily entry routes
pub mod entries;
/// Dashboard, calendar and week routes
pub mod dashboard;
/// Health check routes
pub mod health;
/// Profile and sign-up routes
pub mod profile;
/// Persisted state export and import routes
pub mod state;
/// AI summary routes
pub mod summary;

pub use dashboard::DashboardRoutes;
pub use entries::EntryRoutes;
pub use health::HealthRoutes;
pub use profile::ProfileRoutes;
pub use state::StateRoutes;
pub use summary::SummaryRoutes;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Json, Router};
use chrono::NaiveDate;
use tracing::Span;

use crate::errors::{AppError, AppResult};
use crate::models::DATE_FORMAT;
use crate::resources::ServerResources;

/// Longest accepted user id
const MAX_USER_ID_LEN: usize = 64;

/// Every route group, sharing one set of resources
pub fn api_routes(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(SummaryRoutes::routes(Arc::clone(resources)))
        .merge(ProfileRoutes::routes(Arc::clone(resources)))
        .merge(EntryRoutes::routes(Arc::clone(resources)))
        .merge(DashboardRoutes::routes(Arc::clone(resources)))
        .merge(StateRoutes::routes(Arc::clone(resources)))
}

/// Check a path user id and record it on the request span
///
/// # Errors
///
/// Returns `InvalidInput` for empty or overlong ids, or ids with characters
/// other than ASCII letters, digits, `-`, `_` and `.`
pub fn validate_user_id(user_id: &str) -> AppResult<&str> {
    let valid = !user_id.is_empty()
        && user_id.len() <= MAX_USER_ID_LEN
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if !valid {
        return Err(AppError::invalid_input(format!("Invalid user id '{user_id}'")));
    }

    Span::current().record("user.id", user_id);
    Ok(user_id)
}

/// Parse a `YYYY-MM-DD` path segment
///
/// # Errors
///
/// Returns `InvalidInput` if the value is not a calendar date
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| AppError::invalid_input(format!("Invalid date '{value}', expected YYYY-MM-DD")))
}

/// Unwrap a JSON body, turning extractor rejections into error-shaped JSON
///
/// # Errors
///
/// Returns `InvalidInput` carrying the rejection message
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}
