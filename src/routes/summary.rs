// ABOUTME: AI summary route handlers: the stateless contract and per-user summaries
// ABOUTME: Per-user requests run through the summary state machine; acceptance updates the profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! AI summary routes
//!
//! `POST /api/get-summary` accepts the full request body and answers with the
//! bare result, exactly as the web client expects. The per-user routes build
//! the request from stored data and additionally report where the result
//! came from.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{json_body, validate_user_id};
use crate::errors::AppError;
use crate::models::{AiSummaryResult, DailyTargets, SummaryRequest, UserProfile};
use crate::resources::ServerResources;
use crate::services::summary::record_anonymous_outcome;
use crate::services::{SummaryOutcome, SummaryState};

/// Body of `POST /api/users/{user_id}/summary/accept`
#[derive(Debug, Default, Deserialize)]
pub struct AcceptSummaryRequest {
    /// Result to accept; the last successful summary when absent
    #[serde(default)]
    pub result: Option<AiSummaryResult>,
}

/// Profile after accepting a summary
#[derive(Debug, Serialize)]
pub struct AcceptSummaryResponse {
    /// Updated profile
    pub profile: UserProfile,
}

/// Summary routes
pub struct SummaryRoutes;

impl SummaryRoutes {
    /// Create all summary routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/get-summary", post(Self::handle_get_summary))
            .route("/api/users/:user_id/summary", post(Self::handle_user_summary))
            .route("/api/users/:user_id/summary/state", get(Self::handle_summary_state))
            .route("/api/users/:user_id/summary/accept", post(Self::handle_accept))
            .with_state(resources)
    }

    /// Stateless summary: body in, bare result out
    async fn handle_get_summary(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<SummaryRequest>, JsonRejection>,
    ) -> Result<Json<AiSummaryResult>, AppError> {
        let request = json_body(payload)?;
        let started = Instant::now();

        let outcome = resources
            .summary
            .generate(&request, DailyTargets::default(), Utc::now())
            .await;
        record_anonymous_outcome(&outcome, started);

        Ok(Json(outcome.result))
    }

    /// Summarize the user's current week from stored data
    async fn handle_user_summary(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Json<SummaryOutcome>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let outcome = resources
            .summary
            .summarize_user(&resources.database, user_id, Utc::now())
            .await?;
        Ok(Json(outcome))
    }

    /// Where the user's most recent summary request stands
    async fn handle_summary_state(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Json<SummaryState>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        Ok(Json(resources.summary.sessions().state(user_id)))
    }

    /// Write a summary's goal weight and targets into the profile
    ///
    /// An empty body accepts the last successful summary.
    async fn handle_accept(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        body: Bytes,
    ) -> Result<Json<AcceptSummaryResponse>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let request = if body.iter().all(u8::is_ascii_whitespace) {
            AcceptSummaryRequest::default()
        } else {
            serde_json::from_slice(&body)
                .map_err(|e| AppError::invalid_input(format!("Invalid accept request body: {e}")))?
        };

        let profile = resources
            .summary
            .accept(&resources.database, user_id, request.result)
            .await?;
        Ok(Json(AcceptSummaryResponse { profile }))
    }
}
