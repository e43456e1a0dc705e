// ABOUTME: Dashboard route handlers: progress overview, month calendar, week completeness
// ABOUTME: All figures are computed on request from the stored profile and entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Dashboard routes

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{parse_date, validate_user_id};
use crate::errors::AppError;
use crate::intelligence::{
    daily_targets, goal_progress, is_complete_week, latest_weight, month_calendar,
    progress_status, CalendarDay, GoalProgress, ProgressStatus,
};
use crate::models::{DailyTargets, UserProfile};
use crate::resources::ServerResources;

/// Everything the dashboard page shows
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Stored profile
    pub profile: UserProfile,
    /// Most recent logged weight, or the start weight
    pub latest_weight: f64,
    /// Goal progress, clamped to 0..=100
    pub goal_progress: GoalProgress,
    /// Active daily targets
    pub targets: DailyTargets,
    /// Schedule tracking
    pub progress_status: ProgressStatus,
    /// Number of logged days
    pub entry_count: usize,
}

/// Month selector; defaults to the current month
#[derive(Debug, Default, Deserialize)]
struct CalendarQuery {
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    month: Option<u32>,
}

/// Month view
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    /// Year shown
    pub year: i32,
    /// Month shown (1-12)
    pub month: u32,
    /// Every day of the month
    pub days: Vec<CalendarDay>,
}

/// Week completeness
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekCompleteResponse {
    /// First day of the week checked
    pub week_start: NaiveDate,
    /// Whether all seven days have entries
    pub complete: bool,
}

/// Dashboard routes
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create all dashboard routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users/:user_id/dashboard", get(Self::handle_dashboard))
            .route("/api/users/:user_id/calendar", get(Self::handle_calendar))
            .route(
                "/api/users/:user_id/weeks/:week_start/complete",
                get(Self::handle_week_complete),
            )
            .with_state(resources)
    }

    async fn handle_dashboard(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Json<DashboardResponse>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let profile = resources.database.require_profile(user_id).await?;
        let entries = resources.database.get_entries(user_id).await?;

        Ok(Json(DashboardResponse {
            latest_weight: latest_weight(&profile, &entries),
            goal_progress: goal_progress(&profile, &entries),
            targets: daily_targets(&profile),
            progress_status: progress_status(&profile, &entries, Utc::now()),
            entry_count: entries.len(),
            profile,
        }))
    }

    /// Month calendar; every status is `none` for users without a profile
    async fn handle_calendar(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        Query(query): Query<CalendarQuery>,
    ) -> Result<Json<CalendarResponse>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let today = Utc::now().date_naive();
        let year = query.year.unwrap_or_else(|| today.year());
        let month = query.month.unwrap_or_else(|| today.month());

        let profile = resources.database.get_profile(user_id).await?;
        let entries = resources.database.get_entries(user_id).await?;
        let days = month_calendar(year, month, profile.as_ref(), &entries, today)?;

        Ok(Json(CalendarResponse { year, month, days }))
    }

    async fn handle_week_complete(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, week_start)): Path<(String, String)>,
    ) -> Result<Json<WeekCompleteResponse>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let week_start = parse_date(&week_start)?;
        let entries = resources.database.get_entries(user_id).await?;

        Ok(Json(WeekCompleteResponse {
            week_start,
            complete: is_complete_week(&entries, week_start),
        }))
    }
}
