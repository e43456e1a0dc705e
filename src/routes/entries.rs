// ABOUTME: Daily entry route handlers: list, fetch, save, form template, quick weight log
// ABOUTME: Saving an entry for a date that already has one overwrites it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Daily entry routes
//!
//! Dates in paths are `YYYY-MM-DD`. An entry body may repeat its date; when it
//! does, it must match the path.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{json_body, parse_date, validate_user_id};
use crate::errors::{AppError, AppResult};
use crate::intelligence::{entry_template, weight_log_entry};
use crate::models::{DailyEntry, EntryCollection};
use crate::resources::ServerResources;

/// Optional date bounds for listing entries (inclusive)
#[derive(Debug, Default, Deserialize)]
struct EntryRangeQuery {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

/// Body of `PUT /api/users/{user_id}/entries/{date}`
#[derive(Debug, Deserialize)]
pub struct SaveEntryRequest {
    /// Must equal the path date when present
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Mood score from 1 to 5
    pub mood: u8,
    /// Energy score from 1 to 5
    pub energy: u8,
    /// Calories consumed (kcal)
    pub calories: u32,
    /// Steps walked
    pub steps: u32,
    /// Body weight in kilograms
    pub weight: f64,
}

impl SaveEntryRequest {
    fn into_entry(self, date: NaiveDate) -> AppResult<DailyEntry> {
        if let Some(body_date) = self.date {
            if body_date != date {
                return Err(AppError::invalid_input(format!(
                    "Entry date {body_date} does not match path date {date}"
                )));
            }
        }
        Ok(DailyEntry {
            date,
            mood: self.mood,
            energy: self.energy,
            calories: self.calories,
            steps: self.steps,
            weight: self.weight,
        })
    }
}

/// Body of `PUT /api/users/{user_id}/weight/{date}`
#[derive(Debug, Deserialize)]
pub struct LogWeightRequest {
    /// Body weight in kilograms
    pub weight: f64,
}

/// Stored entry and whether it replaced an earlier one
#[derive(Debug, Serialize)]
pub struct SaveEntryResponse {
    /// Entry as stored
    pub entry: DailyEntry,
    /// Whether an entry already existed for the date
    pub overwritten: bool,
}

/// Daily entry routes
pub struct EntryRoutes;

impl EntryRoutes {
    /// Create all entry routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users/:user_id/entries", get(Self::handle_list_entries))
            .route(
                "/api/users/:user_id/entries/:date",
                get(Self::handle_get_entry).put(Self::handle_put_entry),
            )
            .route(
                "/api/users/:user_id/entries/:date/template",
                get(Self::handle_entry_template),
            )
            .route("/api/users/:user_id/weight/:date", put(Self::handle_log_weight))
            .with_state(resources)
    }

    /// Date-keyed entry map, optionally bounded by `from`/`to`
    async fn handle_list_entries(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        Query(range): Query<EntryRangeQuery>,
    ) -> Result<Json<EntryCollection>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let from = range.from.as_deref().map(parse_date).transpose()?;
        let to = range.to.as_deref().map(parse_date).transpose()?;

        let entries = match (from, to) {
            (Some(start), Some(end)) => {
                resources
                    .database
                    .get_entries_in_range(user_id, start, end)
                    .await?
            }
            (from, to) => resources
                .database
                .get_entries(user_id)
                .await?
                .iter()
                .filter(|entry| !from.is_some_and(|start| entry.date < start))
                .filter(|entry| !to.is_some_and(|end| entry.date > end))
                .cloned()
                .collect(),
        };
        Ok(Json(entries))
    }

    async fn handle_get_entry(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, date)): Path<(String, String)>,
    ) -> Result<Json<DailyEntry>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let date = parse_date(&date)?;
        resources
            .database
            .get_entry(user_id, date)
            .await?
            .map(Json)
            .ok_or_else(|| AppError::not_found(format!("Entry for {date}")))
    }

    async fn handle_put_entry(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, date)): Path<(String, String)>,
        payload: Result<Json<SaveEntryRequest>, JsonRejection>,
    ) -> Result<Json<SaveEntryResponse>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let entry = json_body(payload)?.into_entry(parse_date(&date)?)?;
        let overwritten = resources.database.upsert_entry(user_id, &entry).await?;
        Ok(Json(SaveEntryResponse { entry, overwritten }))
    }

    /// Pre-filled values for the daily log form
    async fn handle_entry_template(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, date)): Path<(String, String)>,
    ) -> Result<Json<DailyEntry>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let date = parse_date(&date)?;
        let profile = resources.database.get_profile(user_id).await?;
        let entries = resources.database.get_entries(user_id).await?;
        Ok(Json(entry_template(date, profile.as_ref(), &entries)))
    }

    /// Set the weight for a date, keeping the rest of an existing entry
    async fn handle_log_weight(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, date)): Path<(String, String)>,
        payload: Result<Json<LogWeightRequest>, JsonRejection>,
    ) -> Result<Json<SaveEntryResponse>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let date = parse_date(&date)?;
        let LogWeightRequest { weight } = json_body(payload)?;

        let existing: EntryCollection = resources
            .database
            .get_entry(user_id, date)
            .await?
            .into_iter()
            .collect();
        let entry = weight_log_entry(date, weight, &existing);
        let overwritten = resources.database.upsert_entry(user_id, &entry).await?;
        Ok(Json(SaveEntryResponse { entry, overwritten }))
    }
}
