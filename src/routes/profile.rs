// ABOUTME: Profile route handlers: create or replace, fetch, and sign-up with seeded targets
// ABOUTME: Sign-up requests an initial AI summary and stores its calorie and step targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use super::{json_body, validate_user_id};
use crate::errors::AppError;
use crate::models::UserProfile;
use crate::resources::ServerResources;

/// Profile routes
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/:user_id/profile",
                get(Self::handle_get_profile).put(Self::handle_put_profile),
            )
            .route("/api/users/:user_id/signup", post(Self::handle_signup))
            .with_state(resources)
    }

    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Json<UserProfile>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        Ok(Json(resources.database.require_profile(user_id).await?))
    }

    /// Create or replace the profile as given, targets included
    async fn handle_put_profile(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        payload: Result<Json<UserProfile>, JsonRejection>,
    ) -> Result<Json<UserProfile>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let profile = json_body(payload)?;
        resources.database.upsert_profile(user_id, &profile).await?;
        Ok(Json(profile))
    }

    /// Store a new profile whose targets come from an initial summary
    async fn handle_signup(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        payload: Result<Json<UserProfile>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let profile = json_body(payload)?;

        let outcome = resources
            .summary
            .signup(&resources.database, user_id, profile, Utc::now())
            .await?;

        Ok((StatusCode::CREATED, Json(outcome)).into_response())
    }
}
