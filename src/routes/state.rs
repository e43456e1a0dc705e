// ABOUTME: Export and import of a user's persisted records as one JSON document
// ABOUTME: The document holds the healthAssistant_profile and healthAssistant_entries records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use super::{json_body, validate_user_id};
use crate::database::PersistedState;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Persisted state routes
pub struct StateRoutes;

impl StateRoutes {
    /// Create the state routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/:user_id/state",
                get(Self::handle_export).put(Self::handle_import),
            )
            .with_state(resources)
    }

    async fn handle_export(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Json<PersistedState>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        Ok(Json(resources.database.export_state(user_id).await?))
    }

    /// Replace both records; returns what is now stored
    async fn handle_import(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        payload: Result<Json<PersistedState>, JsonRejection>,
    ) -> Result<Json<PersistedState>, AppError> {
        let user_id = validate_user_id(&user_id)?;
        let state = json_body(payload)?;
        resources.database.import_state(user_id, &state).await?;
        Ok(Json(resources.database.export_state(user_id).await?))
    }
}
