// ABOUTME: Liveness and readiness endpoints for load balancers and operators
// ABOUTME: Readiness pings the database and reports whether AI summaries use a live model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check endpoints

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::constants::service_names;
use crate::resources::ServerResources;

/// Overall health status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthStatus,
    /// Service information
    pub service: ServiceInfo,
    /// Individual component checks
    pub checks: Vec<ComponentHealth>,
    /// Response timestamp (RFC 3339)
    pub timestamp: String,
}

/// Service information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Environment (development, production, testing)
    pub environment: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
}

/// Individual component health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Status description
    pub message: String,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    /// Liveness: the process is serving requests
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Json<HealthResponse> {
        let checks = vec![ComponentHealth {
            name: "service".into(),
            status: HealthStatus::Healthy,
            message: "Service is running".into(),
            duration_ms: 0,
        }];
        Json(Self::response(&resources, HealthStatus::Healthy, checks))
    }

    /// Readiness: storage reachable; a missing model only degrades the service
    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Response {
        let checks = vec![
            Self::check_database(&resources).await,
            Self::check_summary_provider(&resources),
        ];
        let status = Self::overall_status(&checks);
        let code = if status == HealthStatus::Unhealthy {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::OK
        };

        (code, Json(Self::response(&resources, status, checks))).into_response()
    }

    async fn check_database(resources: &ServerResources) -> ComponentHealth {
        let start = Instant::now();
        let (status, message) = match resources.database.ping().await {
            Ok(()) => (HealthStatus::Healthy, "Database connection OK".to_owned()),
            Err(e) => {
                error!("Database health check failed: {e}");
                (HealthStatus::Unhealthy, format!("Database error: {e}"))
            }
        };

        ComponentHealth {
            name: "database".into(),
            status,
            message,
            duration_ms: elapsed_ms(start),
        }
    }

    fn check_summary_provider(resources: &ServerResources) -> ComponentHealth {
        let (status, message) = if resources.summary.has_provider() {
            (
                HealthStatus::Healthy,
                format!("Using {} ({})", resources.config.llm.provider, resources.config.llm.model),
            )
        } else {
            (
                HealthStatus::Degraded,
                "No text-generation provider configured; summaries use the heuristic".to_owned(),
            )
        };

        ComponentHealth {
            name: "ai_summary".into(),
            status,
            message,
            duration_ms: 0,
        }
    }

    fn overall_status(checks: &[ComponentHealth]) -> HealthStatus {
        if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    fn response(
        resources: &ServerResources,
        status: HealthStatus,
        checks: Vec<ComponentHealth>,
    ) -> HealthResponse {
        HealthResponse {
            status,
            service: ServiceInfo {
                name: service_names::MYPT_SERVER.into(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                environment: resources.config.environment.to_string(),
                uptime_seconds: resources.started_at.elapsed().as_secs(),
            },
            checks,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
