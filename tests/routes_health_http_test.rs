// ABOUTME: HTTP integration tests for health check routes
// ABOUTME: Liveness, readiness, and request id propagation onto responses and error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use helpers::axum_test::AxumTestRequest;
use helpers::scripted_provider::ScriptedProvider;
use helpers::test_utils::{create_test_resources, router};
use mypt_server::llm::LlmProvider;
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_health_endpoint_success() {
    let resources = create_test_resources(None).await;

    let response = AxumTestRequest::get("/health").send(router(&resources)).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"]["name"], "mypt-server");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ready_degraded_without_provider() {
    let resources = create_test_resources(None).await;

    let response = AxumTestRequest::get("/ready").send(router(&resources)).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");

    let checks = body["checks"].as_array().unwrap();
    let database = checks.iter().find(|c| c["name"] == "database").unwrap();
    assert_eq!(database["status"], "healthy");
    let summary = checks.iter().find(|c| c["name"] == "ai_summary").unwrap();
    assert_eq!(summary["status"], "degraded");
}

#[tokio::test]
async fn test_ready_healthy_with_provider() {
    let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(Vec::new()));
    let resources = create_test_resources(Some(provider)).await;

    let response = AxumTestRequest::get("/ready").send(router(&resources)).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_echoed_on_success() {
    let resources = create_test_resources(None).await;

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "req-test-1")
        .send(router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.header("x-request-id").as_deref(), Some("req-test-1"));
}

#[tokio::test]
async fn test_error_body_carries_caller_request_id() {
    let resources = create_test_resources(None).await;

    let response = AxumTestRequest::get("/api/users/alice/profile")
        .header("x-request-id", "req-missing-profile")
        .send(router(&resources))
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(
        response.header("x-request-id").as_deref(),
        Some("req-missing-profile")
    );
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(body["error"]["request_id"], "req-missing-profile");
}

#[tokio::test]
async fn test_error_body_carries_generated_request_id() {
    let resources = create_test_resources(None).await;

    let response = AxumTestRequest::get("/api/nope").send(router(&resources)).await;
    assert_eq!(response.status(), 404);
    let header = response.header("x-request-id").unwrap();
    assert!(header.starts_with("req_"));
    let body: Value = response.json();
    assert_eq!(body["error"]["request_id"], header.as_str());
}
