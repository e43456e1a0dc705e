// ABOUTME: HTTP integration tests for dashboard, month calendar and week completeness routes
// ABOUTME: Checks adherence colours against targets and goal progress figures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use helpers::axum_test::AxumTestRequest;
use helpers::test_utils::{create_test_resources, date, entry, router, sample_profile};
use mypt_server::resources::ServerResources;
use serde_json::Value;
use std::sync::Arc;

async fn seed_june(resources: &Arc<ServerResources>, with_profile: bool) {
    if with_profile {
        let mut profile = sample_profile();
        profile.target_date = date(2025, 6, 30);
        resources.database.upsert_profile("alice", &profile).await.unwrap();
    }
    for (day, calories, steps) in [(2, 2500, 8000), (3, 2000, 6000), (4, 2000, 8000)] {
        resources
            .database
            .upsert_entry("alice", &entry(date(2025, 6, day), calories, steps, 80.0))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_dashboard_progress() {
    let resources = create_test_resources(None).await;
    seed_june(&resources, true).await;

    let response = AxumTestRequest::get("/api/users/alice/dashboard")
        .send(router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();

    assert_eq!(body["latestWeight"], 80.0);
    let progress = body["goalProgress"]["progress"].as_f64().unwrap();
    assert!((progress - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(body["goalProgress"]["remaining"], 10.0);
    assert_eq!(body["targets"]["calories"], 2000);
    assert_eq!(body["targets"]["steps"], 8000);
    assert_eq!(body["progressStatus"]["weightLost"], 5.0);
    assert_eq!(body["entryCount"], 3);
}

#[tokio::test]
async fn test_dashboard_requires_profile() {
    let resources = create_test_resources(None).await;

    let response = AxumTestRequest::get("/api/users/alice/dashboard")
        .send(router(&resources))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_calendar_statuses() {
    let resources = create_test_resources(None).await;
    seed_june(&resources, true).await;

    let body: Value = AxumTestRequest::get("/api/users/alice/calendar?year=2025&month=6")
        .send(router(&resources))
        .await
        .json();

    assert_eq!(body["year"], 2025);
    assert_eq!(body["month"], 6);
    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 30);

    assert_eq!(days[0]["status"], "none");
    assert!(days[0].get("entry").is_none());
    assert_eq!(days[1]["status"], "red");
    assert_eq!(days[2]["status"], "orange");
    assert_eq!(days[3]["status"], "green");
    assert_eq!(days[3]["entry"]["calories"], 2000);
    assert_eq!(days[29]["isTargetDate"], true);
    assert_eq!(days[28]["isTargetDate"], false);
}

#[tokio::test]
async fn test_calendar_without_profile_has_no_status() {
    let resources = create_test_resources(None).await;
    seed_june(&resources, false).await;

    let body: Value = AxumTestRequest::get("/api/users/alice/calendar?year=2025&month=6")
        .send(router(&resources))
        .await
        .json();

    let days = body["days"].as_array().unwrap();
    assert!(days.iter().all(|day| day["status"] == "none"));
    assert_eq!(days[1]["entry"]["calories"], 2500);
}

#[tokio::test]
async fn test_calendar_rejects_invalid_month() {
    let resources = create_test_resources(None).await;

    let response = AxumTestRequest::get("/api/users/alice/calendar?year=2025&month=13")
        .send(router(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_calendar_defaults_to_current_month() {
    let resources = create_test_resources(None).await;

    let body: Value = AxumTestRequest::get("/api/users/alice/calendar")
        .send(router(&resources))
        .await
        .json();
    let days = body["days"].as_array().unwrap();
    assert!(days.len() >= 28);
    assert_eq!(days.iter().filter(|day| day["isToday"] == true).count(), 1);
}

#[tokio::test]
async fn test_week_completeness() {
    let resources = create_test_resources(None).await;
    for day in 2..=8 {
        resources
            .database
            .upsert_entry("alice", &entry(date(2025, 6, day), 2000, 8000, 80.0))
            .await
            .unwrap();
    }

    let complete: Value = AxumTestRequest::get("/api/users/alice/weeks/2025-06-02/complete")
        .send(router(&resources))
        .await
        .json();
    assert_eq!(complete["complete"], true);
    assert_eq!(complete["weekStart"], "2025-06-02");

    let partial: Value = AxumTestRequest::get("/api/users/alice/weeks/2025-06-03/complete")
        .send(router(&resources))
        .await
        .json();
    assert_eq!(partial["complete"], false);
}
