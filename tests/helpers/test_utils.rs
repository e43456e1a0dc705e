// ABOUTME: Builders for test server resources backed by in-memory SQLite
// ABOUTME: Also provides sample profiles and entries shared across integration tests

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::Router;
use chrono::NaiveDate;
use mypt_server::config::ServerConfig;
use mypt_server::database::Database;
use mypt_server::intelligence::GoalAdjustmentPolicy;
use mypt_server::llm::LlmProvider;
use mypt_server::models::{DailyEntry, Sex, UserProfile};
use mypt_server::resources::ServerResources;
use mypt_server::server::build_router;
use mypt_server::services::SummaryService;
use std::sync::Arc;

/// Configuration pointing at a private in-memory database
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_owned(),
        ..ServerConfig::default()
    }
}

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}

/// Resources with the default goal policy
pub async fn create_test_resources(provider: Option<Arc<dyn LlmProvider>>) -> Arc<ServerResources> {
    create_test_resources_with_policy(provider, GoalAdjustmentPolicy::default()).await
}

/// Resources with an explicit goal policy
pub async fn create_test_resources_with_policy(
    provider: Option<Arc<dyn LlmProvider>>,
    policy: GoalAdjustmentPolicy,
) -> Arc<ServerResources> {
    let mut config = test_config();
    config.goal_policy = policy;
    let summary = SummaryService::new(provider, config.llm.max_tokens, policy);
    Arc::new(ServerResources::new(
        create_test_database().await,
        summary,
        config,
    ))
}

/// Full application router
pub fn router(resources: &Arc<ServerResources>) -> Router {
    build_router(resources)
}

/// Calendar date shorthand
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// 175 cm, 85 kg start, 70 kg goal, no stored targets
pub fn sample_profile() -> UserProfile {
    UserProfile {
        height: 175.0,
        sex: Sex::Female,
        weight: 85.0,
        activity_level: 3,
        goal_weight: 70.0,
        target_date: date(2030, 12, 31),
        target_calories: None,
        target_steps: None,
    }
}

/// Entry with neutral mood and energy
pub fn entry(on: NaiveDate, calories: u32, steps: u32, weight: f64) -> DailyEntry {
    DailyEntry {
        date: on,
        mood: 3,
        energy: 3,
        calories,
        steps,
        weight,
    }
}
