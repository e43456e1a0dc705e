// ABOUTME: Centralized resource container shared by every route handler
// ABOUTME: Holds the database, the AI summary client and the loaded configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Built once at startup and handed to the router as `Arc<ServerResources>`.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::llm::{ChatProvider, LlmProvider};
use crate::services::SummaryService;

/// Shared server state
#[derive(Clone)]
pub struct ServerResources {
    /// Profile and entry store
    pub database: Arc<Database>,
    /// AI summary client and per-user request state
    pub summary: Arc<SummaryService>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// When the server started
    pub started_at: Instant,
}

impl ServerResources {
    /// Assemble resources from already-built parts
    #[must_use]
    pub fn new(database: Database, summary: SummaryService, config: ServerConfig) -> Self {
        Self {
            database: Arc::new(database),
            summary: Arc::new(summary),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Connect the database and build the configured text-generation provider
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the HTTP client
    /// cannot be created
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let database = Database::new(&config.database_url).await?;
        let provider = ChatProvider::from_config(&config.llm)?
            .map(|provider| Arc::new(provider) as Arc<dyn LlmProvider>);
        let summary = SummaryService::new(provider, config.llm.max_tokens, config.goal_policy);
        Ok(Self::new(database, summary, config))
    }
}
