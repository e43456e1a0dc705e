// ABOUTME: Main library entry point for the MyPT health tracking API
// ABOUTME: Wires the profile/entry store, AI summary client, and HTTP routes together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `MyPT` Server
//!
//! A health tracking backend: users keep a profile (height, sex, start weight,
//! activity level, goal weight, target date), log one entry per day (mood,
//! energy, calories, steps, weight), browse a calendar coloured by adherence
//! to their daily targets, and ask a language model for a weekly summary with
//! suggested calorie, step and goal-weight adjustments.
//!
//! ## Architecture
//!
//! - **`mypt-core`**: errors, models, constants
//! - **`mypt-intelligence`**: pure goal-progress and calendar calculations
//! - **database**: per-user SQLite record store
//! - **llm**: text-generation providers behind the `LlmProvider` trait
//! - **services**: AI summary client with heuristic fallback
//! - **routes**: axum HTTP surface
//!
//! ## Quick Start
//!
//! 1. Optionally export `ANTHROPIC_API_KEY` (without it every summary uses
//!    the heuristic fallback)
//! 2. Start the server with `mypt-server`
//! 3. `PUT /api/users/{user_id}/profile`, then log entries and request summaries

/// Environment-based configuration
pub mod config;

/// Profile and daily entry persistence
pub mod database;

/// Unified error handling (re-exported from `mypt-core`)
pub mod errors;

/// Text-generation providers
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (CORS, request tracing)
pub mod middleware;

/// Shared server resources for dependency injection
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Business services (AI summary client)
pub mod services;

pub use mypt_core::{constants, models};
pub use mypt_intelligence as intelligence;
