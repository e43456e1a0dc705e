// ABOUTME: Configuration module for the MyPT server
// ABOUTME: Re-exports environment-driven server, database and LLM settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration is read from environment variables only; see
//! [`ServerConfig::from_env`] for the full list.

/// Environment and server configuration
pub mod environment;

pub use environment::{Environment, LlmConfig, LlmProviderType, ServerConfig};
