// ABOUTME: Re-exports the unified error types from mypt-core
// ABOUTME: Keeps `crate::errors::AppError` paths stable for the server modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Error codes, `AppError` and the JSON error body live in `mypt-core` so the
//! calculation crate can report invalid input without depending on the server.
//! With the `http-response` feature enabled, `AppError` converts directly into
//! an axum response.

pub use mypt_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails};
