// ABOUTME: Core types and constants for the MyPT health tracking service
// ABOUTME: Foundation crate with error handling, profile/entry models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `MyPT` Core
//!
//! Foundation crate providing shared types and constants for the `MyPT`
//! health tracking service. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Default targets, status thresholds, fallback coefficients
//! - **models**: `UserProfile`, `DailyEntry`, `EntryCollection`, AI summary types

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (profile, daily entries, AI summaries)
pub mod models;
