// ABOUTME: Service layer sitting between route handlers and storage
// ABOUTME: AI summary client, reply parsing, and per-user request state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Service layer
//!
//! Business logic that route handlers delegate to, kept free of HTTP types.

/// Extraction of the JSON recommendation from model output
pub mod response_parser;

/// Per-user summary request state machine
pub mod sessions;

/// AI summary client and profile updates derived from summaries
pub mod summary;

pub use sessions::{SummarySessions, SummaryState};
pub use summary::{
    FallbackReason, SignupOutcome, SummaryError, SummaryOutcome, SummaryService, SummarySource,
};
