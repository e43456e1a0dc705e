// ABOUTME: HTTP middleware for request tracing and cross-origin access
// ABOUTME: Requests get a correlation id for spans and error bodies; CORS origins come from configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod cors;
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use tracing::{create_request_span, propagate_request_id, request_id, REQUEST_ID_HEADER};
