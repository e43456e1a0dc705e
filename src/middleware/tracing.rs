// ABOUTME: Request id propagation and tracing span construction for the HTTP layer
// ABOUTME: Reuses an incoming x-request-id or generates one, and stamps it on error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::body::Body;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{HeaderValue, Request};
use tracing::{field, info_span, Span};
use uuid::Uuid;

use crate::errors::ErrorResponse;

/// Header carrying the request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The caller's request id, or a fresh `req_<uuid>`
#[must_use]
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(|| format!("req_{}", Uuid::new_v4().simple()), str::to_owned)
}

/// Settle the request id before anything else sees the request
///
/// The id is written back onto the request so the trace span reads the same
/// value, echoed in the response header, and added to JSON error bodies.
pub async fn propagate_request_id(mut request: Request<Body>, next: Next) -> Response {
    let id = request_id(&request);
    let header = HeaderValue::from_str(&id).ok();
    if let Some(value) = &header {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(request).await;

    if let Some(body) = response.extensions_mut().remove::<ErrorResponse>() {
        let status = response.status();
        response = (status, Json(body.with_request_id(id))).into_response();
    }
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Create the tracing span for one HTTP request
///
/// `user.id` starts empty; handlers record it once the path is parsed.
pub fn create_request_span<B>(request: &Request<B>) -> Span {
    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request),
        user.id = field::Empty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_from_header() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(())
            .unwrap();
        assert_eq!(request_id(&request), "abc-123");
    }

    #[test]
    fn test_request_id_generated() {
        let request = Request::builder().body(()).unwrap();
        assert!(request_id(&request).starts_with("req_"));
    }
}
