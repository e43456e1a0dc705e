// ABOUTME: Axum IntoResponse integration for AppError
// ABOUTME: Maps error codes to HTTP status codes with a JSON error body kept as a response extension
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use tracing::{error, warn};

use super::{AppError, ErrorResponse};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error.code = ?self.code, error.message = %self.message, "Request failed");
        } else {
            warn!(error.code = ?self.code, error.message = %self.message, "Request rejected");
        }

        let body = ErrorResponse::from(self);
        let mut response = (status, Json(body.clone())).into_response();
        // Lets middleware re-render the body with the request id
        response.extensions_mut().insert(body);
        response
    }
}
