// ABOUTME: HTTP server assembly: router, trace and CORS layers, listener, graceful shutdown
// ABOUTME: Unknown routes answer with the same JSON error shape as handler failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#[cfg(not(unix))]
use std::future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::Uri;
use axum::middleware::from_fn;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

use crate::errors::AppError;
use crate::middleware::{create_request_span, propagate_request_id, setup_cors};
use crate::resources::ServerResources;
use crate::routes::api_routes;

/// Full application router with middleware
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    api_routes(resources)
        .fallback(handle_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(create_request_span::<Body>)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(from_fn(propagate_request_id))
        .layer(setup_cors(&resources.config))
}

async fn handle_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM
///
/// # Errors
///
/// Returns an error if the address is invalid, the port cannot be bound, or
/// the server fails while running
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", resources.config.host, resources.config.http_port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                resources.config.host, resources.config.http_port
            )
        })?;

    let app = build_router(&resources);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sigterm) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown requested");
}
