//! Streamable HTTP transport
//!
//! Serves the MCP service under `/mcp` next to two plain JSON routes: `/` describes
//! the server and `/health` reports process liveness without touching storage.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use image2url_core::constants::SERVER_VERSION;
use image2url_core::iso_timestamp;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::StreamableHttpService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::server::ImageService;

/// Largest request body the HTTP transport accepts (base64 inflates a 10 MiB image).
pub const MAX_REQUEST_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Build the HTTP router around an MCP service.
pub fn router(service: ImageService) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(service.clone()),
        Arc::new(LocalSessionManager::default()),
        Default::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(server_info))
        .route("/health", get(liveness))
        .nest_service("/mcp", mcp)
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn server_info() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Image2URL MCP Server",
        "version": SERVER_VERSION,
        "description": "MCP server for uploading images to R2 storage and returning public URLs",
        "endpoints": {
            "health": "/health",
            "mcp": "/mcp",
        },
    }))
}

/// Liveness probe - process is running.
async fn liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "timestamp": iso_timestamp(Utc::now()),
            "version": SERVER_VERSION,
            "services": {
                "http_server": "online",
                "mcp_server": "ready",
            },
        })),
    )
}

/// Start the HTTP transport with graceful shutdown
pub async fn serve(service: ImageService, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        addr = %addr,
        mcp_endpoint = "/mcp",
        health_endpoint = "/health",
        "Server ready and accepting connections"
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    tracing::info!(signal, "Shutting down");
}
