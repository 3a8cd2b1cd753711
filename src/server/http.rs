//! HTTP server for the capture service.
//!
//! Two endpoints, mirroring what the service's clients already speak:
//! `POST /api/capture` runs a capture and returns the result inline,
//! `GET /api/health` is a liveness probe. CORS allows any origin, so
//! browsers elsewhere on the network can call the service directly.

use crate::capture::{CaptureOrchestrator, ProcessInvoker, ToolInvoker};
use crate::config::ServerConfig;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

/// Errors that can occur while running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

/// HTTP server wrapping a capture orchestrator.
pub struct CaptureServer<I = ProcessInvoker> {
    config: ServerConfig,
    orchestrator: Arc<CaptureOrchestrator<I>>,
}

impl<I: ToolInvoker + 'static> CaptureServer<I> {
    /// Creates a server for the given listener config and orchestrator.
    pub fn new(config: ServerConfig, orchestrator: CaptureOrchestrator<I>) -> Self {
        Self {
            config,
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Returns a handle to the shared orchestrator.
    pub fn orchestrator(&self) -> Arc<CaptureOrchestrator<I>> {
        Arc::clone(&self.orchestrator)
    }

    /// Builds the router with both endpoints and the CORS layer.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/capture", post(capture_handler::<I>))
            .route("/api/health", get(health_handler))
            .layer(cors_layer())
            .with_state(Arc::clone(&self.orchestrator))
    }

    /// Starts the HTTP server and runs it until ctrl-c.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        tracing::info!(
            addr = %self.config.bind_addr,
            "Capture server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

/// Handler for `POST /api/capture`.
///
/// The capture queues behind any capture already in flight; the response
/// status reflects the outcome, with the full result in the body either
/// way.
async fn capture_handler<I: ToolInvoker + 'static>(
    State(orchestrator): State<Arc<CaptureOrchestrator<I>>>,
) -> impl IntoResponse {
    let result = orchestrator.capture().await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(result))
}

/// Handler for `GET /api/health`.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Camera server is running",
    }))
}
