//! HTTP transport for MCP server.
//!
//! JSON-RPC frames are accepted on `POST /mcp` and forwarded through a channel
//! to the single handler task started by
//! [`McpServer::spawn_handler`](crate::McpServer::spawn_handler).

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, codes};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tower_http::trace::TraceLayer;

/// A request waiting for the handler task, with the slot for its reply.
pub type PendingRequest = (JsonRpcRequest, oneshot::Sender<Option<JsonRpcResponse>>);

/// HTTP transport handler state.
pub struct HttpTransportState {
    /// Channel for sending requests to the MCP server.
    request_tx: mpsc::Sender<PendingRequest>,
}

impl HttpTransportState {
    pub fn new(request_tx: mpsc::Sender<PendingRequest>) -> Self {
        Self { request_tx }
    }
}

/// Create the HTTP router for MCP.
pub fn create_router(state: Arc<HttpTransportState>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_post))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle POST requests to /mcp (JSON-RPC over HTTP).
async fn handle_mcp_post(State(state): State<Arc<HttpTransportState>>, body: Bytes) -> Response {
    let request = match JsonRpcRequest::parse(&body) {
        Ok(request) => request,
        Err(response) => return (StatusCode::BAD_REQUEST, Json(response)).into_response(),
    };
    let id = request.id.clone();

    let (response_tx, response_rx) = oneshot::channel();
    if state.request_tx.send((request, response_tx)).await.is_err() {
        return unavailable(id, "MCP server unavailable");
    }

    match response_rx.await {
        Ok(Some(response)) => (StatusCode::OK, Json(response)).into_response(),
        // Notifications are acknowledged without a body.
        Ok(None) => StatusCode::ACCEPTED.into_response(),
        Err(_) => unavailable(id, "No response from MCP server"),
    }
}

fn unavailable(id: Option<serde_json::Value>, message: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(JsonRpcResponse::error(id, codes::INTERNAL_ERROR, message)),
    )
        .into_response()
}

/// Handle health check requests.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "slate-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    address: String,
    state: Arc<HttpTransportState>,
}

impl HttpServer {
    pub fn new(address: impl Into<String>, request_tx: mpsc::Sender<PendingRequest>) -> Self {
        Self {
            address: address.into(),
            state: Arc::new(HttpTransportState::new(request_tx)),
        }
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<(), McpError> {
        let app = create_router(self.state);

        let listener = tokio::net::TcpListener::bind(&self.address)
            .await
            .map_err(|e| {
                McpError::StartupFailed(format!("failed to bind to {}: {}", self.address, e))
            })?;

        tracing::info!(address = %self.address, "MCP HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Shutdown signal received");
                }
            })
            .await
            .map_err(|e| McpError::TransportError(e.to_string()))?;

        Ok(())
    }
}
