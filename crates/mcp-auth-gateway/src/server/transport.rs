//! HTTP transport for the resource servers.
//!
//! `POST /` and `POST /mcp` carry JSON-RPC 2.0. The body is read as raw bytes so a
//! malformed request can be answered with a JSON-RPC parse error instead of the
//! extractor's plain-text rejection.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::dispatch::Dispatcher;
use crate::tools::ToolDomain;

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub domain: ToolDomain,
    pub dispatcher: Arc<Dispatcher>,
}

/// Create the HTTP router for a resource server.
pub fn create_router(domain: ToolDomain, dispatcher: Arc<Dispatcher>) -> Router {
    let state = Arc::new(HttpState { domain, dispatcher });

    Router::new()
        .route("/", post(handle_rpc))
        .route("/mcp", post(handle_rpc))
        .route("/health", get(health_check))
        .route("/info", get(server_info))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(state)
}

async fn handle_rpc(State(state): State<Arc<HttpState>>, headers: HeaderMap, body: Bytes) -> Response {
    let caller = state.dispatcher.caller(&headers);
    let (status, response) = state.dispatcher.dispatch(&body, &caller).await;
    (status, Json(response)).into_response()
}

async fn health_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.domain.service_name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn server_info(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.domain.display_name(),
        "version": env!("CARGO_PKG_VERSION"),
        "description": state.domain.description(),
        "tools": state.dispatcher.registry().names()
    }))
}
