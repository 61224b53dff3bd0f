//! HTTP surface of the verification gateway.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::GatewayState;
use crate::error::ClientError;

/// Service name reported by `/health`.
pub const SERVICE_NAME: &str = "mcp-auth-gateway";

/// Create the gateway router.
///
/// CORS applies to the public metadata routes only. `/verify` must see every
/// request, preflights included, so that a missing token always ends in a 401.
pub fn create_router(state: Arc<GatewayState>) -> Router {
    let public = Router::new()
        .route("/.well-known/oauth-authorization-server", get(handle_auth_server_metadata))
        .route("/.well-known/jwks.json", get(handle_jwks))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/verify", any(handle_verify))
        .merge(public)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// `ANY /verify`
///
/// Forward-auth check called by the reverse proxy before each protected request.
async fn handle_verify(State(state): State<Arc<GatewayState>>, headers: HeaderMap) -> Response {
    match state.gateway.verify(&headers).await {
        Ok(authorized) => authorized.into_response(),
        Err(rejection) => {
            tracing::info!(reason = rejection.kind(), "Request rejected");
            state.challenge.reject(&rejection)
        }
    }
}

/// `GET /.well-known/oauth-authorization-server`
async fn handle_auth_server_metadata(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(state.discovery.metadata().clone())
}

/// `GET /.well-known/jwks.json`
///
/// Realm signing keys, served from the key cache.
async fn handle_jwks(State(state): State<Arc<GatewayState>>) -> Response {
    match state.keys.realm_keys().await {
        Ok(keys) => Json(keys.as_ref().clone()).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Signing keys unavailable");
            let error = match e {
                ClientError::UpstreamUnavailable { .. } => "upstream_unavailable",
                ClientError::IntrospectionMalformed { .. } => "upstream_malformed",
            };
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": error,
                    "error_description": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

async fn health_check(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "auth_server_url": state.config.base_url(),
        "realm": state.config.realm
    }))
}
