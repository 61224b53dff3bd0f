//! Verification gateway.
//!
//! Components, wired once at start-up and shared read-only across requests:
//! - [`VerificationGateway`]: bearer extraction, introspection, identity projection
//! - [`Challenge`]: 401 rendering with OAuth discovery hints
//! - [`DiscoveryPublisher`]: RFC 8414 metadata
//! - [`KeyCache`]: realm signing keys with a time-to-live

mod challenge;
mod discovery;
pub mod transport;
mod verify;

pub use challenge::Challenge;
pub use discovery::DiscoveryPublisher;
pub use transport::create_router;
pub use verify::{Authorized, VerificationGateway};

use std::sync::Arc;

use crate::client::{AuthServerClient, KeyCache, TokenIntrospector};
use crate::config::GatewayConfig;

/// Shared state for gateway handlers.
#[derive(Debug)]
pub struct GatewayState {
    pub gateway: VerificationGateway,
    pub challenge: Challenge,
    pub discovery: DiscoveryPublisher,
    pub keys: KeyCache,
    pub config: GatewayConfig,
}

impl GatewayState {
    /// State backed by the realm's introspection endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let client = AuthServerClient::new(config.clone())?;
        Ok(Self::with_introspector(config, client.clone(), Arc::new(client)))
    }

    /// State with a custom introspector; signing keys still come from `client`.
    #[must_use]
    pub fn with_introspector(
        config: GatewayConfig,
        client: AuthServerClient,
        introspector: Arc<dyn TokenIntrospector>,
    ) -> Self {
        Self {
            gateway: VerificationGateway::new(introspector),
            challenge: Challenge::new(&config),
            discovery: DiscoveryPublisher::new(&config),
            keys: KeyCache::new(client),
            config,
        }
    }

    /// Router over this state.
    #[must_use]
    pub fn into_router(self) -> axum::Router {
        create_router(Arc::new(self))
    }
}

/// Run the gateway in HTTP mode.
///
/// # Errors
///
/// Returns error if the client cannot be built or the server fails.
pub async fn run_http(config: GatewayConfig, port: u16) -> anyhow::Result<()> {
    tracing::info!(
        auth_server_url = %config.base_url(),
        realm = %config.realm,
        "Starting verification gateway"
    );
    let state = GatewayState::new(config)?;
    crate::server::serve(state.into_router(), port).await
}
