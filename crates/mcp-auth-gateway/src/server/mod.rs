//! Resource server implementation and the shared HTTP serve loop.
//!
//! Resource servers are stateless: every JSON-RPC call is answered from the request
//! body, the forwarded identity headers and the static tool registry.

pub mod dispatch;
pub mod scope;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

pub use dispatch::Dispatcher;
pub use scope::ScopePolicy;

use crate::config::ResourceConfig;
use crate::tools::ToolDomain;

/// MCP resource server for one tool domain.
pub struct McpServer {
    domain: ToolDomain,
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a resource server.
    #[must_use]
    pub fn new(config: &ResourceConfig) -> Self {
        Self { domain: config.domain, dispatcher: Arc::new(Dispatcher::from_config(config)) }
    }

    /// Router for this server.
    #[must_use]
    pub fn router(&self) -> Router {
        transport::create_router(self.domain, Arc::clone(&self.dispatcher))
    }

    /// Run the server in HTTP mode.
    ///
    /// # Errors
    ///
    /// Returns error on server failure.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        tracing::info!(
            service = self.domain.service_name(),
            tools = self.dispatcher.registry().len(),
            "Starting MCP resource server"
        );
        serve(self.router(), port).await
    }
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("domain", &self.domain)
            .field("tools", &self.dispatcher.registry().len())
            .finish()
    }
}

/// Bind `0.0.0.0:port` and serve `router` until Ctrl-C.
///
/// # Errors
///
/// Returns error if the port cannot be bound or the server fails.
pub async fn serve(router: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
