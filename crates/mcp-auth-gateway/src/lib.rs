//! MCP Auth Gateway
//!
//! A forward-auth token gateway and the scope-gated JSON-RPC resource servers that
//! sit behind it.
//!
//! # Architecture
//!
//! - **Gateway**: a reverse proxy calls `/verify` before forwarding each request. The
//!   gateway introspects the bearer token against the authorization server and either
//!   answers `200` with `X-User-*` identity headers or `401` with a
//!   `WWW-Authenticate` challenge pointing at the OAuth endpoints.
//! - **Resource servers**: stateless MCP JSON-RPC endpoints, one per tool domain
//!   (calculator, weather). They read the forwarded identity headers, enforce the
//!   domain scope and dispatch to registered tools.
//!
//! The identity headers are trusted as-is by the resource servers. Deploy them on a
//! network path that only the reverse proxy can reach.
//!
//! # Example
//!
//! ```no_run
//! use mcp_auth_gateway::{config::GatewayConfig, gateway};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GatewayConfig::from_env()?;
//!     gateway::run_http(config, 3000).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod gateway;
pub mod models;
pub mod server;
pub mod tools;

pub use client::{AuthServerClient, KeyCache, TokenIntrospector};
pub use config::{GatewayConfig, ResourceConfig};
pub use error::{ClientError, Rejection, RpcError};
