//! Data models shared by the gateway and the resource servers.
//!
//! All wire models use `#[serde(default)]` for optional fields so that partial
//! upstream responses still decode.

mod discovery;
mod identity;
mod introspection;
mod keys;
mod rpc;

pub use discovery::DiscoveryDocument;
pub use identity::{CallerIdentity, IdentityHeaders, headers};
pub use introspection::{IntrospectionResult, RealmAccess};
pub use keys::JwkSet;
pub use rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, ToolInfo};
