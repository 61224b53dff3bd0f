//! Fuzzing library for mcp-auth-gateway.
//!
//! Targets cover the inputs the gateway and the resource servers accept from the
//! network: JSON-RPC envelopes, tool arguments and introspection responses.
//!
//! # Usage
//!
//! ```bash
//! cd crates/gateway-fuzz
//! cargo +nightly fuzz run fuzz_rpc_parse -- -max_total_time=60
//! ```

pub use mcp_auth_gateway::{models, tools};
