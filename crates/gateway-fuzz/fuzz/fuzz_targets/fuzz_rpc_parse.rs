#![no_main]

use libfuzzer_sys::fuzz_target;
use mcp_auth_gateway::error::RpcError;
use mcp_auth_gateway::models::{JsonRpcRequest, JsonRpcResponse};

fuzz_target!(|data: &[u8]| {
    // Every body must end in a serializable envelope, never a panic
    let response = match serde_json::from_slice::<JsonRpcRequest>(data) {
        Ok(request) => JsonRpcResponse::error(Some(request.id), &RpcError::UnknownMethod(request.method)),
        Err(e) => JsonRpcResponse::error(None, &RpcError::Parse(e.to_string())),
    };
    assert!(serde_json::to_vec(&response).is_ok());
});
