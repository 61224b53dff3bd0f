//! JSON-RPC 2.0 envelopes.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::RpcError;

/// Request id: number or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(serde_json::Number),
    String(String),
}

/// JSON-RPC 2.0 request.
///
/// `id` is required; notifications are not part of this protocol surface.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

fn default_version() -> String {
    JsonRpcResponse::VERSION.to_string()
}

/// JSON-RPC 2.0 response.
///
/// Exactly one of `result` / `error` is set. `id` is always serialized, as `null`
/// when the request could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    pub id: Option<RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl JsonRpcResponse {
    /// JSON-RPC version constant.
    pub const VERSION: &'static str = "2.0";

    #[must_use]
    pub fn success(id: RequestId, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    #[must_use]
    pub fn error(id: Option<RequestId>, err: &RpcError) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: err.code(),
                message: err.message().to_string(),
                data: Some(err.data()),
            }),
        }
    }
}

/// Tool entry in a `tools/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}
