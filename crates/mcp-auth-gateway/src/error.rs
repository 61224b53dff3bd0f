//! Error types for the gateway and the resource servers.
//!
//! Uses `thiserror` for structured error handling. The gateway taxonomy
//! ([`Rejection`]) and the JSON-RPC taxonomy ([`RpcError`]) never mix: the first
//! always ends in HTTP 401, the second in a JSON-RPC error object.

use std::time::Duration;

/// Errors from calls to the authorization server.
///
/// Cloneable so a shared cache can hand the same failure to every waiter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Connection failure, timeout or non-2xx status.
    #[error("Authorization server unavailable: {message}")]
    UpstreamUnavailable {
        /// What went wrong
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Malformed introspection response: {message}")]
    IntrospectionMalformed {
        /// Decoder error
        message: String,
    },
}

impl ClientError {
    /// Create an upstream unavailable error.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable { message: message.into() }
    }

    /// Create an upstream error for an unexpected HTTP status.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self::upstream(format!("unexpected status {status}"))
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(after: Duration) -> Self {
        Self::upstream(format!("request timed out after {after:?}"))
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::IntrospectionMalformed { message: message.into() }
    }

    /// Map a transport error, folding timeouts into `UpstreamUnavailable`.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::timeout(timeout)
        } else {
            Self::upstream(err.to_string())
        }
    }
}

/// Why the gateway refused a request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No `Authorization: Bearer <token>` header.
    #[error("Bearer token required")]
    MissingBearerToken,

    /// The authorization server could not answer.
    #[error("{0}")]
    IntrospectionFailed(String),

    /// The authorization server reported the token as inactive.
    #[error("Token is not active")]
    TokenInactive,

    /// Claims could not be carried as identity headers.
    #[error("Token claims cannot be forwarded: {0}")]
    InvalidClaims(String),
}

impl Rejection {
    /// Short reason for the `WWW-Authenticate` challenge.
    ///
    /// Upstream details go in the JSON body only.
    #[must_use]
    pub const fn challenge_description(&self) -> &'static str {
        match self {
            Self::MissingBearerToken => "Bearer token required",
            Self::IntrospectionFailed(_) => "Token validation failed",
            Self::TokenInactive => "Token is not active",
            Self::InvalidClaims(_) => "Token claims rejected",
        }
    }

    /// Stable label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingBearerToken => "missing_bearer_token",
            Self::IntrospectionFailed(_) => "introspection_failed",
            Self::TokenInactive => "token_inactive",
            Self::InvalidClaims(_) => "invalid_claims",
        }
    }
}

impl From<ClientError> for Rejection {
    fn from(err: ClientError) -> Self {
        Self::IntrospectionFailed(err.to_string())
    }
}

/// JSON-RPC error codes.
pub mod codes {
    /// Invalid JSON or envelope.
    pub const PARSE_ERROR: i32 = -32700;
    /// Used for insufficient scope.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Unknown method or tool.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Missing or uncoercible arguments.
    pub const INVALID_PARAMS: i32 = -32602;
}

/// Protocol-level errors returned inside a JSON-RPC envelope.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Body is not a JSON-RPC request.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Caller lacks the scope the tool domain requires.
    #[error("Insufficient permissions: required scope {required}")]
    InsufficientScope {
        /// Declared scope
        required: String,
    },

    /// Unknown JSON-RPC method.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Unknown tool name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments do not satisfy the tool schema.
    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

impl RpcError {
    /// JSON-RPC error code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Parse(_) => codes::PARSE_ERROR,
            Self::InsufficientScope { .. } => codes::INVALID_REQUEST,
            Self::UnknownMethod(_) | Self::UnknownTool(_) => codes::METHOD_NOT_FOUND,
            Self::InvalidParams(_) => codes::INVALID_PARAMS,
        }
    }

    /// JSON-RPC error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Parse(_) => "Parse error",
            Self::InsufficientScope { .. } => "Insufficient permissions",
            Self::UnknownMethod(_) | Self::UnknownTool(_) => "Method not found",
            Self::InvalidParams(_) => "Invalid params",
        }
    }

    /// Human-readable `data` member.
    #[must_use]
    pub fn data(&self) -> String {
        match self {
            Self::Parse(description) | Self::InvalidParams(description) => description.clone(),
            Self::InsufficientScope { required } => format!("Required scope: {required}"),
            Self::UnknownMethod(method) => format!("Unknown method: {method}"),
            Self::UnknownTool(name) => format!("Unknown tool: {name}"),
        }
    }
}

/// Result type alias for authorization server calls.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_upstream_unavailable() {
        let err = ClientError::timeout(Duration::from_secs(10));
        assert!(matches!(err, ClientError::UpstreamUnavailable { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_client_error_becomes_introspection_failure() {
        let rejection = Rejection::from(ClientError::status(503));
        match rejection {
            Rejection::IntrospectionFailed(description) => assert!(description.contains("503")),
            other => panic!("unexpected rejection: {other:?}"),
        }
    }

    #[test]
    fn test_rpc_error_projection() {
        let err = RpcError::InsufficientScope { required: "weather:read".into() };
        assert_eq!(err.code(), -32600);
        assert_eq!(err.message(), "Insufficient permissions");
        assert_eq!(err.data(), "Required scope: weather:read");

        let err = RpcError::UnknownTool("nope".into());
        assert_eq!(err.code(), -32601);
        assert_eq!(err.data(), "Unknown tool: nope");

        let err = RpcError::UnknownMethod("resources/list".into());
        assert_eq!(err.code(), -32601);
        assert_eq!(err.data(), "Unknown method: resources/list");
    }

    #[test]
    fn test_challenge_descriptions_hide_upstream_detail() {
        let rejection = Rejection::IntrospectionFailed("connection refused to 10.0.0.3".into());
        assert_eq!(rejection.challenge_description(), "Token validation failed");
        assert!(rejection.to_string().contains("10.0.0.3"));
    }
}
