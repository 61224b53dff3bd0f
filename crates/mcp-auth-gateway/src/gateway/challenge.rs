//! 401 challenge rendering.
//!
//! The `WWW-Authenticate` header tells an MCP client where to start the OAuth flow;
//! the JSON body carries the same links plus the full rejection reason.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::config::GatewayConfig;
use crate::error::Rejection;

/// Header used when the rendered challenge is not a valid header value.
const FALLBACK_CHALLENGE: &str = "Bearer error=\"invalid_token\"";

/// Challenge parameters for one realm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    realm: String,
    authorization_uri: String,
    discovery_uri: String,
}

impl Challenge {
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            realm: config.realm.clone(),
            authorization_uri: config.oidc_endpoint("auth"),
            discovery_uri: format!("{}/.well-known/openid-configuration", config.realm_url()),
        }
    }

    #[must_use]
    pub fn authorization_uri(&self) -> &str {
        &self.authorization_uri
    }

    #[must_use]
    pub fn discovery_uri(&self) -> &str {
        &self.discovery_uri
    }

    /// `WWW-Authenticate` value for a rejection.
    #[must_use]
    pub fn www_authenticate(&self, rejection: &Rejection) -> String {
        format!(
            "Bearer realm=\"{}\", error=\"invalid_token\", error_description=\"{}\", authorization_uri=\"{}\", discovery_uri=\"{}\"",
            quote_escape(&self.realm),
            quote_escape(rejection.challenge_description()),
            quote_escape(&self.authorization_uri),
            quote_escape(&self.discovery_uri),
        )
    }

    /// JSON body for a rejection.
    #[must_use]
    pub fn body(&self, rejection: &Rejection) -> serde_json::Value {
        serde_json::json!({
            "error": "unauthorized",
            "error_description": rejection.to_string(),
            "authorization_uri": self.authorization_uri,
            "discovery_uri": self.discovery_uri
        })
    }

    /// Full 401 response. Never carries identity headers.
    #[must_use]
    pub fn reject(&self, rejection: &Rejection) -> Response {
        let challenge = HeaderValue::from_str(&self.www_authenticate(rejection)).unwrap_or_else(|_| {
            tracing::warn!(realm = %self.realm, "Challenge is not a valid header value, using fallback");
            HeaderValue::from_static(FALLBACK_CHALLENGE)
        });

        let mut response = (StatusCode::UNAUTHORIZED, Json(self.body(rejection))).into_response();
        response.headers_mut().insert(header::WWW_AUTHENTICATE, challenge);
        response
    }
}

/// Escape a value for an RFC 7230 quoted-string.
fn quote_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge() -> Challenge {
        Challenge::new(&GatewayConfig::for_testing("http://auth.local:8080"))
    }

    #[test]
    fn test_challenge_urls() {
        let challenge = challenge();
        assert_eq!(
            challenge.authorization_uri(),
            "http://auth.local:8080/realms/mcp-gateway/protocol/openid-connect/auth"
        );
        assert_eq!(
            challenge.discovery_uri(),
            "http://auth.local:8080/realms/mcp-gateway/.well-known/openid-configuration"
        );
    }

    #[test]
    fn test_www_authenticate_format() {
        let value = challenge().www_authenticate(&Rejection::MissingBearerToken);
        assert_eq!(
            value,
            "Bearer realm=\"mcp-gateway\", error=\"invalid_token\", \
             error_description=\"Bearer token required\", \
             authorization_uri=\"http://auth.local:8080/realms/mcp-gateway/protocol/openid-connect/auth\", \
             discovery_uri=\"http://auth.local:8080/realms/mcp-gateway/.well-known/openid-configuration\""
        );
    }

    #[test]
    fn test_quote_escape() {
        assert_eq!(quote_escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn test_reject_response() {
        let rejection = Rejection::IntrospectionFailed("upstream said \"no\"".into());
        let response = challenge().reject(&rejection);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let header = response.headers()[header::WWW_AUTHENTICATE].to_str().unwrap();
        assert!(header.contains("error_description=\"Token validation failed\""));
        assert!(response.headers().get("x-user-sub").is_none());
    }

    #[test]
    fn test_body_carries_full_reason() {
        let body = challenge().body(&Rejection::IntrospectionFailed("connection refused".into()));
        assert_eq!(body["error"], "unauthorized");
        assert_eq!(body["error_description"], "connection refused");
    }
}
