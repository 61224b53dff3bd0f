//! Forward-auth decision.
//!
//! Every request starts unauthenticated and ends either [`Authorized`] or rejected
//! with a [`Rejection`]. Nothing is cached between requests: each call re-introspects
//! the token so that revocation takes effect immediately.

use std::sync::Arc;

use axum::{
    Json,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::client::TokenIntrospector;
use crate::error::Rejection;
use crate::models::IdentityHeaders;

/// Successful verification: the identity and its ready-to-send header values.
#[derive(Debug, Clone)]
pub struct Authorized {
    identity: IdentityHeaders,
    header_values: [(&'static str, HeaderValue); 4],
}

impl Authorized {
    /// Identity derived from the token claims.
    #[must_use]
    pub const fn identity(&self) -> &IdentityHeaders {
        &self.identity
    }

    /// `X-User-*` header pairs in a fixed order.
    #[must_use]
    pub fn header_values(&self) -> &[(&'static str, HeaderValue)] {
        &self.header_values
    }
}

impl IntoResponse for Authorized {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::with_capacity(self.header_values.len());
        for (name, value) in self.header_values {
            headers.insert(HeaderName::from_static(name), value);
        }
        (StatusCode::OK, headers, Json(serde_json::json!({ "status": "ok" }))).into_response()
    }
}

/// Verification gateway.
#[derive(Clone)]
pub struct VerificationGateway {
    introspector: Arc<dyn TokenIntrospector>,
}

impl VerificationGateway {
    #[must_use]
    pub fn new(introspector: Arc<dyn TokenIntrospector>) -> Self {
        Self { introspector }
    }

    /// Token from `Authorization: Bearer <token>`.
    ///
    /// The scheme is matched case-insensitively; an empty token counts as absent.
    #[must_use]
    pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
        let Authorization(bearer) = headers.typed_get::<Authorization<Bearer>>()?;
        let token = bearer.token().trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    /// Run the decision for one request.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] reason; every reason maps to HTTP 401.
    pub async fn verify(&self, headers: &HeaderMap) -> Result<Authorized, Rejection> {
        let Some(token) = Self::bearer_token(headers) else {
            tracing::debug!(reason = Rejection::MissingBearerToken.kind(), "Rejecting request");
            return Err(Rejection::MissingBearerToken);
        };

        let claims = self.introspector.introspect(&token).await.map_err(|e| {
            tracing::warn!(error = %e, "Token introspection failed");
            Rejection::from(e)
        })?;

        if !claims.active {
            tracing::debug!(reason = Rejection::TokenInactive.kind(), "Rejecting request");
            return Err(Rejection::TokenInactive);
        }

        let identity = IdentityHeaders::from_claims(&claims);
        let header_values = identity.to_header_values().map_err(|name| {
            tracing::warn!(sub = %identity.sub, header = name, "Claim cannot be sent as a header");
            Rejection::InvalidClaims(format!("{name} contains characters not allowed in a header"))
        })?;

        tracing::debug!(sub = %identity.sub, scopes = %identity.scopes, "Token accepted");
        Ok(Authorized { identity, header_values })
    }
}

impl std::fmt::Debug for VerificationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationGateway").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::{ClientError, ClientResult};
    use crate::models::IntrospectionResult;

    struct FakeIntrospector {
        outcome: ClientResult<IntrospectionResult>,
        calls: AtomicUsize,
    }

    impl FakeIntrospector {
        fn new(outcome: ClientResult<IntrospectionResult>) -> Arc<Self> {
            Arc::new(Self { outcome, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait::async_trait]
    impl TokenIntrospector for FakeIntrospector {
        async fn introspect(&self, _token: &str) -> ClientResult<IntrospectionResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(VerificationGateway::bearer_token(&with_auth("Bearer abc")).as_deref(), Some("abc"));
        assert_eq!(VerificationGateway::bearer_token(&with_auth("bearer abc")).as_deref(), Some("abc"));
        assert_eq!(VerificationGateway::bearer_token(&with_auth("Basic dXNlcjpwYXNz")), None);
        assert_eq!(VerificationGateway::bearer_token(&with_auth("Bearer")), None);
        assert_eq!(VerificationGateway::bearer_token(&with_auth("Bearer ")), None);
        assert_eq!(VerificationGateway::bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_missing_token_skips_introspection() {
        let fake = FakeIntrospector::new(Ok(IntrospectionResult::active("u", "s")));
        let gateway = VerificationGateway::new(fake.clone());

        let err = gateway.verify(&HeaderMap::new()).await.unwrap_err();
        assert_eq!(err, Rejection::MissingBearerToken);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_rejected() {
        let gateway = VerificationGateway::new(FakeIntrospector::new(Err(ClientError::status(500))));
        let err = gateway.verify(&with_auth("Bearer abc")).await.unwrap_err();
        assert!(matches!(err, Rejection::IntrospectionFailed(ref d) if d.contains("500")));
    }

    #[tokio::test]
    async fn test_inactive_token() {
        let gateway = VerificationGateway::new(FakeIntrospector::new(Ok(IntrospectionResult::default())));
        let err = gateway.verify(&with_auth("Bearer abc")).await.unwrap_err();
        assert_eq!(err, Rejection::TokenInactive);
    }

    #[tokio::test]
    async fn test_active_token_yields_identity() {
        let gateway = VerificationGateway::new(FakeIntrospector::new(Ok(IntrospectionResult::active(
            "user-1",
            "openid calculator:read",
        ))));
        let authorized = gateway.verify(&with_auth("Bearer abc")).await.unwrap();
        assert_eq!(authorized.identity().sub, "user-1");
        assert_eq!(authorized.header_values()[3].1, "openid calculator:read");

        let response = authorized.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-user-sub"], "user-1");
        assert_eq!(response.headers()["x-user-roles"], "");
    }

    #[tokio::test]
    async fn test_unsendable_claims_are_rejected() {
        let mut claims = IntrospectionResult::active("user-1", "openid");
        claims.sub = "line\nbreak".into();
        let gateway = VerificationGateway::new(FakeIntrospector::new(Ok(claims)));
        let err = gateway.verify(&with_auth("Bearer abc")).await.unwrap_err();
        assert!(matches!(err, Rejection::InvalidClaims(_)));
    }

    #[tokio::test]
    async fn test_utf8_claims_are_forwarded_as_utf8_bytes() {
        let mut claims = IntrospectionResult::active("user-é", "calculator:read");
        claims.email = "josé@example.com".into();
        let gateway = VerificationGateway::new(FakeIntrospector::new(Ok(claims)));

        let response = gateway.verify(&with_auth("Bearer abc")).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-user-sub"].as_bytes(), "user-é".as_bytes());
        assert_eq!(response.headers()["x-user-email"].as_bytes(), "josé@example.com".as_bytes());
    }
}
