//! Authorization server client.
//!
//! Provides:
//! - Token introspection with confidential client credentials (HTTP basic auth)
//! - Realm signing key retrieval, cached by [`KeyCache`]
//!
//! Every call is bounded by the configured timeout and never retried: a forward-auth
//! decision must fail fast rather than stall the proxy.

mod keys;

pub use keys::KeyCache;

use std::time::{Duration, Instant};

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::config::GatewayConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{IntrospectionResult, JwkSet};

/// Source of token validity and claims.
#[async_trait::async_trait]
pub trait TokenIntrospector: Send + Sync {
    /// Ask the authority about a token. Does not interpret `active`.
    async fn introspect(&self, token: &str) -> ClientResult<IntrospectionResult>;
}

/// HTTP client for the realm's OpenID Connect endpoints.
#[derive(Clone)]
pub struct AuthServerClient {
    client: Client,
    config: GatewayConfig,
    introspection_url: String,
}

impl AuthServerClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let introspection_url = config.oidc_endpoint("token/introspect");

        Ok(Self { client, config, introspection_url })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Fetch the signing keys of a realm.
    ///
    /// # Errors
    ///
    /// `UpstreamUnavailable` on transport failure, timeout or non-2xx;
    /// `IntrospectionMalformed` if the body is not a key set.
    pub async fn fetch_jwks(&self, realm: &str) -> ClientResult<JwkSet> {
        let url = self.config.jwks_url_for(realm);
        let started = Instant::now();
        let response = self.client.get(&url).send().await;
        let response = self.check(response, &url, started)?;
        self.decode(response).await
    }

    async fn post_introspection(&self, token: &str) -> ClientResult<IntrospectionResult> {
        let started = Instant::now();
        let response = self
            .client
            .post(&self.introspection_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("token", token), ("token_type_hint", "access_token")])
            .send()
            .await;
        let response = self.check(response, &self.introspection_url, started)?;
        self.decode(response).await
    }

    fn check(
        &self,
        response: Result<Response, reqwest::Error>,
        url: &str,
        started: Instant,
    ) -> ClientResult<Response> {
        let elapsed = started.elapsed();
        let response = response.map_err(|e| {
            tracing::warn!(url, elapsed_ms = millis(elapsed), error = %e, "Authorization server unreachable");
            ClientError::from_transport(&e, self.config.request_timeout)
        })?;

        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), elapsed_ms = millis(elapsed), "Authorization server responded");

        if status.is_success() {
            Ok(response)
        } else {
            tracing::warn!(url, status = status.as_u16(), "Authorization server returned an error status");
            Err(ClientError::status(status.as_u16()))
        }
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> ClientResult<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::from_transport(&e, self.config.request_timeout))?;
        serde_json::from_slice(&body).map_err(|e| ClientError::malformed(e.to_string()))
    }
}

#[async_trait::async_trait]
impl TokenIntrospector for AuthServerClient {
    async fn introspect(&self, token: &str) -> ClientResult<IntrospectionResult> {
        self.post_introspection(token).await
    }
}

impl std::fmt::Debug for AuthServerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServerClient")
            .field("introspection_url", &self.introspection_url)
            .field("client_id", &self.config.client_id)
            .finish()
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
