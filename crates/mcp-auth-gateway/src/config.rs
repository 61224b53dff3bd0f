//! Configuration for the gateway and the resource servers.

use std::time::Duration;

use anyhow::Context;
use url::Url;

use crate::tools::ToolDomain;

/// Authorization server defaults.
pub mod api {
    use std::time::Duration;

    /// Base URL of the authorization server.
    pub const AUTH_SERVER_URL: &str = "http://keycloak:8080";

    /// Realm the gateway validates tokens for.
    pub const REALM: &str = "mcp-gateway";

    /// Confidential client used for introspection.
    pub const CLIENT_ID: &str = "api-gateway";

    /// Budget for every call to the authorization server.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection timeout (bounded by `REQUEST_TIMEOUT` anyway).
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum age of cached signing keys (1 hour).
    pub const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

    /// Maximum number of realms held in the key cache.
    pub const JWKS_CACHE_MAX_REALMS: u64 = 16;

    /// Domain scopes advertised next to the OpenID ones.
    pub const EXTRA_SCOPES: &[&str] = &["calculator:read", "weather:read", "weather:alerts"];

    /// Default gateway listening port.
    pub const GATEWAY_PORT: u16 = 3000;
}

/// Gateway configuration.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Authorization server base URL.
    pub auth_server_url: Url,

    /// Realm name.
    pub realm: String,

    /// Confidential client id used for introspection.
    pub client_id: String,

    /// Confidential client secret used for introspection.
    pub client_secret: String,

    /// Timeout for each authorization server call.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// How long fetched signing keys stay valid.
    pub jwks_cache_ttl: Duration,

    /// Maximum number of realms kept in the key cache.
    pub jwks_cache_capacity: u64,

    /// Domain scopes advertised in the discovery document.
    pub extra_scopes: Vec<String>,
}

impl GatewayConfig {
    /// Create a configuration with default timeouts and cache settings.
    #[must_use]
    pub fn new(
        auth_server_url: Url,
        realm: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            auth_server_url,
            realm: realm.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            jwks_cache_ttl: api::JWKS_CACHE_TTL,
            jwks_cache_capacity: api::JWKS_CACHE_MAX_REALMS,
            extra_scopes: api::EXTRA_SCOPES.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Create a test configuration pointing at a mock authorization server.
    ///
    /// # Panics
    ///
    /// Panics if `base_url` is not a valid URL.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        let url = Url::parse(base_url).expect("mock server URL must be valid");
        Self {
            request_timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
            ..Self::new(url, api::REALM, "test-client", "test-secret")
        }
    }

    /// Create configuration from environment variables.
    ///
    /// `KEYCLOAK_CLIENT_SECRET` is required; everything else has a default.
    pub fn from_env() -> anyhow::Result<Self> {
        let url = std::env::var("KEYCLOAK_URL").unwrap_or_else(|_| api::AUTH_SERVER_URL.to_string());
        let url = Url::parse(&url).with_context(|| format!("invalid KEYCLOAK_URL: {url}"))?;
        let realm = std::env::var("KEYCLOAK_REALM").unwrap_or_else(|_| api::REALM.to_string());
        let client_id =
            std::env::var("KEYCLOAK_CLIENT_ID").unwrap_or_else(|_| api::CLIENT_ID.to_string());
        let client_secret = std::env::var("KEYCLOAK_CLIENT_SECRET")
            .context("KEYCLOAK_CLIENT_SECRET must be set")?;

        let mut config = Self::new(url, realm, client_id, client_secret);
        if let Ok(ttl) = std::env::var("JWKS_CACHE_TTL_SECS") {
            let secs: u64 = ttl.parse().with_context(|| format!("invalid JWKS_CACHE_TTL_SECS: {ttl}"))?;
            config.jwks_cache_ttl = Duration::from_secs(secs);
        }
        if let Ok(scopes) = std::env::var("GATEWAY_EXTRA_SCOPES") {
            config.extra_scopes = split_list(&scopes);
        }
        Ok(config)
    }

    /// Authorization server base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.auth_server_url.as_str().trim_end_matches('/')
    }

    /// Base URL of the given realm.
    #[must_use]
    pub fn realm_url_for(&self, realm: &str) -> String {
        format!("{}/realms/{}", self.base_url(), realm)
    }

    /// Base URL of the configured realm.
    #[must_use]
    pub fn realm_url(&self) -> String {
        self.realm_url_for(&self.realm)
    }

    /// OpenID Connect endpoint of the configured realm, e.g. `token/introspect`.
    #[must_use]
    pub fn oidc_endpoint(&self, path: &str) -> String {
        format!("{}/protocol/openid-connect/{}", self.realm_url(), path)
    }

    /// Signing key endpoint of the given realm.
    #[must_use]
    pub fn jwks_url_for(&self, realm: &str) -> String {
        format!("{}/protocol/openid-connect/certs", self.realm_url_for(realm))
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("auth_server_url", &self.base_url())
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .field("jwks_cache_ttl", &self.jwks_cache_ttl)
            .finish()
    }
}

/// Split a comma separated list, dropping blank entries.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

/// Resource server configuration.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    /// Tool domain served by this process.
    pub domain: ToolDomain,

    /// Scope string assumed when the gateway forwarded none.
    pub default_scope: String,

    /// Treat a missing `X-User-Scopes` header as "no scopes" instead of the default.
    pub strict_identity: bool,
}

impl ResourceConfig {
    /// Configuration for a domain with its own scope as the default.
    #[must_use]
    pub fn new(domain: ToolDomain) -> Self {
        Self {
            domain,
            default_scope: domain.required_scope().to_string(),
            strict_identity: false,
        }
    }

    /// Override the default scope.
    #[must_use]
    pub fn with_default_scope(mut self, scope: impl Into<String>) -> Self {
        self.default_scope = scope.into();
        self
    }

    /// Enable strict identity handling.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_identity = strict;
        self
    }
}
