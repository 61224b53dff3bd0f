//! RFC 8414 metadata pointing at the realm's endpoints.

use crate::config::GatewayConfig;
use crate::models::DiscoveryDocument;

const OPENID_SCOPES: &[&str] = &["openid", "profile", "email"];
const RESPONSE_TYPES: &[&str] = &["code", "token", "id_token", "code token", "code id_token"];
const GRANT_TYPES: &[&str] = &["authorization_code", "refresh_token", "client_credentials"];
const TOKEN_AUTH_METHODS: &[&str] = &["client_secret_basic", "client_secret_post"];
const CODE_CHALLENGE_METHODS: &[&str] = &["S256"];

/// Static discovery document, computed once from configuration.
#[derive(Debug, Clone)]
pub struct DiscoveryPublisher {
    document: DiscoveryDocument,
}

impl DiscoveryPublisher {
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        let scopes = OPENID_SCOPES.iter().map(|s| (*s).to_string()).chain(
            config.extra_scopes.iter().filter(|s| !OPENID_SCOPES.contains(&s.as_str())).cloned(),
        );

        let document = DiscoveryDocument {
            issuer: config.realm_url(),
            authorization_endpoint: config.oidc_endpoint("auth"),
            token_endpoint: config.oidc_endpoint("token"),
            introspection_endpoint: config.oidc_endpoint("token/introspect"),
            userinfo_endpoint: config.oidc_endpoint("userinfo"),
            end_session_endpoint: config.oidc_endpoint("logout"),
            jwks_uri: config.oidc_endpoint("certs"),
            registration_endpoint: format!("{}/clients-registrations/openid-connect", config.realm_url()),
            scopes_supported: scopes.collect(),
            response_types_supported: to_strings(RESPONSE_TYPES),
            grant_types_supported: to_strings(GRANT_TYPES),
            token_endpoint_auth_methods_supported: to_strings(TOKEN_AUTH_METHODS),
            code_challenge_methods_supported: to_strings(CODE_CHALLENGE_METHODS),
        };

        Self { document }
    }

    #[must_use]
    pub const fn metadata(&self) -> &DiscoveryDocument {
        &self.document
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}
