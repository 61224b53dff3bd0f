//! Identity propagated from the gateway to the resource servers.
//!
//! The four `X-User-*` headers are the only channel identity crosses. Resource
//! servers do not re-verify them, so the hop between proxy and resource server must
//! not be reachable by clients.

use std::borrow::Cow;

use axum::http::{HeaderMap, HeaderValue};

use super::IntrospectionResult;

/// Header names.
pub mod headers {
    pub const USER_SUB: &str = "x-user-sub";
    pub const USER_EMAIL: &str = "x-user-email";
    pub const USER_ROLES: &str = "x-user-roles";
    pub const USER_SCOPES: &str = "x-user-scopes";
}

/// Identity headers derived from introspection claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub scopes: String,
}

impl IdentityHeaders {
    /// Project claims into headers. `scope` is carried verbatim.
    #[must_use]
    pub fn from_claims(claims: &IntrospectionResult) -> Self {
        Self {
            sub: claims.sub.clone(),
            email: claims.email.clone(),
            roles: claims.roles().to_vec(),
            scopes: claims.scope.clone(),
        }
    }

    /// Header name/value pairs in a fixed order.
    ///
    /// Fails with the offending header name when a claim contains bytes that are
    /// not allowed in a header value.
    pub fn to_header_values(&self) -> Result<[(&'static str, HeaderValue); 4], &'static str> {
        let value = |name: &'static str, raw: &str| {
            HeaderValue::from_bytes(raw.as_bytes()).map(|v| (name, v)).map_err(|_| name)
        };
        Ok([
            value(headers::USER_SUB, &self.sub)?,
            value(headers::USER_EMAIL, &self.email)?,
            value(headers::USER_ROLES, &self.roles.join(","))?,
            value(headers::USER_SCOPES, &self.scopes)?,
        ])
    }
}

/// Caller identity as seen by a resource server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    /// Effective scopes, already defaulted.
    pub scopes: Vec<String>,
}

impl CallerIdentity {
    /// Subject used when the gateway forwarded none.
    pub const ANONYMOUS: &'static str = "anonymous";

    /// Read the forwarded identity headers.
    ///
    /// A missing or blank `X-User-Scopes` falls back to `default_scope`, unless
    /// `strict` is set, in which case the caller has no scopes at all.
    ///
    /// Values are decoded as UTF-8, the encoding the gateway writes them in. Bytes
    /// that do not decode become U+FFFD, so a header that is present is never read
    /// as absent and never picks up the default scope.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, default_scope: &str, strict: bool) -> Self {
        let get = |name: &str| headers.get(name).map(|v| String::from_utf8_lossy(v.as_bytes()));

        let scopes = match get(headers::USER_SCOPES).filter(|s| !s.trim().is_empty()) {
            Some(raw) => split_scopes(&raw),
            None if strict => Vec::new(),
            None => split_scopes(default_scope),
        };

        Self {
            sub: get(headers::USER_SUB).map_or_else(|| Self::ANONYMOUS.to_string(), Cow::into_owned),
            email: get(headers::USER_EMAIL).map(Cow::into_owned).unwrap_or_default(),
            roles: get(headers::USER_ROLES)
                .map(|r| r.split(',').map(str::trim).filter(|r| !r.is_empty()).map(String::from).collect())
                .unwrap_or_default(),
            scopes,
        }
    }

    /// `{sub, email}` echoed in tool results.
    #[must_use]
    pub fn user_json(&self) -> serde_json::Value {
        serde_json::json!({ "sub": self.sub, "email": self.email })
    }
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> IntrospectionResult {
        let mut claims = IntrospectionResult::active("user-1", "openid weather:read");
        claims.email = "user@example.com".into();
        claims.realm_access.roles = vec!["admin".into(), "viewer".into()];
        claims
    }

    #[test]
    fn test_header_projection() {
        let identity = IdentityHeaders::from_claims(&claims());
        let pairs = identity.to_header_values().unwrap();
        assert_eq!(pairs[0], (headers::USER_SUB, HeaderValue::from_static("user-1")));
        assert_eq!(pairs[2].1, "admin,viewer");
        assert_eq!(pairs[3].1, "openid weather:read");
    }

    #[test]
    fn test_control_characters_are_refused() {
        let mut claims = claims();
        claims.email = "evil\r\nX-User-Scopes: admin".into();
        let identity = IdentityHeaders::from_claims(&claims);
        assert_eq!(identity.to_header_values().unwrap_err(), headers::USER_EMAIL);
    }

    #[test]
    fn test_caller_defaults() {
        let caller = CallerIdentity::from_headers(&HeaderMap::new(), "calculator:read", false);
        assert_eq!(caller.sub, "anonymous");
        assert_eq!(caller.email, "");
        assert!(caller.roles.is_empty());
        assert_eq!(caller.scopes, ["calculator:read"]);
    }

    #[test]
    fn test_caller_strict_has_no_default_scope() {
        let caller = CallerIdentity::from_headers(&HeaderMap::new(), "calculator:read", true);
        assert!(caller.scopes.is_empty());
    }

    #[test]
    fn test_caller_reads_forwarded_headers() {
        let mut map = HeaderMap::new();
        map.insert(headers::USER_SUB, HeaderValue::from_static("u-9"));
        map.insert(headers::USER_EMAIL, HeaderValue::from_static("u9@example.com"));
        map.insert(headers::USER_ROLES, HeaderValue::from_static("a, b,,c"));
        map.insert(headers::USER_SCOPES, HeaderValue::from_static("openid  weather:read"));

        let caller = CallerIdentity::from_headers(&map, "calculator:read", false);
        assert_eq!(caller.sub, "u-9");
        assert_eq!(caller.roles, ["a", "b", "c"]);
        assert_eq!(caller.scopes, ["openid", "weather:read"]);
        assert_eq!(caller.user_json()["email"], "u9@example.com");
    }

    #[test]
    fn test_blank_scope_header_uses_default() {
        let mut map = HeaderMap::new();
        map.insert(headers::USER_SCOPES, HeaderValue::from_static(" "));
        let caller = CallerIdentity::from_headers(&map, "weather:read", false);
        assert_eq!(caller.scopes, ["weather:read"]);
    }

    #[test]
    fn test_utf8_claims_survive_the_hop() {
        let mut claims = IntrospectionResult::active("user-é", "profile café");
        claims.email = "josé@example.com".into();
        claims.realm_access.roles = vec!["rédacteur".into()];

        let mut map = HeaderMap::new();
        for (name, value) in IdentityHeaders::from_claims(&claims).to_header_values().unwrap() {
            map.insert(name, value);
        }

        let caller = CallerIdentity::from_headers(&map, "calculator:read", false);
        assert_eq!(caller.sub, "user-é");
        assert_eq!(caller.email, "josé@example.com");
        assert_eq!(caller.roles, ["rédacteur"]);
        assert_eq!(caller.scopes, ["profile", "café"]);
    }

    #[test]
    fn test_undecodable_scopes_do_not_fall_back_to_default() {
        let mut map = HeaderMap::new();
        map.insert(headers::USER_SUB, HeaderValue::from_bytes(b"user-\xff").unwrap());
        map.insert(headers::USER_SCOPES, HeaderValue::from_bytes(b"profile \xfe\xff").unwrap());

        let caller = CallerIdentity::from_headers(&map, "calculator:read", false);
        assert_eq!(caller.sub, "user-\u{fffd}");
        assert_eq!(caller.scopes, ["profile", "\u{fffd}\u{fffd}"]);
        assert!(!caller.scopes.iter().any(|s| s == "calculator:read"));
    }
}
