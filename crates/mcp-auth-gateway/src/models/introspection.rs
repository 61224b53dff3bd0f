//! Token introspection response (RFC 7662) as returned by the realm.

use serde::{Deserialize, Deserializer, Serialize};

/// Claims the gateway reads from an introspection response.
///
/// `active` absent is the same as `active: false`. Explicit `null` claims decode to
/// their empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sub: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,

    /// Realm-level roles, nested the way Keycloak reports them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub realm_access: RealmAccess,

    /// Space-delimited scope string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope: String,
}

/// The `realm_access` claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmAccess {
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

impl IntrospectionResult {
    /// An active token with the given subject and scope, mostly for tests.
    #[must_use]
    pub fn active(sub: impl Into<String>, scope: impl Into<String>) -> Self {
        Self { active: true, sub: sub.into(), scope: scope.into(), ..Self::default() }
    }

    /// Realm roles in claim order.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.realm_access.roles
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_keycloak_response() {
        let result: IntrospectionResult = serde_json::from_value(json!({
            "active": true,
            "sub": "7c1f",
            "email": "ada@example.com",
            "realm_access": {"roles": ["offline_access", "calculator-user"]},
            "scope": "openid email calculator:read",
            "exp": 1_700_000_000,
            "client_id": "mcp-client"
        }))
        .unwrap();

        assert!(result.active);
        assert_eq!(result.sub, "7c1f");
        assert_eq!(result.roles(), ["offline_access", "calculator-user"]);
        assert_eq!(result.scope, "openid email calculator:read");
    }

    #[test]
    fn test_inactive_response_is_minimal() {
        let result: IntrospectionResult = serde_json::from_value(json!({"active": false})).unwrap();
        assert!(!result.active);
        assert!(result.sub.is_empty());
        assert!(result.roles().is_empty());
    }

    #[test]
    fn test_missing_active_means_inactive() {
        let result: IntrospectionResult = serde_json::from_value(json!({"sub": "x"})).unwrap();
        assert!(!result.active);
    }

    #[test]
    fn test_null_claims_decode_to_defaults() {
        let result: IntrospectionResult = serde_json::from_value(json!({
            "active": true,
            "email": null,
            "realm_access": null
        }))
        .unwrap();
        assert!(result.email.is_empty());
        assert!(result.roles().is_empty());
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(serde_json::from_value::<IntrospectionResult>(json!({"active": "yes"})).is_err());
        assert!(serde_json::from_value::<IntrospectionResult>(json!([true])).is_err());
    }
}
