//! Scope policy with a central alias table.
//!
//! A declared scope is satisfied by the scope itself or by one of the token values
//! listed for it here. Matching is exact string equality per token; there is no
//! prefix or substring matching.

use std::collections::HashMap;

use crate::error::RpcError;

/// Legacy token values accepted in place of a declared scope.
pub const STANDARD_ALIASES: &[(&str, &[&str])] = &[
    ("calculator:read", &["calculator-scope", "openid"]),
    ("weather:read", &["weather-scope"]),
];

/// Scope checks for one resource server.
#[derive(Debug, Clone, Default)]
pub struct ScopePolicy {
    aliases: HashMap<String, Vec<String>>,
}

impl ScopePolicy {
    /// Policy without aliases: only the exact scope is accepted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy with [`STANDARD_ALIASES`].
    #[must_use]
    pub fn standard() -> Self {
        STANDARD_ALIASES.iter().fold(Self::new(), |policy, (scope, tokens)| {
            tokens.iter().fold(policy, |policy, token| policy.alias(scope, token))
        })
    }

    /// Accept `token` as an equivalent of `scope`.
    #[must_use]
    pub fn alias(mut self, scope: &str, token: &str) -> Self {
        let tokens = self.aliases.entry(scope.to_string()).or_default();
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
        self
    }

    /// Token values that satisfy `scope`, the scope itself first.
    pub fn accepted_tokens<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        std::iter::once(scope).chain(self.aliases.get(scope).into_iter().flatten().map(String::as_str))
    }

    /// Whether `granted` satisfies `required`.
    #[must_use]
    pub fn is_satisfied(&self, required: &str, granted: &[String]) -> bool {
        self.accepted_tokens(required).any(|token| granted.iter().any(|g| g == token))
    }

    /// Like [`ScopePolicy::is_satisfied`], as a protocol error.
    pub fn check(&self, required: &str, granted: &[String]) -> Result<(), RpcError> {
        if self.is_satisfied(required, granted) {
            Ok(())
        } else {
            Err(RpcError::InsufficientScope { required: required.to_string() })
        }
    }
}
