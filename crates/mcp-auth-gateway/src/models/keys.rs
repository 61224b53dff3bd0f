//! Realm signing keys (JWKS).

use serde::{Deserialize, Serialize};

/// A JSON Web Key Set.
///
/// Individual keys are kept as raw JSON; the gateway only mirrors them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<serde_json::Value>,
}

impl JwkSet {
    /// Key ids present in the set.
    #[must_use]
    pub fn key_ids(&self) -> Vec<&str> {
        self.keys.iter().filter_map(|k| k.get("kid").and_then(|v| v.as_str())).collect()
    }
}
