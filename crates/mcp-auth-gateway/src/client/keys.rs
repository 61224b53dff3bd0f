//! Realm signing key cache.
//!
//! Keys are fetched on first use and kept for the configured time-to-live. The next
//! read after expiry triggers a refresh. Concurrent first readers share one fetch,
//! and failed fetches are never cached.

use std::sync::Arc;

use moka::future::Cache;

use super::AuthServerClient;
use crate::error::ClientResult;
use crate::models::JwkSet;

/// Process-wide signing key cache, keyed by realm.
#[derive(Clone)]
pub struct KeyCache {
    client: AuthServerClient,
    cache: Cache<String, Arc<JwkSet>>,
}

impl KeyCache {
    /// Create an empty cache using the client's TTL and capacity settings.
    #[must_use]
    pub fn new(client: AuthServerClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(client.config().jwks_cache_capacity)
            .time_to_live(client.config().jwks_cache_ttl)
            .build();

        Self { client, cache }
    }

    /// Keys for `realm`, fetching them if absent or expired.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the next call tries again.
    pub async fn get_keys(&self, realm: &str) -> ClientResult<Arc<JwkSet>> {
        let client = &self.client;
        self.cache
            .try_get_with(realm.to_string(), async move {
                tracing::info!(realm, "Fetching realm signing keys");
                client.fetch_jwks(realm).await.map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())
    }

    /// Keys for the configured realm.
    ///
    /// # Errors
    ///
    /// See [`KeyCache::get_keys`].
    pub async fn realm_keys(&self) -> ClientResult<Arc<JwkSet>> {
        self.get_keys(&self.client.config().realm).await
    }

    /// Drop the cached keys of `realm` so the next read refetches them.
    pub async fn invalidate(&self, realm: &str) {
        tracing::info!(realm, "Invalidating realm signing keys");
        self.cache.invalidate(realm).await;
    }

    /// Whether keys for `realm` are currently cached.
    #[must_use]
    pub fn contains(&self, realm: &str) -> bool {
        self.cache.contains_key(realm)
    }
}

impl std::fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCache").field("realms", &self.cache.entry_count()).finish()
    }
}
