//! In-process [`Cache`] backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::contract::{with_cancellation, Cache};
use crate::error::Result;

// == Memory Cache ==
/// Shared handle to a [`CacheStore`] behind a tokio `RwLock`.
///
/// Clones share the same store. Every operation holds the write lock for one
/// synchronous store call, so concurrent writers to a key are
/// last-writer-wins and readers never see a partial payload. Cancellation is
/// honored while waiting for the lock; once the lock is held the call runs to
/// completion.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` entries.
    pub fn new(max_entries: usize, default_expiry: Option<Duration>) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries, default_expiry))),
        }
    }

    /// Creates a cache sized and configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_entries, config.default_expiry())
    }

    /// Removes `key`. Returns whether an entry was removed.
    pub async fn remove(&self, key: &str) -> bool {
        self.store.write().await.remove(key)
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Removes every expired entry. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get_raw(&self, key: &str, token: &CancellationToken) -> Result<Option<String>> {
        with_cancellation(token, async {
            // Write lock: a hit updates LRU order and counters.
            let mut store = self.store.write().await;
            store.get(key)
        })
        .await
    }

    async fn set_raw(
        &self,
        key: &str,
        payload: String,
        expiry: Option<Duration>,
        token: &CancellationToken,
    ) -> Result<bool> {
        with_cancellation(token, async {
            let mut store = self.store.write().await;
            let accepted = store.set(key.to_string(), payload, expiry)?;
            debug!(key, accepted, ?expiry, "memory cache write");
            Ok(accepted)
        })
        .await
    }
}
