//! Cache Store Module
//!
//! Synchronous cache engine combining HashMap storage with LRU tracking and
//! expiry. `MemoryCache` wraps it for async, shared access.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::contract::{validate_key, MAX_VALUE_SIZE};
use crate::error::Result;

// == Cache Store ==
/// Bounded payload store with LRU eviction and per-entry expiry.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Expiry applied when a write does not carry one, None = never expire
    default_expiry: Option<Duration>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and default expiry.
    pub fn new(max_entries: usize, default_expiry: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            default_expiry,
        }
    }

    // == Set ==
    /// Stores a payload under `key`.
    ///
    /// Overwriting a key replaces the payload and resets its expiry. At
    /// capacity, expired entries are purged first, then the least recently
    /// used entry is evicted.
    ///
    /// Returns `Ok(false)` without storing anything when the expiry is zero,
    /// the payload exceeds [`MAX_VALUE_SIZE`], or the capacity is zero.
    pub fn set(&mut self, key: String, payload: String, expiry: Option<Duration>) -> Result<bool> {
        validate_key(&key)?;

        if expiry == Some(Duration::ZERO) {
            debug!(key = %key, "rejecting write with zero expiry");
            self.stats.record_rejected_write();
            return Ok(false);
        }

        if payload.len() > MAX_VALUE_SIZE {
            debug!(key = %key, size = payload.len(), "rejecting oversized payload");
            self.stats.record_rejected_write();
            return Ok(false);
        }

        if self.max_entries == 0 {
            self.stats.record_rejected_write();
            return Ok(false);
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            self.make_room();
        }

        let entry = CacheEntry::new(payload, expiry.or(self.default_expiry));
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(true)
    }

    /// Frees at least one slot, preferring expired entries over live ones.
    fn make_room(&mut self) {
        if self.cleanup_expired() > 0 {
            return;
        }
        if let Some(evicted) = self.lru.evict_oldest() {
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, "evicted least recently used entry");
        }
    }

    // == Get ==
    /// Retrieves the payload stored under `key`.
    ///
    /// An expired entry is removed on access and reported as absent.
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return Ok(None);
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return Ok(None);
        }

        self.stats.record_hit();
        self.lru.touch(key);
        Ok(self.entries.get(key).map(|entry| entry.payload.clone()))
    }

    // == Remove ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Drops every entry. Counters other than the entry count are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
