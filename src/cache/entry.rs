//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiry support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored payload plus its expiry deadline.
///
/// Deadlines use the tokio clock, so paused-time tests can drive expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The encoded payload
    pub payload: String,
    /// Instant after which the entry is no longer served, None = never
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `expiry` from now, if given.
    ///
    /// An expiry too large to represent as a deadline never expires.
    pub fn new(payload: String, expiry: Option<Duration>) -> Self {
        let expires_at = expiry.and_then(|expiry| Instant::now().checked_add(expiry));
        Self {
            payload,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches the deadline, so a
    /// fully elapsed expiry is never served.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock
    /// reading, so a sweep can use one reading for every entry.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}
