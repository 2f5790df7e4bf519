//! Response DTOs for the cache server API
//!
//! Shared by the server handlers and the HTTP client backend.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::cache::CacheStats;

/// Response body for the GET operation (GET /get?key=)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value, exactly as it was written
    pub value: Box<RawValue>,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Box<RawValue>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the SET operation (PUT /set)
///
/// `accepted = false` means the cache declined the write; nothing was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetResponse {
    pub key: String,
    pub accepted: bool,
    pub message: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, accepted: bool) -> Self {
        let key = key.into();
        let message = if accepted {
            format!("Key '{}' set successfully", key)
        } else {
            format!("Write to key '{}' was declined", key)
        };
        Self {
            key,
            accepted,
            message,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del?key=)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub rejected_writes: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            rejected_writes: stats.rejected_writes,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Crate version serving the request
    pub version: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
