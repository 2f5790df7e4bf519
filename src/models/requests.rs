//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::contract::validate_key;
use crate::error::Result;

/// Request body for the SET operation (PUT /set)
///
/// `value` is any JSON document. It is kept as raw text, so numbers outside
/// the 64-bit range reach the store unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Box<RawValue>,
    /// Optional expiry in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_ms: Option<u64>,
}

impl SetRequest {
    /// Builds a request from a payload and expiry.
    ///
    /// Sub-millisecond expiries round up to one millisecond so they are not
    /// mistaken for a zero expiry on the wire.
    pub fn new(key: impl Into<String>, value: Box<RawValue>, expiry: Option<Duration>) -> Self {
        Self {
            key: key.into(),
            value,
            expiry_ms: expiry.map(expiry_to_millis),
        }
    }

    /// Validates the request data
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.key)
    }

    pub fn expiry(&self) -> Option<Duration> {
        self.expiry_ms.map(Duration::from_millis)
    }
}

/// Query string of the keyed endpoints (`GET /get?key=`, `DELETE /del?key=`).
///
/// Keys travel in the query rather than the path so that keys such as `.`
/// and `..` survive URL normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyParams {
    pub key: String,
}

fn expiry_to_millis(expiry: Duration) -> u64 {
    let millis = u64::try_from(expiry.as_millis()).unwrap_or(u64::MAX);
    if millis == 0 && !expiry.is_zero() {
        1
    } else {
        millis
    }
}
