//! JSON payload codec shared by every backend.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, Result};

/// Serializes a value into its payload form.
pub fn encode<V>(value: &V) -> Result<String>
where
    V: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(CacheError::Encode)
}

/// Deserializes the payload stored under `key` as `T`.
pub fn decode<T>(key: &str, payload: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(payload).map_err(|source| CacheError::Decode {
        key: key.to_string(),
        source,
    })
}
