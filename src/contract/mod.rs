//! Cache Contract Module
//!
//! The two operations every cache backend provides, in-memory or remote.
//!
//! Backends implement [`Cache`], which moves opaque JSON payloads. Callers use
//! [`CacheExt`], which adds the typed layer on top:
//!
//! ```ignore
//! let token = CancellationToken::new();
//! cache.set("user:1", &user, Some(Duration::from_secs(60)), &token).await?;
//! let user: Option<User> = cache.get("user:1", &token).await?;
//! ```

mod cancel;
mod codec;
pub mod conformance;

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{CacheError, Result};

pub use cancel::with_cancellation;
pub use codec::{decode, encode};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed encoded payload size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Cache Trait ==
/// Object-safe caching contract over serialized payloads.
///
/// Implementations decide storage, eviction and transport. The contract only
/// fixes the shape of the two operations:
///
/// - `get_raw` resolves to `Ok(None)` when no entry exists for the key.
/// - `set_raw` resolves to `Ok(true)` when the write was accepted; the value
///   is then retrievable with the same key until it expires or is evicted.
///   `Ok(false)` means the backend declined the write.
/// - Both return `Err(CacheError::Cancelled)` once `token` fires.
///
/// No ordering is guaranteed between concurrent callers on the same key.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetches the payload stored under `key`, if any.
    async fn get_raw(&self, key: &str, token: &CancellationToken) -> Result<Option<String>>;

    /// Stores `payload` under `key`. `expiry = None` means no expiry unless
    /// the backend applies its own default.
    async fn set_raw(
        &self,
        key: &str,
        payload: String,
        expiry: Option<Duration>,
        token: &CancellationToken,
    ) -> Result<bool>;
}

// == Typed Extension ==
/// Typed get/set for every [`Cache`], including `dyn Cache`.
///
/// A payload that does not decode as `T` surfaces as
/// [`CacheError::Decode`]; it is never reported as a miss.
#[async_trait]
pub trait CacheExt: Cache {
    /// Gets the value stored under `key`, decoded as `T`.
    async fn get<T>(&self, key: &str, token: &CancellationToken) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send;

    /// Encodes `value` and stores it under `key`.
    async fn set<V>(
        &self,
        key: &str,
        value: &V,
        expiry: Option<Duration>,
        token: &CancellationToken,
    ) -> Result<bool>
    where
        V: Serialize + Sync + ?Sized;
}

#[async_trait]
impl<C> CacheExt for C
where
    C: Cache + ?Sized,
{
    async fn get<T>(&self, key: &str, token: &CancellationToken) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get_raw(key, token).await? {
            Some(payload) => decode(key, &payload).map(Some),
            None => Ok(None),
        }
    }

    async fn set<V>(
        &self,
        key: &str,
        value: &V,
        expiry: Option<Duration>,
        token: &CancellationToken,
    ) -> Result<bool>
    where
        V: Serialize + Sync + ?Sized,
    {
        let payload = encode(value)?;
        self.set_raw(key, payload, expiry, token).await
    }
}

// == Key Validation ==
/// Rejects empty keys and keys longer than [`MAX_KEY_LENGTH`] bytes.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
