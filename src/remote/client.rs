//! HTTP client backend for a remote cache server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::contract::{validate_key, with_cancellation, Cache};
use crate::error::{CacheError, Result};
use crate::models::{DeleteResponse, ErrorResponse, GetResponse, SetRequest, SetResponse};

// == Http Cache ==
/// [`Cache`] backed by a remote `cache_server` over HTTP.
///
/// Each operation is one request. Cancelling the token drops the in-flight
/// request; whether the server already applied a cancelled write is unknown
/// to the caller.
#[derive(Debug, Clone)]
pub struct HttpCache {
    client: Client,
    base_url: Url,
}

impl HttpCache {
    /// Creates a client for the server at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Same as [`new`](Self::new) with a preconfigured reqwest client
    /// (timeouts, proxies, TLS).
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CacheError::InvalidRequest(format!("Invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CacheError::InvalidRequest(format!(
                "Base URL '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Builds `<base>/<route>`.
    fn endpoint(&self, route: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(route);
        }
        url
    }

    /// Builds `<base>/<route>?key=<key>`. The key stays out of the path, where
    /// `.` and `..` would be normalized away.
    fn keyed_endpoint(&self, route: &str, key: &str) -> Url {
        let mut url = self.endpoint(route);
        url.query_pairs_mut().append_pair("key", key);
        url
    }

    /// Deletes `key` on the server. Returns whether an entry was removed.
    pub async fn remove(&self, key: &str, token: &CancellationToken) -> Result<bool> {
        validate_key(key)?;
        with_cancellation(token, async {
            let response = self
                .client
                .delete(self.keyed_endpoint("del", key))
                .send()
                .await?;
            match response.status() {
                StatusCode::NOT_FOUND => Ok(false),
                status if status.is_success() => {
                    let _: DeleteResponse = response.json().await?;
                    Ok(true)
                }
                _ => Err(backend_error(response).await),
            }
        })
        .await
    }
}

#[async_trait]
impl Cache for HttpCache {
    async fn get_raw(&self, key: &str, token: &CancellationToken) -> Result<Option<String>> {
        validate_key(key)?;
        with_cancellation(token, async {
            let response = self
                .client
                .get(self.keyed_endpoint("get", key))
                .send()
                .await?;
            match response.status() {
                StatusCode::NOT_FOUND => Ok(None),
                status if status.is_success() => {
                    let body: GetResponse = response.json().await?;
                    Ok(Some(body.value.get().to_string()))
                }
                _ => Err(backend_error(response).await),
            }
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
        validate_key(key)?;
        // The wire format carries a JSON document, not opaque text.
        let value = RawValue::from_string(payload).map_err(CacheError::Encode)?;
        let request = SetRequest::new(key, value, expiry);

        with_cancellation(token, async {
            let response = self
                .client
                .put(self.endpoint("set"))
                .json(&request)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(backend_error(response).await);
            }
            let body: SetResponse = response.json().await?;
            debug!(key, accepted = body.accepted, "remote cache write");
            Ok(body.accepted)
        })
        .await
    }
}

/// Turns a non-success response into [`CacheError::Backend`], keeping the
/// server's error message when it sent one.
async fn backend_error(response: Response) -> CacheError {
    let status = response.status();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    warn!(%status, %message, "remote cache returned an error");
    CacheError::Backend(format!("{status}: {message}"))
}
