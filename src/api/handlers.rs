//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::contract::Cache;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, KeyParams, SetRequest, SetResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: MemoryCache,
    /// Cancelled on server shutdown; every request runs under a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(cache: MemoryCache) -> Self {
        Self {
            cache,
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a new AppState with a cache sized from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(MemoryCache::from_config(config))
    }

    fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value under a key with optional expiry. A declined write
/// still answers 200 with `accepted: false`.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    req.validate()?;

    let expiry = req.expiry();
    let payload = req.value.get().to_string();
    let accepted = state
        .cache
        .set_raw(&req.key, payload, expiry, &state.request_token())
        .await?;

    Ok(Json(SetResponse::new(req.key, accepted)))
}

/// Handler for GET /get?key=
///
/// The stored payload is returned verbatim as the `value` field.
pub async fn get_handler(
    State(state): State<AppState>,
    Query(KeyParams { key }): Query<KeyParams>,
) -> Result<Json<GetResponse>> {
    let payload = state
        .cache
        .get_raw(&key, &state.request_token())
        .await?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;
    let value = RawValue::from_string(payload).map_err(|source| CacheError::Decode {
        key: key.clone(),
        source,
    })?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del?key=
pub async fn delete_handler(
    State(state): State<AppState>,
    Query(KeyParams { key }): Query<KeyParams>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.remove(&key).await {
        return Err(CacheError::NotFound(key));
    }
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(MemoryCache::new(100, None))
    }

    fn raw(value: Value) -> Box<RawValue> {
        RawValue::from_string(value.to_string()).unwrap()
    }

    fn key(key: &str) -> Query<KeyParams> {
        Query(KeyParams {
            key: key.to_string(),
        })
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = state();

        let req = SetRequest::new("test_key", raw(json!({"name": "test_value"})), None);
        let response = set_handler(State(state.clone()), Json(req)).await.unwrap();
        assert!(response.accepted);

        let response = get_handler(State(state), key("test_key")).await.unwrap();
        assert_eq!(response.value.get(), r#"{"name":"test_value"}"#);
    }

    #[tokio::test]
    async fn test_get_handler_keeps_wide_integers() {
        let state = state();

        let value = RawValue::from_string("340282366920938463463374607431768211455".to_string())
            .unwrap();
        let req = SetRequest::new("big", value, None);
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let response = get_handler(State(state), key("big")).await.unwrap();
        assert_eq!(response.value.get(), "340282366920938463463374607431768211455");
    }

    #[tokio::test]
    async fn test_dot_keys_are_ordinary_keys() {
        let state = state();

        for name in [".", ".."] {
            let req = SetRequest::new(name, raw(json!(name)), None);
            set_handler(State(state.clone()), Json(req)).await.unwrap();
        }

        let response = get_handler(State(state.clone()), key("..")).await.unwrap();
        assert_eq!(response.value.get(), r#"".."#);
        assert!(delete_handler(State(state), key(".")).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let result = get_handler(State(state()), key("nonexistent")).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_declined_write_reports_not_accepted() {
        let state = state();

        let req = SetRequest::new("zero", raw(json!(1)), Some(Duration::ZERO));
        let response = set_handler(State(state.clone()), Json(req)).await.unwrap();
        assert!(!response.accepted);

        let result = get_handler(State(state), key("zero")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = state();

        let req = SetRequest::new("to_delete", raw(json!("value")), None);
        set_handler(State(state.clone()), Json(req)).await.unwrap();

        let result = delete_handler(State(state.clone()), key("to_delete")).await;
        assert!(result.is_ok());

        let result = delete_handler(State(state), key("to_delete")).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let req = SetRequest::new("", raw(json!("value")), None);
        let result = set_handler(State(state()), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_requests_fail_after_shutdown() {
        let state = state();
        state.shutdown.cancel();

        let req = SetRequest::new("late", raw(json!(1)), None);
        let result = set_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::Cancelled)));
    }
}
