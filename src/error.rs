//! Error types for the cache contract and its backends
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for every cache operation.
///
/// A missing entry is not an error: `get` resolves to `Ok(None)` instead.
/// `NotFound` only exists for the HTTP surface, where a miss becomes a 404.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or longer than the allowed maximum
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The caller's cancellation token fired before the operation finished
    #[error("Operation cancelled")]
    Cancelled,

    /// Value could not be serialized into a payload
    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// Stored payload does not decode into the requested type
    #[error("Failed to decode value for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Key not found (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Remote cache could not be reached
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote cache answered with something unexpected
    #[error("Backend error: {0}")]
    Backend(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidKey(_) | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Encode(_) | CacheError::Decode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Transport(_) | CacheError::Backend(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
