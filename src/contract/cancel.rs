//! Cooperative cancellation for cache operations.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{CacheError, Result};

/// Runs `operation` unless `token` fires first.
///
/// An already-cancelled token short-circuits without polling the operation.
/// Otherwise the two are raced, with cancellation checked first on every poll,
/// so a cancelled call never reports a success it did not finish.
pub async fn with_cancellation<F, T>(token: &CancellationToken, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if token.is_cancelled() {
        return Err(CacheError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(CacheError::Cancelled),
        result = operation => result,
    }
}
