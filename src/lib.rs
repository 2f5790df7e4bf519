//! Cache Contract - an async key-value caching contract
//!
//! Defines the [`Cache`] contract (get by key, set with expiry, both
//! cancellable) and ships two backends: the in-process [`MemoryCache`] and
//! [`HttpCache`], a client for the bundled `cache_server`.

pub mod api;
pub mod cache;
pub mod config;
pub mod contract;
pub mod error;
pub mod models;
pub mod remote;
pub mod tasks;

pub use api::AppState;
pub use cache::MemoryCache;
pub use config::Config;
pub use contract::{Cache, CacheExt};
pub use error::{CacheError, Result};
pub use remote::HttpCache;
pub use tasks::spawn_cleanup_task;
pub use tokio_util::sync::CancellationToken;
