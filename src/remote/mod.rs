//! Remote Cache Module
//!
//! Client backend that implements the cache contract against a running
//! `cache_server`.

mod client;

pub use client::HttpCache;
