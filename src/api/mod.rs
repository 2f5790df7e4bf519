//! API Module
//!
//! HTTP surface that serves a [`MemoryCache`](crate::cache::MemoryCache).
//! [`HttpCache`](crate::remote::HttpCache) is the matching client.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value under a key
//! - `GET /get?key=` - Retrieve a value by key
//! - `DELETE /del?key=` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
