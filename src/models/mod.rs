//! Request and Response models for the cache server API
//!
//! DTOs shared by the axum handlers and the HTTP client backend.

pub mod requests;
pub mod responses;

pub use requests::{KeyParams, SetRequest};
pub use responses::{
    DeleteResponse, ErrorResponse, GetResponse, HealthResponse, SetResponse, StatsResponse,
};
