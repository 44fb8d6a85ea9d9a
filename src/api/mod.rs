//! Data-access layer: HTTP binding, error taxonomy, and per-endpoint tag rules.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::PostsClient;
pub use error::ApiError;
