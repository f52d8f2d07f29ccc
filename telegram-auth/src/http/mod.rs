//! HTTP client building for upstream calls.

mod client;

pub use client::{HttpClientBuilder, HttpClientConfig};
