//! HTTP client module
//!
//! Provides the transport behind every list operation.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Path Templates**: `{name}` segments filled from encoded parameters
//! - **Authentication**: Integration with auth module

mod client;
mod rate_limit;

pub use client::{expand_path, HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
