// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the ballot HTTP API.

pub mod csrf;
pub mod rate_limit;

pub use csrf::csrf_guard;
pub use rate_limit::{rate_limit, RateLimitScope};

use axum::http::HeaderMap;

/// Header proxies use to pass on the original client address
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Client address for rate-limit keys: the first `x-forwarded-for` hop,
/// or `"unknown"`.
pub fn client_address(headers: &HeaderMap) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests;
