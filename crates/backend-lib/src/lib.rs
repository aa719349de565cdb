// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Session and access-control backend for the ballot polling app.
//!
//! Request flow: rate limiter, then the credential hasher (register/login),
//! then the session store, with free text sanitized before it is stored.

pub mod auth;
pub mod clock;
pub mod config;
pub mod cookie;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod sanitize;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, CsrfTokens, DefaultAuth, PasswordHasher, RateLimiter, SessionManager, UserStore};
use crate::clock::{SharedClock, SystemClock};
use crate::config::Settings;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Registered accounts
    pub users: UserStore,
    /// Rate limiter
    pub rate_limiter: RateLimiter,
    /// Issued CSRF tokens
    pub csrf: CsrfTokens,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Create a new application state whose stores read time from `clock`
    pub fn with_clock(settings: Settings, clock: SharedClock) -> anyhow::Result<Self> {
        settings.validate()?;

        let hasher = PasswordHasher::new(settings.hash_cost)?;
        let sessions = SessionManager::with_clock(settings.session_ttl(), clock.clone());
        let auth = Arc::new(DefaultAuth::new(hasher, sessions)?);
        let rate_limiter = RateLimiter::with_clock(
            settings.rate_limit.max_requests,
            settings.rate_limit_window(),
            clock,
        );

        Ok(Self {
            auth,
            users: UserStore::new(),
            rate_limiter,
            csrf: CsrfTokens::new(),
            settings: Arc::new(settings),
        })
    }
}
