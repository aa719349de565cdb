// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Fixed-window rate limiting keyed by an arbitrary string.
//!
//! Keys follow `"<action>:<client address>"`, e.g. `"login:203.0.113.4"`.
//! Counting is fixed-window, so a client can get up to twice the limit
//! through in a short burst that straddles a window boundary. Good enough
//! for coarse abuse prevention; not a smoothing limiter.

use crate::clock::{SharedClock, SystemClock};
use crate::metrics as keys;
use chrono::{DateTime, Duration, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use metrics::counter;
use std::sync::Arc;
use tracing::warn;

/// Default number of requests allowed per window
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default window length in seconds (15 minutes)
pub const DEFAULT_WINDOW_SECS: i64 = 15 * 60;

/// Request pressure for one key within the current window
#[derive(Debug, Clone)]
struct RateLimitCounter {
    count: u32,
    window_reset: DateTime<Utc>,
}

impl RateLimitCounter {
    fn fresh(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            count: 1,
            window_reset: now + window,
        }
    }
}

/// Rate limiter shared by every handler
#[derive(Clone)]
pub struct RateLimiter {
    /// Map of keys to counters. Each check holds the key's shard lock for
    /// its whole read-modify-write.
    counters: Arc<DashMap<String, RateLimitCounter>>,
    /// Limit used by [`RateLimiter::check_default`]
    max_requests: u32,
    /// Window used by [`RateLimiter::check_default`]
    window: Duration,
    clock: SharedClock,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, Duration::seconds(DEFAULT_WINDOW_SECS))
    }
}

impl RateLimiter {
    /// Create a new rate limiter with the given defaults
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    pub fn with_clock(max_requests: u32, window: Duration, clock: SharedClock) -> Self {
        Self {
            counters: Arc::new(DashMap::new()),
            max_requests,
            window,
            clock,
        }
    }

    /// Count one request against `key`, returning whether it may proceed.
    ///
    /// A rejected request does not add to the count.
    pub fn check(&self, key: &str, max_requests: u32, window: Duration) -> bool {
        let now = self.clock.now();

        let allowed = match self.counters.entry(key.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(RateLimitCounter::fresh(now, window));
                true
            },
            Entry::Occupied(mut slot) => {
                let counter = slot.get_mut();
                if now > counter.window_reset {
                    *counter = RateLimitCounter::fresh(now, window);
                    true
                } else if counter.count < max_requests {
                    counter.count += 1;
                    true
                } else {
                    false
                }
            },
        };

        if !allowed {
            counter!(keys::RATE_LIMIT_REJECTED).increment(1);
            warn!(key, max_requests, "rate limit exceeded");
        }
        allowed
    }

    /// [`RateLimiter::check`] with the configured limit and window
    pub fn check_default(&self, key: &str) -> bool {
        self.check(key, self.max_requests, self.window)
    }

    /// Remove counters whose window has elapsed
    pub fn purge_stale(&self) -> usize {
        let now = self.clock.now();
        let before = self.counters.len();
        self.counters.retain(|_, counter| now <= counter.window_reset);
        before - self.counters.len()
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.counters.len()
    }
}
