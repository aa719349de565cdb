// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
//!
//! A token moves `absent -> active -> (expired | destroyed)`. Expired and
//! destroyed tokens are indistinguishable to callers: [`SessionManager::validate`]
//! returns `None` for both. Expiry is absolute; using a session never extends it.
use crate::auth::token_generator::{generate_secure_token, token_prefix};
use crate::clock::{SharedClock, SystemClock};
use crate::error::AppError;
use crate::metrics as keys;
use chrono::{DateTime, Duration, Utc};
use metrics::{counter, gauge};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::debug;

/// Session TTL (time to live) in seconds
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

/// Session information
#[derive(Debug, Clone)]
pub struct Session {
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session manager for handling authentication tokens
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
    clock: SharedClock,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Create a new session manager with the default TTL and the wall clock
    pub fn new() -> Self {
        Self::with_clock(Duration::seconds(SESSION_TTL_SECS), Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: SharedClock) -> Self {
        SessionManager {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new token for `owner_id`
    pub async fn create(&self, owner_id: &str) -> Result<String, AppError> {
        let token = generate_secure_token()?;
        let now = self.clock.now();
        let session = Session {
            owner_id: owner_id.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);

        counter!(keys::SESSION_CREATED).increment(1);
        gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        debug!(token = token_prefix(&token), owner_id, total = sessions.len(), "session created");

        Ok(token)
    }

    /// Resolve a token to its owner.
    ///
    /// An expired entry is evicted here, under the same write lock that
    /// observed it.
    pub async fn validate(&self, token: &str) -> Option<String> {
        let now = self.clock.now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => {
                    debug!(token = token_prefix(token), "session not found");
                    return None;
                },
                Some(session) if !session.is_expired(now) => return Some(session.owner_id.clone()),
                Some(_) => {},
            }
        }

        let mut sessions = self.sessions.write().await;
        // Re-check: another task may have destroyed it between the two locks.
        if sessions.get(token).is_some_and(|s| s.is_expired(now)) {
            sessions.remove(token);
            counter!(keys::SESSION_EXPIRED).increment(1);
            gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
            debug!(token = token_prefix(token), "session expired, removed");
        }
        None
    }

    /// Get a session by token, if it is still active
    pub async fn get(&self, token: &str) -> Option<Session> {
        let now = self.clock.now();
        let sessions = self.sessions.read().await;
        sessions.get(token).filter(|s| !s.is_expired(now)).cloned()
    }

    /// Remove a token. Unknown tokens are ignored.
    pub async fn destroy(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token).is_some() {
            counter!(keys::SESSION_DESTROYED).increment(1);
            gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
            debug!(token = token_prefix(token), "session destroyed");
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let before_count = sessions.len();

        sessions.retain(|_, session| !session.is_expired(now));

        let removed = before_count - sessions.len();
        if removed > 0 {
            counter!(keys::SESSION_EXPIRED).increment(removed as u64);
            gauge!(keys::SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }

    /// Number of stored entries, expired-but-unvisited ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
