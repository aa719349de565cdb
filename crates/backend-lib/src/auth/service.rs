use async_trait::async_trait;
use chrono::Duration;

use crate::error::AppError;

/// Credential hashing and session lifecycle as seen by the HTTP handlers
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Hash off the async runtime; the hasher is deliberately slow
    async fn hash_password(&self, plain: String) -> Result<String, AppError>;
    /// `false` for a mismatch and for any malformed hash
    async fn verify_password(&self, plain: String, hash: String) -> bool;
    /// Spend the same work as a real verification when there is no account
    async fn verify_against_dummy(&self, plain: String);
    async fn new_session(&self, owner_id: &str) -> Result<String, AppError>;
    async fn validate_session(&self, token: &str) -> Option<String>;
    async fn end_session(&self, token: &str);
    fn session_ttl(&self) -> Duration;
}
