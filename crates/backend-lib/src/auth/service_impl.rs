use crate::auth::{AuthService, PasswordHasher, SessionManager};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Duration;
use tracing::warn;

pub struct DefaultAuth {
    hasher: PasswordHasher,
    sm: SessionManager,
    dummy_hash: String,
}

impl DefaultAuth {
    /// Hashes one throwaway password up front so unknown-account logins can
    /// be made to cost the same as real ones.
    pub fn new(hasher: PasswordHasher, sm: SessionManager) -> anyhow::Result<Self> {
        let dummy_hash = hasher.hash("not-a-real-password")?;
        Ok(Self { hasher, sm, dummy_hash })
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sm
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn hash_password(&self, plain: String) -> Result<String, AppError> {
        let hasher = self.hasher;
        let hash = tokio::task::spawn_blocking(move || hasher.hash_owned(plain)).await??;
        Ok(hash)
    }

    async fn verify_password(&self, plain: String, hash: String) -> bool {
        let hasher = self.hasher;
        match tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash)).await {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %e, "password verification task failed");
                false
            },
        }
    }

    async fn verify_against_dummy(&self, plain: String) {
        let _ = self.verify_password(plain, self.dummy_hash.clone()).await;
    }

    async fn new_session(&self, owner_id: &str) -> Result<String, AppError> {
        self.sm.create(owner_id).await
    }

    async fn validate_session(&self, token: &str) -> Option<String> {
        self.sm.validate(token).await
    }

    async fn end_session(&self, token: &str) {
        self.sm.destroy(token).await;
    }

    fn session_ttl(&self) -> Duration {
        self.sm.ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> DefaultAuth {
        DefaultAuth::new(PasswordHasher::new(4).unwrap(), SessionManager::new()).unwrap()
    }

    #[tokio::test]
    async fn test_hash_and_verify_off_runtime() {
        let auth = auth();
        let hash = auth.hash_password("hunter22".to_string()).await.unwrap();
        assert!(auth.verify_password("hunter22".to_string(), hash.clone()).await);
        assert!(!auth.verify_password("hunter23".to_string(), hash).await);
    }

    #[tokio::test]
    async fn test_session_roundtrip_through_service() {
        let auth = auth();
        let token = auth.new_session("user-1").await.unwrap();
        assert_eq!(auth.validate_session(&token).await.as_deref(), Some("user-1"));
        auth.end_session(&token).await;
        assert_eq!(auth.validate_session(&token).await, None);
        assert_eq!(auth.session_ttl(), Duration::days(7));
        assert!(auth.sessions().is_empty().await);
    }
}
