// ============================
// crates/backend-lib/src/auth/users.rs
// ============================
//! In-memory credential records.
use crate::error::AppError;
use ballot_common::UserProfile;
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// One registered account
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(username: String, email: String, password_hash: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            created_at,
        }
    }

    /// The fields that may leave the server
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Default)]
struct Index {
    by_id: HashMap<String, UserRecord>,
    id_by_username: HashMap<String, String>,
    id_by_email: HashMap<String, String>,
}

/// Credential store. Id, username and email are each unique; all three
/// indexes change together under one lock.
#[derive(Clone, Default)]
pub struct UserStore {
    inner: Arc<RwLock<Index>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Email conflicts are reported before username conflicts.
    pub async fn insert(&self, record: UserRecord) -> Result<UserProfile, AppError> {
        let mut index = self.inner.write().await;
        if index.id_by_email.contains_key(&record.email) {
            return Err(AppError::EmailTaken);
        }
        if index.id_by_username.contains_key(&record.username) {
            return Err(AppError::UsernameTaken);
        }
        if index.by_id.contains_key(&record.id) {
            return Err(AppError::Internal(format!("duplicate user id {}", record.id)));
        }

        let profile = record.profile();
        index.id_by_email.insert(record.email.clone(), record.id.clone());
        index.id_by_username.insert(record.username.clone(), record.id.clone());
        index.by_id.insert(record.id.clone(), record);
        Ok(profile)
    }

    pub async fn find_by_id(&self, id: &str) -> Option<UserRecord> {
        self.inner.read().await.by_id.get(id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        let index = self.inner.read().await;
        index.id_by_username.get(username).and_then(|id| index.by_id.get(id)).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let index = self.inner.read().await;
        index.id_by_email.get(email).and_then(|id| index.by_id.get(id)).cloned()
    }

    /// Look up by email first, then by username
    pub async fn find_by_login(&self, username_or_email: &str) -> Option<UserRecord> {
        let index = self.inner.read().await;
        index
            .id_by_email
            .get(username_or_email)
            .or_else(|| index.id_by_username.get(username_or_email))
            .and_then(|id| index.by_id.get(id))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
