// ================
// crates/common/src/lib.rs
// ================
//! Common request and response bodies
//! shared between the ballot HTTP API and its clients.
//! This module defines the JSON shapes of the `/api/auth` routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/register`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    /// Desired username (3 to 20 characters)
    pub username: String,
    /// Contact email, unique across accounts
    pub email: String,
    /// Plaintext password, hashed before it is stored
    pub password: String,
}

/// Body of `POST /api/auth/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Either the username or the email of the account
    pub username_or_email: String,
    /// Plaintext password
    pub password: String,
}

/// Public profile of an account.
///
/// This is the only user shape that ever leaves the server; the password
/// hash has no field here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Successful register, login or session lookup
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserProfile,
}

impl AuthResponse {
    pub fn new(user: UserProfile) -> Self {
        Self { success: true, user }
    }
}

/// Successful logout
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Freshly issued single-use CSRF token
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CsrfResponse {
    pub token: String,
}

/// Error envelope returned by every failing route
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `AUTH_001`
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Per-field validation problems, when the request body was rejected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}
