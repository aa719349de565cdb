// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ballot_common::{ErrorBody, ErrorResponse};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing, unknown, expired or destroyed session, or bad credentials.
    /// All of these render identically to the client.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Too many {action} attempts")]
    RateLimited { action: &'static str },

    #[error("Invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    #[error("Invalid CSRF token")]
    InvalidCsrfToken,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::EmailTaken | AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::InvalidCsrfToken => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "AUTH_001",
            AppError::InvalidCsrfToken => "AUTH_002",
            AppError::Internal(_) => "INT_001",
            AppError::NotFound(_) => "NF_001",
            AppError::Json(_) => "JSON_001",
            AppError::EmailTaken => "USER_001",
            AppError::UsernameTaken => "USER_002",
            AppError::RateLimited { .. } => "RATE_001",
            AppError::InvalidInput(_) => "VAL_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Auth(_) => "Authentication failed".to_string(),
            AppError::InvalidCsrfToken => "Invalid request token".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::Json(_) => "Invalid request format".to_string(),
            AppError::NotFound(_) => "Resource not found".to_string(),
            AppError::EmailTaken => "Email already registered".to_string(),
            AppError::UsernameTaken => "Username already taken".to_string(),
            AppError::RateLimited { action } => {
                format!("Too many {action} attempts. Please try again later.")
            },
            AppError::InvalidInput(_) => "Invalid input data".to_string(),
        }
    }

    /// Field-level problems worth showing to the client
    fn details(&self) -> Vec<String> {
        match self {
            AppError::InvalidInput(problems) => problems.clone(),
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        // Authentication failures never carry detail, even in development,
        // so an unknown user, a wrong password and an expired session look alike.
        let message = if cfg!(debug_assertions) && !matches!(self, AppError::Auth(_)) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code().to_string(),
                message,
                details: self.details(),
            },
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<rand::rand_core::OsError> for AppError {
    fn from(err: rand::rand_core::OsError) -> Self {
        AppError::Internal(format!("entropy source unavailable: {err}"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {err}"))
    }
}

/// Errors that must stop the process at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("password hash cost must be between 1 and {max}, got {0}", max = crate::auth::password::MAX_HASH_COST)]
    HashCost(u8),

    #[error("invalid log level: {0}")]
    LogLevel(String),

    #[error("session TTL must be between 1 second and 10 years, got {0}s")]
    SessionTtl(u64),

    #[error("rate limit {0} must be greater than zero")]
    RateLimit(&'static str),

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let auth_error = AppError::Auth("Invalid token".to_string());
        assert_eq!(auth_error.to_string(), "Authentication error: Invalid token");

        let limited = AppError::RateLimited { action: "login" };
        assert_eq!(limited.to_string(), "Too many login attempts");

        let invalid = AppError::InvalidInput(vec!["a".into(), "b".into()]);
        assert_eq!(invalid.to_string(), "Invalid input: a; b");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(AppError::Auth("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::UsernameTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::RateLimited { action: "register" }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(AppError::InvalidInput(vec![]).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCsrfToken.status_code(), StatusCode::FORBIDDEN);

        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        assert_eq!(AppError::Json(json_err).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_app_error_error_codes() {
        assert_eq!(AppError::Auth("x".into()).error_code(), "AUTH_001");
        assert_eq!(AppError::Internal("x".into()).error_code(), "INT_001");
        assert_eq!(AppError::RateLimited { action: "login" }.error_code(), "RATE_001");
        assert_eq!(AppError::EmailTaken.error_code(), "USER_001");
    }

    #[tokio::test]
    async fn test_auth_errors_are_indistinguishable() {
        let (s1, b1) = body_json(AppError::Auth("unknown user".into())).await;
        let (s2, b2) = body_json(AppError::Auth("session expired".into())).await;
        assert_eq!(s1, s2);
        assert_eq!(b1, b2);
        assert_eq!(b1["error"]["message"], "Authentication failed");
    }

    #[tokio::test]
    async fn test_validation_details_in_body() {
        let (status, body) =
            body_json(AppError::InvalidInput(vec!["email: Invalid email address".into()])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VAL_001");
        assert_eq!(body["error"]["details"][0], "email: Invalid email address");
    }

    #[test]
    fn test_error_from_impls() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Json(_)));

        let app_err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::HashCost(0).to_string(),
            "password hash cost must be between 1 and 20, got 0"
        );
    }
}
