use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, AppState};

/// Header carrying a token from `GET /api/auth/csrf`
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Consume a single-use CSRF token when protection is switched on
pub async fn csrf_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.settings.csrf_protection {
        let presented = request
            .headers()
            .get(CSRF_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        if !state.csrf.consume(presented) {
            return Err(AppError::InvalidCsrfToken);
        }
    }
    Ok(next.run(request).await)
}
