use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::client_address;
use crate::{error::AppError, AppState};

/// State for one rate-limited route: the app plus the action name that
/// prefixes the counter key
#[derive(Clone)]
pub struct RateLimitScope {
    pub state: Arc<AppState>,
    pub action: &'static str,
}

impl RateLimitScope {
    pub fn new(state: Arc<AppState>, action: &'static str) -> Self {
        Self { state, action }
    }
}

/// Rate limiter middleware, keyed by `"<action>:<client address>"`
pub async fn rate_limit(
    State(scope): State<RateLimitScope>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = format!("{}:{}", scope.action, client_address(request.headers()));

    if !scope.state.rate_limiter.check_default(&key) {
        return Err(AppError::RateLimited { action: scope.action });
    }
    debug!(%key, "rate limit check passed");

    Ok(next.run(request).await)
}
