// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! `/api/auth` handlers.
//!
//! Every failure that says "you are not who you claim" is the same
//! [`AppError::Auth`], whether the account is unknown, the password wrong,
//! or the session missing or expired.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use ballot_common::{AuthResponse, CsrfResponse, LoginRequest, LogoutResponse, RegisterRequest};
use chrono::Utc;
use metrics::counter;
use tracing::{info, warn};

use crate::auth::UserRecord;
use crate::cookie::{clear_session_cookie, session_cookie, session_from_headers};
use crate::error::AppError;
use crate::metrics as keys;
use crate::sanitize::sanitize;
use crate::validation::{validate_login, validate_register};
use crate::AppState;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| AppError::InvalidInput(vec![rejection.body_text()]))
}

/// Issue a session for `user` and build the success response with its cookie
async fn start_session(state: &AppState, user: &UserRecord) -> Result<Response, AppError> {
    let token = state.auth.new_session(&user.id).await?;
    let cookie = session_cookie(
        &token,
        state.auth.session_ttl().num_seconds(),
        state.settings.secure_cookies,
    )?;
    Ok(([(SET_COOKIE, cookie)], Json(AuthResponse::new(user.profile()))).into_response())
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let req = body(payload)?;
    validate_register(&req)?;

    let username = sanitize(&req.username);
    let email = sanitize(&req.email);

    // Cheap checks before paying for a hash; the insert re-checks atomically.
    if state.users.find_by_email(&email).await.is_some() {
        return Err(AppError::EmailTaken);
    }
    if state.users.find_by_username(&username).await.is_some() {
        return Err(AppError::UsernameTaken);
    }

    let password_hash = state.auth.hash_password(req.password).await?;
    let record = UserRecord::new(username, email, password_hash, Utc::now());
    state.users.insert(record.clone()).await?;

    counter!(keys::USER_REGISTERED).increment(1);
    info!(user_id = %record.id, username = %record.username, "user registered");

    start_session(&state, &record).await
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let req = body(payload)?;
    validate_login(&req)?;

    let login = sanitize(&req.username_or_email);
    let Some(user) = state.users.find_by_login(&login).await else {
        state.auth.verify_against_dummy(req.password).await;
        counter!(keys::LOGIN_FAILED).increment(1);
        return Err(AppError::Auth("unknown account".to_string()));
    };

    if !state
        .auth
        .verify_password(req.password, user.password_hash.clone())
        .await
    {
        counter!(keys::LOGIN_FAILED).increment(1);
        warn!(user_id = %user.id, "login rejected");
        return Err(AppError::Auth("password mismatch".to_string()));
    }

    info!(user_id = %user.id, "login successful");
    start_session(&state, &user).await
}

/// `GET /api/auth/session`
pub async fn session(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let secure = state.settings.secure_cookies;
    match current_user(&state, &headers).await {
        Ok(user) => Json(AuthResponse::new(user.profile())).into_response(),
        Err(err @ AppError::Auth(_)) => {
            // Whatever the browser holds is useless now; tell it to drop it.
            ([(SET_COOKIE, clear_session_cookie(secure))], err).into_response()
        },
        Err(err) => err.into_response(),
    }
}

async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<UserRecord, AppError> {
    let token = session_from_headers(headers).ok_or_else(|| AppError::Auth("no session cookie".to_string()))?;
    let user_id = state
        .auth
        .validate_session(&token)
        .await
        .ok_or_else(|| AppError::Auth("invalid or expired session".to_string()))?;
    state
        .users
        .find_by_id(&user_id)
        .await
        .ok_or_else(|| AppError::NotFound("user".to_string()))
}

/// `POST /api/auth/logout`. Succeeds whether or not a session existed.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_from_headers(&headers) {
        state.auth.end_session(&token).await;
    }
    let body = LogoutResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    };
    (
        [(SET_COOKIE, clear_session_cookie(state.settings.secure_cookies))],
        Json(body),
    )
        .into_response()
}

/// `GET /api/auth/csrf`
pub async fn csrf_token(State(state): State<Arc<AppState>>) -> Result<Json<CsrfResponse>, AppError> {
    let token = state.csrf.issue()?;
    Ok(Json(CsrfResponse { token }))
}
