// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, auth};
use crate::middleware::{csrf_guard, rate_limit, RateLimitScope};
use crate::AppState;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let limited = |action: &'static str| from_fn_with_state(RateLimitScope::new(state.clone(), action), rate_limit);
    let csrf = || from_fn_with_state(state.clone(), csrf_guard);

    let auth_routes = Router::new()
        .route(
            "/register",
            post(auth::register).route_layer(csrf()).route_layer(limited("register")),
        )
        .route(
            "/login",
            post(auth::login).route_layer(csrf()).route_layer(limited("login")),
        )
        .route("/logout", post(auth::logout).route_layer(csrf()))
        .route("/session", get(auth::session))
        .route("/csrf", get(auth::csrf_token));

    Router::new()
        .nest("/api/auth", auth_routes)
        .route("/api/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
