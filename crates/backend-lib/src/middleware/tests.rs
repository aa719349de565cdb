use super::*;
use crate::clock::ManualClock;
use crate::config::{RateLimitSettings, Settings};
use crate::AppState;
use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use chrono::Duration;
use std::sync::Arc;
use tower::ServiceExt;

async fn test_handler() -> &'static str {
    "Hello, World!"
}

fn test_state(settings: Settings, clock: &ManualClock) -> Arc<AppState> {
    Arc::new(AppState::with_clock(settings, Arc::new(clock.clone())).unwrap())
}

fn settings(max_requests: u32) -> Settings {
    Settings {
        hash_cost: 4,
        rate_limit: RateLimitSettings {
            max_requests,
            window_secs: 60,
        },
        ..Settings::default()
    }
}

fn request(ip: &str) -> Request<Body> {
    Request::builder()
        .uri("/")
        .header(FORWARDED_FOR, ip)
        .body(Body::empty())
        .unwrap()
}

#[test]
fn test_client_address() {
    let mut headers = HeaderMap::new();
    assert_eq!(client_address(&headers), "unknown");

    headers.insert(FORWARDED_FOR, HeaderValue::from_static("203.0.113.4"));
    assert_eq!(client_address(&headers), "203.0.113.4");

    headers.insert(FORWARDED_FOR, HeaderValue::from_static(" 198.51.100.7 , 10.0.0.1"));
    assert_eq!(client_address(&headers), "198.51.100.7");

    headers.insert(FORWARDED_FOR, HeaderValue::from_static(""));
    assert_eq!(client_address(&headers), "unknown");
}

#[tokio::test]
async fn test_rate_limit() {
    let clock = ManualClock::default();
    let state = test_state(settings(3), &clock);

    let app = Router::new()
        .route("/", get(test_handler))
        .layer(from_fn_with_state(RateLimitScope::new(state.clone(), "test"), rate_limit))
        .with_state(state);

    for _ in 0..3 {
        let response = app.clone().oneshot(request("127.0.0.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Next request should be rate limited
    let response = app.clone().oneshot(request("127.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Another client is unaffected
    let response = app.clone().oneshot(request("127.0.0.2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Move past the rate limit window
    clock.advance(Duration::seconds(61));

    let response = app.clone().oneshot(request("127.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_csrf_guard_disabled_by_default() {
    let clock = ManualClock::default();
    let state = test_state(settings(10), &clock);

    let app = Router::new()
        .route("/", get(test_handler))
        .layer(from_fn_with_state(state.clone(), csrf_guard))
        .with_state(state);

    let response = app.oneshot(request("127.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_csrf_guard_consumes_token() {
    let clock = ManualClock::default();
    let state = test_state(
        Settings {
            csrf_protection: true,
            ..settings(10)
        },
        &clock,
    );
    let token = state.csrf.issue().unwrap();

    let app = Router::new()
        .route("/", get(test_handler))
        .layer(from_fn_with_state(state.clone(), csrf_guard))
        .with_state(state);

    let with_token = || {
        Request::builder()
            .uri("/")
            .header(csrf::CSRF_HEADER, token.as_str())
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(request("127.0.0.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.clone().oneshot(with_token()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Replay is refused
    let response = app.clone().oneshot(with_token()).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
