// ============================
// crates/backend-lib/src/cookie.rs
// ============================
//! Session cookie formatting and parsing.
use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

use crate::error::AppError;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "poll_session";

/// `Set-Cookie` value that stores `token` for `max_age_secs`
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue, AppError> {
    format_set_cookie(token, max_age_secs, secure)
}

/// `Set-Cookie` value that makes the browser drop the session cookie
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    // Only static text and an integer go in, so this cannot fail.
    format_set_cookie("", 0, secure).unwrap_or_else(|_| HeaderValue::from_static("poll_session=; Path=/; Max-Age=0"))
}

fn format_set_cookie(value: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue, AppError> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={value}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(format!("invalid cookie header: {e}")))
}

/// Pull the session token out of the request's `Cookie` headers
pub fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc123", 604_800, false).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "poll_session=abc123; Path=/; Max-Age=604800; HttpOnly; SameSite=Lax"
        );

        let secure = session_cookie("abc123", 60, true).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie() {
        let cleared = clear_session_cookie(false);
        assert!(cleared.to_str().unwrap().starts_with("poll_session=; Path=/; Max-Age=0"));
    }

    #[test]
    fn test_parse_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; poll_session=deadbeef; lang=en"));
        assert_eq!(session_from_headers(&headers).as_deref(), Some("deadbeef"));
    }

    #[test]
    fn test_parse_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_from_headers(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("poll_session="));
        assert_eq!(session_from_headers(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("poll_session_old=x"));
        assert_eq!(session_from_headers(&headers), None);
    }

    #[test]
    fn test_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("poll_session=cafe"));
        assert_eq!(session_from_headers(&headers).as_deref(), Some("cafe"));
    }
}
