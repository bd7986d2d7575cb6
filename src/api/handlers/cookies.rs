//! Token cookies written after a successful grant and read by the gate and
//! the admin proxy.

use axum::http::{header::COOKIE, HeaderMap};

pub const USER_TOKEN_COOKIE: &str = "user_access_token";
pub const ADMIN_TOKEN_COOKIE: &str = "admin_access_token";

/// Service-account tokens are stored for one hour regardless of the grant.
pub const ADMIN_TOKEN_TTL_SECONDS: u64 = 3600;

/// Build a `Set-Cookie` value. `max_age = None` yields a session cookie.
#[must_use]
pub fn token_cookie(name: &str, token: &str, max_age: Option<u64>, secure: bool) -> String {
    let mut cookie = format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[must_use]
pub fn clear_cookie(name: &str, secure: bool) -> String {
    token_cookie(name, "", Some(0), secure)
}

/// Find a cookie value across every `Cookie` header. Empty values count as absent.
#[must_use]
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
