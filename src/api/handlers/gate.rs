//! Session gate in front of every console route.
//!
//! Only the presence of the `user_access_token` cookie is checked; the token
//! itself is never validated here.

use super::cookies::{read_cookie, USER_TOKEN_COOKIE};
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

/// Paths reachable without a session, matched by prefix.
pub const PUBLIC_PATHS: [&str; 3] = ["/login", "/api/user-login", "/api/admin-login"];

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
    Unauthorized,
}

#[must_use]
pub fn decide(path: &str, has_session: bool) -> GateDecision {
    if PUBLIC_PATHS.iter().any(|public| path.starts_with(public)) || has_session {
        GateDecision::Allow
    } else if path.starts_with("/api/") {
        GateDecision::Unauthorized
    } else {
        GateDecision::RedirectToLogin
    }
}

pub async fn session_gate(request: Request, next: Next) -> Response {
    let has_session = read_cookie(request.headers(), USER_TOKEN_COOKIE).is_some();
    let path = request.uri().path();

    match decide(path, has_session) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Unauthorized => {
            debug!(path, "rejecting request without session");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response()
        }
        GateDecision::RedirectToLogin => {
            debug!(path, "redirecting to login");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}
