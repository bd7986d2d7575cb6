pub mod auth;
pub mod cookies;
pub mod gate;
pub mod health;
pub mod login_page;
pub mod roles;
pub mod users;

pub use self::health::health;

use crate::api::error::ApiError;
use axum::http::HeaderMap;
use cookies::{read_cookie, ADMIN_TOKEN_COOKIE};

// common functions for the handlers

/// Admin bearer token from the `admin_access_token` cookie.
pub(crate) fn admin_token(headers: &HeaderMap) -> Result<String, ApiError> {
    read_cookie(headers, ADMIN_TOKEN_COOKIE)
        .ok_or(ApiError::MissingToken("No admin access token found"))
}
