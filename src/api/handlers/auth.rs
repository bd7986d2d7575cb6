//! Credential exchange endpoints.
//!
//! Flow Overview:
//! 1) `user-login`: password grant with the public client, token stored in
//!    `user_access_token` for `expires_in` seconds.
//! 2) `admin-login`: client-credentials grant with the service account, token
//!    stored in `admin_access_token` for one hour.
//! 3) `user-logout` clears both cookies; `user-info` relays the provider's
//!    user-info document for the session token.
//!
//! Raw tokens only ever travel in `HttpOnly` cookies, never in response bodies.

use super::cookies::{
    clear_cookie, read_cookie, token_cookie, ADMIN_TOKEN_COOKIE, ADMIN_TOKEN_TTL_SECONDS,
    USER_TOKEN_COOKIE,
};
use crate::{
    api::{error::ApiError, state::ConsoleState},
    idp::{IdpError, TokenResponse},
};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, sync::Arc};
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    username: String,
    password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Grant metadata returned after a successful user login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    token_type: Option<String>,
    expires_in: Option<u64>,
    scope: Option<String>,
}

impl From<&TokenResponse> for LoginResponse {
    fn from(token: &TokenResponse) -> Self {
        Self {
            token_type: token.token_type.clone(),
            expires_in: token.expires_in,
            scope: token.scope.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLoginResponse {
    message: String,
    expires_in: u64,
}

#[utoipa::path(
    post,
    path = "/api/user-login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set.", body = LoginResponse),
        (status = 401, description = "Credentials rejected by the identity provider."),
        (status = 500, description = "Identity provider unreachable."),
    ),
    tag = "auth"
)]
#[instrument(skip_all, fields(username = %request.username))]
pub async fn user_login(
    state: Extension<Arc<ConsoleState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .provider()
        .password_grant(&request.username, &request.password)
        .await
        .map_err(|err| match err {
            IdpError::Upstream { body, .. } => ApiError::Unauthorized(
                body.field("error_description")
                    .unwrap_or("Invalid credentials")
                    .to_string(),
            ),
            other => ApiError::provider("Failed to authenticate user")(other),
        })?;

    let cookie = token_cookie(
        USER_TOKEN_COOKIE,
        token.access_token.expose_secret(),
        token.expires_in,
        state.config().cookie_secure(),
    );
    info!("user signed in");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse::from(&token)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin-login",
    responses(
        (status = 200, description = "Admin token stored in a cookie.", body = AdminLoginResponse),
        (status = 401, description = "Service account rejected; provider payload relayed."),
        (status = 500, description = "Identity provider unreachable."),
    ),
    tag = "auth"
)]
#[instrument(skip(state))]
pub async fn admin_login(
    state: Extension<Arc<ConsoleState>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .provider()
        .client_credentials_grant()
        .await
        .map_err(|err| match err {
            IdpError::Upstream { body, .. } => ApiError::GrantRejected(body),
            other => ApiError::provider("Failed to get admin token")(other),
        })?;

    let cookie = token_cookie(
        ADMIN_TOKEN_COOKIE,
        token.access_token.expose_secret(),
        Some(ADMIN_TOKEN_TTL_SECONDS),
        state.config().cookie_secure(),
    );
    info!("admin token issued");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AdminLoginResponse {
            message: "Admin token stored".to_string(),
            expires_in: ADMIN_TOKEN_TTL_SECONDS,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/user-logout",
    responses(
        (status = 204, description = "Session and admin cookies cleared."),
    ),
    tag = "auth"
)]
pub async fn user_logout(state: Extension<Arc<ConsoleState>>) -> impl IntoResponse {
    let secure = state.config().cookie_secure();
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (SET_COOKIE, clear_cookie(USER_TOKEN_COOKIE, secure)),
            (SET_COOKIE, clear_cookie(ADMIN_TOKEN_COOKIE, secure)),
        ]),
    )
}

#[utoipa::path(
    get,
    path = "/api/user-info",
    responses(
        (status = 200, description = "Profile of the signed-in user."),
        (status = 401, description = "No session cookie."),
        (status = 404, description = "Provider returned no user info."),
    ),
    tag = "auth"
)]
#[instrument(skip(state, headers))]
pub async fn user_info(
    state: Extension<Arc<ConsoleState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let token = read_cookie(&headers, USER_TOKEN_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    state
        .provider()
        .user_info(&token)
        .await
        .map_err(ApiError::provider("Failed to fetch user profile"))?
        .map(Json)
        .ok_or(ApiError::NotFound("No user info returned"))
}
