//! Admin proxy for realm users.
//!
//! Every route reads the bearer token from `admin_access_token` and forwards
//! to the provider's admin API. Listing decorates each user with its managed
//! client roles; updates run profile and role reconciliation.

use super::admin_token;
use crate::{
    api::{error::ApiError, state::ConsoleState},
    idp::{enrich_users, reconcile_user, UserQuery, UserUpdate},
};
use axum::{
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    message: String,
}

impl MessageResponse {
    fn new(message: String) -> Json<Self> {
        Json(Self { message })
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserQuery),
    responses(
        (status = 200, description = "Realm users, each with a `clientRoles` map."),
        (status = 400, description = "Managed client not found."),
        (status = 401, description = "No admin access token found."),
    ),
    tag = "users"
)]
#[instrument(skip(state, headers))]
pub async fn list_users(
    state: Extension<Arc<ConsoleState>>,
    headers: HeaderMap,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let token = admin_token(&headers)?;
    let provider = state.provider();

    let users = provider
        .list_users(&token, &query)
        .await
        .map_err(ApiError::provider("Failed to list users"))?;

    let config = state.config();
    let users = enrich_users(
        provider,
        &token,
        users,
        config.enrich_concurrency(),
        config.enrich_failure_policy(),
    )
    .await
    .map_err(ApiError::provider("Failed to load client roles"))?;

    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Provider user id")),
    responses(
        (status = 200, description = "User representation as returned by the provider."),
        (status = 401, description = "No admin access token found."),
    ),
    tag = "users"
)]
#[instrument(skip(state, headers))]
pub async fn get_user(
    state: Extension<Arc<ConsoleState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let token = admin_token(&headers)?;
    state
        .provider()
        .get_user(&token, &id)
        .await
        .map(Json)
        .map_err(ApiError::provider("Failed to get user info"))
}

#[utoipa::path(
    post,
    path = "/api/create-user",
    responses(
        (status = 201, description = "User created."),
        (status = 401, description = "No admin access token found."),
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn create_user(
    state: Extension<Arc<ConsoleState>>,
    headers: HeaderMap,
    Json(user): Json<Value>,
) -> Result<StatusCode, ApiError> {
    let token = admin_token(&headers)?;
    state
        .provider()
        .create_user(&token, &user)
        .await
        .map_err(ApiError::provider("Failed to create user"))?;

    info!("user created");
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    put,
    path = "/api/update-user/{id}",
    params(("id" = String, Path, description = "Provider user id")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Profile and roles updated.", body = MessageResponse),
        (status = 400, description = "Managed client not found."),
        (status = 401, description = "No admin access token found."),
    ),
    tag = "users"
)]
#[instrument(skip(state, headers, update))]
pub async fn update_user(
    state: Extension<Arc<ConsoleState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = admin_token(&headers)?;
    reconcile_user(
        state.provider(),
        &token,
        &id,
        &update,
        state.config().role_sync(),
    )
    .await
    .map_err(ApiError::provider("Failed to update user"))?;

    Ok(MessageResponse::new(format!("User {id} updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/delete-user/{id}",
    params(("id" = String, Path, description = "Provider user id")),
    responses(
        (status = 200, description = "User deleted.", body = MessageResponse),
        (status = 401, description = "No admin access token found."),
    ),
    tag = "users"
)]
#[instrument(skip(state, headers))]
pub async fn delete_user(
    state: Extension<Arc<ConsoleState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = admin_token(&headers)?;
    state
        .provider()
        .delete_user(&token, &id)
        .await
        .map_err(ApiError::provider("Failed to delete user"))?;

    info!("user deleted");
    Ok(MessageResponse::new(format!("User {id} deleted successfully")))
}
