use super::admin_token;
use crate::{
    api::{error::ApiError, state::ConsoleState},
    idp::{types::role_names, RoleScope},
};
use axum::{extract::Extension, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientRoles {
    pub client_id: String,
    pub roles: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/client-roles",
    responses(
        (status = 200, description = "Role names defined by the managed client.", body = ClientRoles),
        (status = 400, description = "Managed client not found."),
        (status = 401, description = "No admin access token found."),
    ),
    tag = "roles"
)]
#[instrument(skip(state, headers))]
pub async fn client_roles(
    state: Extension<Arc<ConsoleState>>,
    headers: HeaderMap,
) -> Result<Json<ClientRoles>, ApiError> {
    let token = admin_token(&headers)?;
    let provider = state.provider();
    let managed = provider.config().managed_client_id();

    let client = provider
        .find_client(&token, managed)
        .await
        .map_err(ApiError::provider("Failed to load clients"))?;

    let roles = provider
        .role_catalog(&token, RoleScope::Client(&client.id))
        .await
        .map_err(ApiError::provider("Failed to load client roles"))?;

    Ok(Json(ClientRoles {
        client_id: managed.to_string(),
        roles: role_names(&roles),
    }))
}
