//! Wire types for the slices of the provider API the console reads.
//!
//! User records are passed through as raw JSON; only roles, clients and token
//! responses are typed because the console has to look inside them.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: SecretString,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRepresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub composite: bool,
    #[serde(default)]
    pub client_role: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

/// Only the fields needed to address a client by its internal id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRepresentation {
    pub id: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[must_use]
pub fn role_names(roles: &[RoleRepresentation]) -> Vec<String> {
    roles.iter().map(|role| role.name.clone()).collect()
}
