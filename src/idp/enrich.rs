//! Attach managed-client role names to each listed user.
//!
//! One role-mapping lookup per user, at most `concurrency` in flight, results
//! in the order the provider listed the users.

use super::{
    client::{ProviderClient, RoleScope},
    error::IdpError,
    types::role_names,
};
use futures::{stream, StreamExt, TryStreamExt};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};
use tracing::{instrument, warn};

pub const CLIENT_ROLES_FIELD: &str = "clientRoles";
pub const DEGRADED_FIELD: &str = "clientRolesDegraded";

/// What to do when a single user's role lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrichFailurePolicy {
    /// Keep the row with an empty role list and flag it degraded.
    #[default]
    Degrade,
    /// Fail the whole listing.
    Fail,
}

impl EnrichFailurePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Degrade => "degrade",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for EnrichFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrichFailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "fail" => Ok(Self::Fail),
            other => Err(format!("invalid enrichment failure policy: {other}")),
        }
    }
}

/// Resolve the managed client once, then decorate every user.
///
/// # Errors
/// `ClientNotFound` if the managed client is missing; with
/// [`EnrichFailurePolicy::Fail`], the first failed per-user lookup.
#[instrument(skip(client, token, users), fields(users = users.len()))]
pub async fn enrich_users(
    client: &ProviderClient,
    token: &str,
    users: Vec<Value>,
    concurrency: usize,
    policy: EnrichFailurePolicy,
) -> Result<Vec<Value>, IdpError> {
    let managed = client.config().managed_client_id();
    let target = client.find_client(token, managed).await?;

    stream::iter(users)
        .map(|user| enrich_one(client, token, managed, &target.id, user, policy))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

async fn enrich_one(
    client: &ProviderClient,
    token: &str,
    managed: &str,
    client_uuid: &str,
    mut user: Value,
    policy: EnrichFailurePolicy,
) -> Result<Value, IdpError> {
    let lookup = match user.get("id").and_then(Value::as_str) {
        Some(user_id) => {
            client
                .role_mappings(token, user_id, RoleScope::Client(client_uuid))
                .await
        }
        None => Ok(Vec::new()),
    };

    let (roles, degraded) = match lookup {
        Ok(roles) => (role_names(&roles), false),
        Err(err) if policy == EnrichFailurePolicy::Fail => return Err(err),
        Err(err) => {
            warn!(error = %err, "client role lookup failed; listing user without roles");
            (Vec::new(), true)
        }
    };

    if let Value::Object(fields) = &mut user {
        let mut by_client = Map::new();
        by_client.insert(managed.to_string(), Value::from(roles));
        fields.insert(CLIENT_ROLES_FIELD.to_string(), Value::Object(by_client));
        if degraded {
            fields.insert(DEGRADED_FIELD.to_string(), Value::Bool(true));
        }
    }
    Ok(user)
}
