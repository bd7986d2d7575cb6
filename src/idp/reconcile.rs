//! User profile update followed by realm and client role reconciliation.
//!
//! Flow Overview:
//! 1) Write the basic profile; nothing else happens if that fails.
//! 2) Realm roles (when requested): catalog, current mappings, plan, remove, add.
//! 3) Managed client roles (when requested): resolve the client, then the same
//!    sequence against its roles.
//!
//! The provider has no transactional role API, so a failure between the remove
//! and add calls leaves the user with fewer roles than either side intended.
//! With `RoleSyncStrategy::Diff` only the roles that change are removed.

use super::{
    client::{ProviderClient, RoleScope},
    error::IdpError,
    types::{role_names, RoleRepresentation},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, collections::HashSet, fmt, str::FromStr};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleSyncStrategy {
    /// Remove every current role, then add the whole desired set.
    #[default]
    Replace,
    /// Remove only roles no longer desired, add only roles not yet held.
    Diff,
}

impl RoleSyncStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diff => "diff",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for RoleSyncStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleSyncStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "diff" => Ok(Self::Diff),
            "replace" => Ok(Self::Replace),
            other => Err(format!("invalid role sync strategy: {other}")),
        }
    }
}

/// Body of `PUT /api/update-user/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// Basic profile fields, forwarded verbatim.
    #[schema(value_type = Object)]
    pub user: Value,
    /// Desired realm role names; omit to leave realm roles untouched.
    #[serde(default)]
    pub realm_roles: Option<Vec<String>>,
    /// Desired role names keyed by client id; only the managed client is applied.
    #[serde(default)]
    pub client_roles: Option<BTreeMap<String, Vec<String>>>,
}

/// Role mapping changes for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePlan {
    pub remove: Vec<RoleRepresentation>,
    pub add: Vec<RoleRepresentation>,
}

impl RolePlan {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

/// Names of the roles changed per scope, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleChanges {
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl From<&RolePlan> for RoleChanges {
    fn from(plan: &RolePlan) -> Self {
        Self {
            removed: role_names(&plan.remove),
            added: role_names(&plan.add),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub realm: Option<RoleChanges>,
    pub client: Option<RoleChanges>,
}

/// Compute the mapping calls needed to move `current` to `desired`.
///
/// Desired names are matched exactly against `catalog`; names the catalog does
/// not define are dropped. The add list keeps catalog order.
#[must_use]
pub fn plan(
    strategy: RoleSyncStrategy,
    catalog: &[RoleRepresentation],
    desired: &[String],
    current: Vec<RoleRepresentation>,
) -> RolePlan {
    let wanted: HashSet<&str> = desired.iter().map(String::as_str).collect();
    let resolved: Vec<RoleRepresentation> = catalog
        .iter()
        .filter(|role| wanted.contains(role.name.as_str()))
        .cloned()
        .collect();

    match strategy {
        RoleSyncStrategy::Replace => RolePlan {
            remove: current,
            add: resolved,
        },
        RoleSyncStrategy::Diff => {
            let held: HashSet<String> = current.iter().map(|role| role.name.clone()).collect();
            let keep: HashSet<&str> = resolved.iter().map(|role| role.name.as_str()).collect();
            let remove = current
                .into_iter()
                .filter(|role| !keep.contains(role.name.as_str()))
                .collect();
            let add = resolved
                .into_iter()
                .filter(|role| !held.contains(&role.name))
                .collect();
            RolePlan { remove, add }
        }
    }
}

/// Apply a profile update and the requested role changes for one user.
///
/// # Errors
/// Returns the first provider error. Role errors surface after the profile has
/// already been written; nothing is rolled back.
#[instrument(skip(client, token, update))]
pub async fn reconcile_user(
    client: &ProviderClient,
    token: &str,
    user_id: &str,
    update: &UserUpdate,
    strategy: RoleSyncStrategy,
) -> Result<ReconcileReport, IdpError> {
    client.update_user(token, user_id, &update.user).await?;
    debug!("profile updated");

    let report = sync_roles(client, token, user_id, update, strategy)
        .await
        .inspect_err(|err| {
            warn!(error = %err, "role sync failed after profile update; roles may be partially applied");
        })?;

    info!(
        strategy = %strategy,
        realm = ?report.realm,
        client = ?report.client,
        "user reconciled"
    );
    Ok(report)
}

async fn sync_roles(
    client: &ProviderClient,
    token: &str,
    user_id: &str,
    update: &UserUpdate,
    strategy: RoleSyncStrategy,
) -> Result<ReconcileReport, IdpError> {
    let mut report = ReconcileReport::default();

    if let Some(desired) = &update.realm_roles {
        let plan = sync_scope(client, token, user_id, RoleScope::Realm, desired, strategy).await?;
        report.realm = Some(RoleChanges::from(&plan));
    }

    if let Some(client_roles) = &update.client_roles {
        let managed = client.config().managed_client_id();
        for ignored in client_roles.keys().filter(|key| key.as_str() != managed) {
            debug!(client_id = %ignored, "ignoring roles for unmanaged client");
        }
        if let Some(desired) = client_roles.get(managed) {
            let target = client.find_client(token, managed).await?;
            let plan = sync_scope(
                client,
                token,
                user_id,
                RoleScope::Client(&target.id),
                desired,
                strategy,
            )
            .await?;
            report.client = Some(RoleChanges::from(&plan));
        }
    }

    Ok(report)
}

async fn sync_scope(
    client: &ProviderClient,
    token: &str,
    user_id: &str,
    scope: RoleScope<'_>,
    desired: &[String],
    strategy: RoleSyncStrategy,
) -> Result<RolePlan, IdpError> {
    let catalog = client.role_catalog(token, scope).await?;
    let current = client.role_mappings(token, user_id, scope).await?;
    let plan = plan(strategy, &catalog, desired, current);

    if plan.is_noop() {
        debug!(?scope, "role mappings already up to date");
        return Ok(plan);
    }
    if !plan.remove.is_empty() {
        client
            .remove_role_mappings(token, user_id, scope, &plan.remove)
            .await?;
    }
    if !plan.add.is_empty() {
        client
            .add_role_mappings(token, user_id, scope, &plan.add)
            .await?;
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn role(name: &str) -> RoleRepresentation {
        RoleRepresentation {
            id: Some(format!("id-{name}")),
            name: name.to_string(),
            description: None,
            composite: false,
            client_role: false,
            container_id: None,
        }
    }

    fn names(roles: &[RoleRepresentation]) -> Vec<&str> {
        roles.iter().map(|role| role.name.as_str()).collect()
    }

    fn desired(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn replace_removes_everything_and_adds_desired() {
        let catalog = vec![role("r1"), role("r2"), role("r3")];
        let plan = plan(
            RoleSyncStrategy::Replace,
            &catalog,
            &desired(&["r1"]),
            vec![role("r1"), role("r2")],
        );
        assert_eq!(names(&plan.remove), vec!["r1", "r2"]);
        assert_eq!(names(&plan.add), vec!["r1"]);
    }

    #[test]
    fn diff_touches_only_changed_roles() {
        let catalog = vec![role("r1"), role("r2"), role("r3")];
        let plan = plan(
            RoleSyncStrategy::Diff,
            &catalog,
            &desired(&["r1", "r3"]),
            vec![role("r1"), role("r2")],
        );
        assert_eq!(names(&plan.remove), vec!["r2"]);
        assert_eq!(names(&plan.add), vec!["r3"]);
    }

    #[test]
    fn diff_is_noop_when_sets_match() {
        let catalog = vec![role("r1"), role("r2")];
        let plan = plan(
            RoleSyncStrategy::Diff,
            &catalog,
            &desired(&["r2", "r1"]),
            vec![role("r1"), role("r2")],
        );
        assert!(plan.is_noop());
    }

    #[test]
    fn unknown_desired_names_are_dropped() {
        let catalog = vec![role("r1")];
        let plan = plan(
            RoleSyncStrategy::Replace,
            &catalog,
            &desired(&["r1", "ghost"]),
            Vec::new(),
        );
        assert!(plan.remove.is_empty());
        assert_eq!(names(&plan.add), vec!["r1"]);
    }

    #[test]
    fn names_match_exactly() {
        let catalog = vec![role("Admin")];
        let plan = plan(RoleSyncStrategy::Diff, &catalog, &desired(&["admin"]), Vec::new());
        assert!(plan.add.is_empty());
    }

    #[test]
    fn add_list_follows_catalog_order() {
        let catalog = vec![role("a"), role("b"), role("c")];
        let plan = plan(
            RoleSyncStrategy::Replace,
            &catalog,
            &desired(&["c", "a"]),
            Vec::new(),
        );
        assert_eq!(names(&plan.add), vec!["a", "c"]);
    }

    #[test]
    fn default_strategy_replaces_whole_set() {
        let catalog = vec![role("r1"), role("r2")];
        let plan = plan(
            RoleSyncStrategy::default(),
            &catalog,
            &desired(&["r1"]),
            vec![role("r1"), role("r2")],
        );
        assert_eq!(names(&plan.remove), vec!["r1", "r2"]);
        assert_eq!(names(&plan.add), vec!["r1"]);
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Diff".parse::<RoleSyncStrategy>(), Ok(RoleSyncStrategy::Diff));
        assert_eq!(
            " replace ".parse::<RoleSyncStrategy>(),
            Ok(RoleSyncStrategy::Replace)
        );
        assert!("merge".parse::<RoleSyncStrategy>().is_err());
    }

    #[test]
    fn update_body_uses_camel_case_keys() -> Result<(), serde_json::Error> {
        let update: UserUpdate = serde_json::from_value(json!({
            "user": {"firstName": "A"},
            "realmRoles": ["r1"],
            "clientRoles": {"bhs-client": ["x"]}
        }))?;
        assert_eq!(update.user, json!({"firstName": "A"}));
        assert_eq!(update.realm_roles, Some(vec!["r1".to_string()]));
        assert_eq!(
            update
                .client_roles
                .as_ref()
                .and_then(|roles| roles.get("bhs-client"))
                .cloned(),
            Some(vec!["x".to_string()])
        );
        Ok(())
    }
}
