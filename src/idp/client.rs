//! HTTP client for the provider's token, user-info and admin endpoints.
//!
//! Every call is a single request: no retries, no caching. Bearer tokens are
//! passed in by the caller and never logged.

use super::{
    config::ProviderConfig,
    error::{IdpError, UpstreamBody},
    types::{ClientRepresentation, RoleRepresentation, TokenResponse},
};
use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;
use utoipa::IntoParams;

/// Which role namespace a mapping call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleScope<'a> {
    Realm,
    /// Roles of a client, addressed by its internal id.
    Client(&'a str),
}

/// Paging and search parameters forwarded to the user listing.
#[derive(Debug, Default, Clone, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ProviderClient {
    http: Client,
    config: Arc<ProviderConfig>,
}

impl ProviderClient {
    /// Build a client with the crate user agent.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("Failed to build identity provider HTTP client")?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.config.base_url().clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn realm_endpoint(&self, segments: &[&str]) -> Url {
        let mut full = vec!["realms", self.config.realm()];
        full.extend_from_slice(segments);
        self.endpoint(&full)
    }

    fn admin_endpoint(&self, segments: &[&str]) -> Url {
        let mut full = vec!["admin", "realms", self.config.realm()];
        full.extend_from_slice(segments);
        self.endpoint(&full)
    }

    fn token_endpoint(&self) -> Url {
        self.realm_endpoint(&["protocol", "openid-connect", "token"])
    }

    /// Realm discovery document, used as the provider liveness probe.
    #[must_use]
    pub fn discovery_endpoint(&self) -> Url {
        self.realm_endpoint(&[".well-known", "openid-configuration"])
    }

    fn role_mapping_endpoint(&self, user_id: &str, scope: RoleScope<'_>) -> Url {
        match scope {
            RoleScope::Realm => self.admin_endpoint(&["users", user_id, "role-mappings", "realm"]),
            RoleScope::Client(client_uuid) => self.admin_endpoint(&[
                "users",
                user_id,
                "role-mappings",
                "clients",
                client_uuid,
            ]),
        }
    }

    /// Exchange end-user credentials via the password grant.
    ///
    /// # Errors
    /// `Upstream` when the provider rejects the grant, `Transport` otherwise.
    #[instrument(skip(self, password))]
    pub async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, IdpError> {
        let form = [
            ("grant_type", "password"),
            ("client_id", self.config.public_client_id()),
            ("client_secret", self.config.client_secret().expose_secret()),
            ("username", username),
            ("password", password),
            ("scope", self.config.scope()),
        ];
        let response = self
            .http
            .post(self.token_endpoint())
            .form(&form)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Obtain a service-account token via the client-credentials grant.
    ///
    /// # Errors
    /// `Upstream` when the provider rejects the grant, `Transport` otherwise.
    #[instrument(skip(self))]
    pub async fn client_credentials_grant(&self) -> Result<TokenResponse, IdpError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.admin_client_id()),
            (
                "client_secret",
                self.config.admin_client_secret().expose_secret(),
            ),
        ];
        let response = self
            .http
            .post(self.token_endpoint())
            .form(&form)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Returns `Ok(None)` when the provider answers with no content.
    ///
    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token))]
    pub async fn user_info(&self, token: &str) -> Result<Option<Value>, IdpError> {
        let response = self
            .http
            .get(self.realm_endpoint(&["protocol", "openid-connect", "userinfo"]))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IdpError::Upstream {
                status,
                body: UpstreamBody::from_bytes(&bytes),
            });
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token))]
    pub async fn list_users(&self, token: &str, query: &UserQuery) -> Result<Vec<Value>, IdpError> {
        let response = self
            .http
            .get(self.admin_endpoint(&["users"]))
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token))]
    pub async fn get_user(&self, token: &str, user_id: &str) -> Result<Value, IdpError> {
        let response = self
            .http
            .get(self.admin_endpoint(&["users", user_id]))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token, user))]
    pub async fn create_user(&self, token: &str, user: &Value) -> Result<(), IdpError> {
        let response = self
            .http
            .post(self.admin_endpoint(&["users"]))
            .bearer_auth(token)
            .json(user)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token, user))]
    pub async fn update_user(&self, token: &str, user_id: &str, user: &Value) -> Result<(), IdpError> {
        let response = self
            .http
            .put(self.admin_endpoint(&["users", user_id]))
            .bearer_auth(token)
            .json(user)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token))]
    pub async fn delete_user(&self, token: &str, user_id: &str) -> Result<(), IdpError> {
        let response = self
            .http
            .delete(self.admin_endpoint(&["users", user_id]))
            .bearer_auth(token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Resolve a client's internal id by its public client id; first match wins.
    ///
    /// # Errors
    /// `ClientNotFound` when the search comes back empty.
    #[instrument(skip(self, token))]
    pub async fn find_client(
        &self,
        token: &str,
        client_id: &str,
    ) -> Result<ClientRepresentation, IdpError> {
        let response = self
            .http
            .get(self.admin_endpoint(&["clients"]))
            .query(&[("clientId", client_id)])
            .bearer_auth(token)
            .send()
            .await?;
        let clients: Vec<ClientRepresentation> = check(response).await?.json().await?;
        let client = clients
            .into_iter()
            .next()
            .ok_or_else(|| IdpError::ClientNotFound(client_id.to_string()))?;
        debug!(client_uuid = %client.id, "resolved client");
        Ok(client)
    }

    /// Every role defined in the scope.
    ///
    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token))]
    pub async fn role_catalog(
        &self,
        token: &str,
        scope: RoleScope<'_>,
    ) -> Result<Vec<RoleRepresentation>, IdpError> {
        let url = match scope {
            RoleScope::Realm => self.admin_endpoint(&["roles"]),
            RoleScope::Client(client_uuid) => {
                self.admin_endpoint(&["clients", client_uuid, "roles"])
            }
        };
        let response = self.http.get(url).bearer_auth(token).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Roles currently mapped to the user in the scope.
    ///
    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token))]
    pub async fn role_mappings(
        &self,
        token: &str,
        user_id: &str,
        scope: RoleScope<'_>,
    ) -> Result<Vec<RoleRepresentation>, IdpError> {
        let response = self
            .http
            .get(self.role_mapping_endpoint(user_id, scope))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Bulk-add role mappings in one request.
    ///
    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token, roles), fields(count = roles.len()))]
    pub async fn add_role_mappings(
        &self,
        token: &str,
        user_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> Result<(), IdpError> {
        let response = self
            .http
            .post(self.role_mapping_endpoint(user_id, scope))
            .bearer_auth(token)
            .json(roles)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Bulk-remove role mappings in one request.
    ///
    /// # Errors
    /// Relays non-success responses and transport failures.
    #[instrument(skip(self, token, roles), fields(count = roles.len()))]
    pub async fn remove_role_mappings(
        &self,
        token: &str,
        user_id: &str,
        scope: RoleScope<'_>,
        roles: &[RoleRepresentation],
    ) -> Result<(), IdpError> {
        let response = self
            .http
            .delete(self.role_mapping_endpoint(user_id, scope))
            .bearer_auth(token)
            .json(roles)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Probe the realm discovery document.
    ///
    /// # Errors
    /// Relays non-success responses and transport failures.
    pub async fn ping(&self) -> Result<(), IdpError> {
        let response = self.http.get(self.discovery_endpoint()).send().await?;
        check(response).await?;
        Ok(())
    }
}

async fn check(response: Response) -> Result<Response, IdpError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let bytes = response.bytes().await?;
    debug!(%status, "identity provider rejected request");
    Err(IdpError::Upstream {
        status,
        body: UpstreamBody::from_bytes(&bytes),
    })
}
