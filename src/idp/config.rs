//! Identity-provider connection settings, built once at startup.

use secrecy::SecretString;
use url::Url;

pub const DEFAULT_REALM: &str = "bhs-realm";
pub const DEFAULT_CLIENT_ID: &str = "bhs-client";
pub const DEFAULT_SCOPE: &str = "openid profile email";

#[derive(Clone)]
pub struct ProviderConfig {
    base_url: Url,
    realm: String,
    public_client_id: String,
    client_secret: SecretString,
    admin_client_id: String,
    admin_client_secret: SecretString,
    managed_client_id: String,
    scope: String,
}

impl ProviderConfig {
    /// The managed client defaults to the public client; override it with
    /// [`ProviderConfig::with_managed_client_id`].
    #[must_use]
    pub fn new(
        base_url: Url,
        client_secret: SecretString,
        admin_client_id: String,
        admin_client_secret: SecretString,
    ) -> Self {
        Self {
            base_url,
            realm: DEFAULT_REALM.to_string(),
            public_client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret,
            admin_client_id,
            admin_client_secret,
            managed_client_id: DEFAULT_CLIENT_ID.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    #[must_use]
    pub fn with_realm(mut self, realm: String) -> Self {
        self.realm = realm;
        self
    }

    #[must_use]
    pub fn with_public_client_id(mut self, client_id: String) -> Self {
        self.public_client_id = client_id;
        self
    }

    #[must_use]
    pub fn with_managed_client_id(mut self, client_id: String) -> Self {
        self.managed_client_id = client_id;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: String) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    #[must_use]
    pub fn public_client_id(&self) -> &str {
        &self.public_client_id
    }

    #[must_use]
    pub fn admin_client_id(&self) -> &str {
        &self.admin_client_id
    }

    #[must_use]
    pub fn managed_client_id(&self) -> &str {
        &self.managed_client_id
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub(crate) fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    pub(crate) fn admin_client_secret(&self) -> &SecretString {
        &self.admin_client_secret
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url.as_str())
            .field("realm", &self.realm)
            .field("public_client_id", &self.public_client_id)
            .field("client_secret", &"***")
            .field("admin_client_id", &self.admin_client_id)
            .field("admin_client_secret", &"***")
            .field("managed_client_id", &self.managed_client_id)
            .field("scope", &self.scope)
            .finish()
    }
}
