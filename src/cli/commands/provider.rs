//! Identity-provider connection arguments.

use crate::idp::{config, ProviderConfig};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use url::Url;

pub const ARG_IDP_URL: &str = "idp-url";
pub const ARG_IDP_REALM: &str = "idp-realm";
pub const ARG_IDP_CLIENT_ID: &str = "idp-client-id";
pub const ARG_IDP_CLIENT_SECRET: &str = "idp-client-secret";
pub const ARG_IDP_ADMIN_CLIENT_ID: &str = "idp-admin-client-id";
pub const ARG_IDP_ADMIN_CLIENT_SECRET: &str = "idp-admin-client-secret";
pub const ARG_MANAGED_CLIENT_ID: &str = "managed-client-id";
pub const ARG_IDP_SCOPE: &str = "idp-scope";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_IDP_URL)
                .long(ARG_IDP_URL)
                .help("Identity provider base URL, e.g. http://localhost:9090")
                .env("REALMDESK_IDP_URL")
                .value_parser(|value: &str| Url::parse(value).map_err(|e| e.to_string()))
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDP_REALM)
                .long(ARG_IDP_REALM)
                .help("Realm administered by the console")
                .env("REALMDESK_IDP_REALM")
                .default_value(config::DEFAULT_REALM),
        )
        .arg(
            Arg::new(ARG_IDP_CLIENT_ID)
                .long(ARG_IDP_CLIENT_ID)
                .help("Public client used for the end-user password grant")
                .env("REALMDESK_IDP_CLIENT_ID")
                .default_value(config::DEFAULT_CLIENT_ID),
        )
        .arg(
            Arg::new(ARG_IDP_CLIENT_SECRET)
                .long(ARG_IDP_CLIENT_SECRET)
                .help("Secret of the public client")
                .env("REALMDESK_IDP_CLIENT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDP_ADMIN_CLIENT_ID)
                .long(ARG_IDP_ADMIN_CLIENT_ID)
                .help("Service-account client used for the client-credentials grant")
                .env("REALMDESK_IDP_ADMIN_CLIENT_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDP_ADMIN_CLIENT_SECRET)
                .long(ARG_IDP_ADMIN_CLIENT_SECRET)
                .help("Secret of the service-account client")
                .env("REALMDESK_IDP_ADMIN_CLIENT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_MANAGED_CLIENT_ID)
                .long(ARG_MANAGED_CLIENT_ID)
                .help("Client whose roles are listed and reconciled (default: --idp-client-id)")
                .env("REALMDESK_MANAGED_CLIENT_ID"),
        )
        .arg(
            Arg::new(ARG_IDP_SCOPE)
                .long(ARG_IDP_SCOPE)
                .help("Scope requested by the password grant")
                .env("REALMDESK_IDP_SCOPE")
                .default_value(config::DEFAULT_SCOPE),
        )
}

/// Build the provider configuration from parsed arguments.
///
/// # Errors
/// Returns an error if a required argument is missing.
pub fn parse(matches: &ArgMatches) -> Result<ProviderConfig> {
    let read_required = |name: &str| -> Result<String> {
        matches
            .get_one::<String>(name)
            .cloned()
            .with_context(|| format!("missing required argument: --{name}"))
    };

    let base_url = matches
        .get_one::<Url>(ARG_IDP_URL)
        .cloned()
        .with_context(|| format!("missing required argument: --{ARG_IDP_URL}"))?;
    let public_client_id = read_required(ARG_IDP_CLIENT_ID)?;
    let managed_client_id = matches
        .get_one::<String>(ARG_MANAGED_CLIENT_ID)
        .cloned()
        .unwrap_or_else(|| public_client_id.clone());

    Ok(ProviderConfig::new(
        base_url,
        SecretString::from(read_required(ARG_IDP_CLIENT_SECRET)?),
        read_required(ARG_IDP_ADMIN_CLIENT_ID)?,
        SecretString::from(read_required(ARG_IDP_ADMIN_CLIENT_SECRET)?),
    )
    .with_realm(read_required(ARG_IDP_REALM)?)
    .with_public_client_id(public_client_id)
    .with_managed_client_id(managed_client_id)
    .with_scope(read_required(ARG_IDP_SCOPE)?))
}
