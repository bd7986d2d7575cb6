//! # Realmdesk (identity-provider administration console)
//!
//! `realmdesk` serves the HTTP surface of a small administration console and
//! forwards every operation to an external OpenID Connect identity provider.
//! Users, roles and tokens all live in the provider; this service keeps no
//! state between requests beyond the bearer tokens carried in cookies.
//!
//! ## Session Gate
//!
//! Every console request passes a path-based gate. A fixed allow-list (the
//! login page and both login endpoints) is always reachable; everything else
//! requires the `user_access_token` cookie. API paths without it get `401`,
//! page paths are redirected to `/login`.
//!
//! ## Credential Exchange
//!
//! - **End users** exchange a username and password for a token via the
//!   provider's password grant; the token lands in `user_access_token`.
//! - **Administrators** obtain a service-account token via the
//!   client-credentials grant; it lands in `admin_access_token` for one hour.
//!
//! ## Admin Proxy
//!
//! User CRUD, client role listing and role reconciliation attach the admin
//! token and relay the provider's answer. Role reconciliation replaces the
//! current role set wholesale; `--role-sync diff` touches only the roles that
//! change.

pub mod api;
pub mod cli;
pub mod idp;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
