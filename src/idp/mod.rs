//! Identity-provider integration: the REST client plus the two procedures that
//! span several provider calls (user enrichment and role reconciliation).

pub mod client;
pub mod config;
pub mod enrich;
pub mod error;
pub mod reconcile;
pub mod types;

pub use client::{ProviderClient, RoleScope, UserQuery};
pub use config::ProviderConfig;
pub use enrich::{enrich_users, EnrichFailurePolicy};
pub use error::{IdpError, UpstreamBody};
pub use reconcile::{reconcile_user, RoleSyncStrategy, UserUpdate};
pub use types::{ClientRepresentation, RoleRepresentation, TokenResponse};
