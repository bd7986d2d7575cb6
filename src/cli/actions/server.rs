use crate::{
    api::{self, ConsoleConfig, ConsoleState},
    idp::{ProviderClient, ProviderConfig},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub provider: ProviderConfig,
    pub console: ConsoleConfig,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let provider = ProviderClient::new(args.provider)?;
    let state = Arc::new(ConsoleState::new(provider, args.console));

    api::new(args.port, state).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("idp_url", args.provider.base_url().to_string()),
        ("realm", args.provider.realm().to_string()),
        ("client_id", args.provider.public_client_id().to_string()),
        ("admin_client_id", args.provider.admin_client_id().to_string()),
        ("managed_client_id", args.provider.managed_client_id().to_string()),
        ("cookie_secure", args.console.cookie_secure().to_string()),
        (
            "enrich_concurrency",
            args.console.enrich_concurrency().to_string(),
        ),
        (
            "enrich_failure_policy",
            args.console.enrich_failure_policy().to_string(),
        ),
        ("role_sync", args.console.role_sync().to_string()),
    ];
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "realmdesk {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
