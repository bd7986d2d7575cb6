use crate::cli::{
    actions::{server::Args, Action},
    commands::{console, provider},
};
use anyhow::Result;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(console::ARG_PORT)
        .copied()
        .unwrap_or(8080);

    Ok(Action::Server(Args {
        port,
        provider: provider::parse(matches)?,
        console: console::parse(matches),
    }))
}
