use crate::{
    api::ConsoleConfig,
    idp::{EnrichFailurePolicy, RoleSyncStrategy},
};
use clap::{builder::ValueParser, Arg, ArgAction, ArgMatches, Command};
use std::str::FromStr;

pub const ARG_PORT: &str = "port";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_ENRICH_CONCURRENCY: &str = "enrich-concurrency";
pub const ARG_ENRICH_FAILURE_POLICY: &str = "enrich-failure-policy";
pub const ARG_ROLE_SYNC: &str = "role-sync";

fn positive_usize() -> ValueParser {
    ValueParser::from(|value: &str| -> Result<usize, String> {
        match value.parse::<usize>() {
            Ok(parsed) if parsed >= 1 => Ok(parsed),
            _ => Err("must be an integer >= 1".to_string()),
        }
    })
}

fn parsed<T>() -> ValueParser
where
    T: FromStr<Err = String> + Clone + Send + Sync + 'static,
{
    ValueParser::from(|value: &str| value.parse::<T>())
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("REALMDESK_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark token cookies Secure (serve over HTTPS)")
                .env("REALMDESK_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_ENRICH_CONCURRENCY)
                .long(ARG_ENRICH_CONCURRENCY)
                .help("Maximum concurrent role lookups when listing users")
                .env("REALMDESK_ENRICH_CONCURRENCY")
                .default_value("8")
                .value_parser(positive_usize()),
        )
        .arg(
            Arg::new(ARG_ENRICH_FAILURE_POLICY)
                .long(ARG_ENRICH_FAILURE_POLICY)
                .help("On a failed role lookup: degrade (empty roles) or fail the listing")
                .env("REALMDESK_ENRICH_FAILURE_POLICY")
                .default_value("degrade")
                .value_parser(parsed::<EnrichFailurePolicy>()),
        )
        .arg(
            Arg::new(ARG_ROLE_SYNC)
                .long(ARG_ROLE_SYNC)
                .help("Role reconciliation: replace (remove all, add desired) or diff (changed roles only)")
                .env("REALMDESK_ROLE_SYNC")
                .default_value("replace")
                .value_parser(parsed::<RoleSyncStrategy>()),
        )
}

#[must_use]
pub fn parse(matches: &ArgMatches) -> ConsoleConfig {
    ConsoleConfig::new()
        .with_cookie_secure(matches.get_flag(ARG_COOKIE_SECURE))
        .with_enrich_concurrency(
            matches
                .get_one::<usize>(ARG_ENRICH_CONCURRENCY)
                .copied()
                .unwrap_or(crate::api::state::DEFAULT_ENRICH_CONCURRENCY),
        )
        .with_enrich_failure_policy(
            matches
                .get_one::<EnrichFailurePolicy>(ARG_ENRICH_FAILURE_POLICY)
                .copied()
                .unwrap_or_default(),
        )
        .with_role_sync(
            matches
                .get_one::<RoleSyncStrategy>(ARG_ROLE_SYNC)
                .copied()
                .unwrap_or_default(),
        )
}
