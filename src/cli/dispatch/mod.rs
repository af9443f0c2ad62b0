use crate::cli::{
    actions::{Action, check_db, server},
    commands::{ARG_DSN, ARG_MAX_CONNECTIONS, ARG_PORT, CMD_CHECK_DB},
};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Innermost matches: the subcommand's when one was given, otherwise the root's.
#[must_use]
pub fn active(matches: &clap::ArgMatches) -> &clap::ArgMatches {
    match matches.subcommand() {
        Some((_, sub_m)) => sub_m,
        None => matches,
    }
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let args = active(matches);

    let dsn = args
        .get_one::<String>(ARG_DSN)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --dsn")?;
    let max_connections = args
        .get_one::<u32>(ARG_MAX_CONNECTIONS)
        .copied()
        .unwrap_or(5);

    match matches.subcommand_name() {
        Some(CMD_CHECK_DB) => Ok(Action::CheckDb(check_db::Args { dsn })),
        _ => Ok(Action::Server(server::Args {
            port: args.get_one::<u16>(ARG_PORT).copied().unwrap_or(5555),
            dsn,
            max_connections,
        })),
    }
}
