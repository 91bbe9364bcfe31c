//! Map parsed CLI arguments to the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{gateway, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns a configuration error if the backend URL is unset or any URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let gateway_opts = gateway::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        config: gateway_opts.into_config(),
    }))
}
