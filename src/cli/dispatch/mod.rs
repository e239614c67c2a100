//! Map parsed arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::session;
use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or the DSN is not a URL.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(3000);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    // Fail early on malformed DSNs instead of at pool connect time.
    Url::parse(&dsn).context("invalid CCTECH_DSN")?;

    let client_dir = matches
        .get_one::<String>("client-dir")
        .map(PathBuf::from)
        .context("missing required argument: --client-dir")?;

    let session_opts = session::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        client_dir,
        session_max_age_ms: session_opts.max_age_ms,
        cookie_secure: session_opts.cookie_secure,
    }))
}
