use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};

pub const ARG_MAX_AGE_MS: &str = "session-max-age-ms";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_MAX_AGE_MS)
                .long("session-max-age-ms")
                .help("Session lifetime in milliseconds, 0 keeps sessions until logout")
                .env("CCTECH_SESSION_MAX_AGE_MS")
                .default_value("600000")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long("cookie-secure")
                .help("Mark the session cookie Secure (HTTPS only)")
                .env("CCTECH_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}

#[derive(Debug)]
pub struct Options {
    pub max_age_ms: u64,
    pub cookie_secure: bool,
}

impl Options {
    /// Read the session flags from parsed matches.
    ///
    /// # Errors
    /// Returns an error if the max-age argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let max_age_ms = matches
            .get_one::<u64>(ARG_MAX_AGE_MS)
            .copied()
            .context("missing required argument: --session-max-age-ms")?;

        Ok(Self {
            max_age_ms,
            cookie_secure: matches.get_flag(ARG_COOKIE_SECURE),
        })
    }
}
