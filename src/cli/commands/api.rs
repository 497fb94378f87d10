use crate::client::config::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_CREDENTIALS_FILE: &str = "credentials-file";

#[derive(Debug, Clone)]
pub struct Options {
    pub url: String,
    pub timeout_secs: u64,
    pub credentials_file: Option<PathBuf>,
}

impl Options {
    /// Parse API connection arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the timeout is zero.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let timeout_secs = matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            anyhow::bail!("--{ARG_TIMEOUT} must be greater than zero");
        }

        // clap passes "" through when the env var is set but empty
        let credentials_file = matches
            .get_one::<String>(ARG_CREDENTIALS_FILE)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            url,
            timeout_secs,
            credentials_file,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Pronoscore API base URL")
                .long_help(
                    "Pronoscore API base URL, without the /api/v1 prefix. Trailing slashes are ignored.",
                )
                .env("PRONOSCORE_API_URL")
                .default_value(DEFAULT_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .long_help(
                    "Request timeout in seconds. The hosted backend can take close to a minute to wake up, so keep this generous.",
                )
                .env("PRONOSCORE_TIMEOUT")
                .default_value("60")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new(ARG_CREDENTIALS_FILE)
                .long(ARG_CREDENTIALS_FILE)
                .help("Where the token pair is stored (default: <config dir>/pronoscore/credentials.json)")
                .env("PRONOSCORE_CREDENTIALS_FILE")
                .global(true),
        )
}
