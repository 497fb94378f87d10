//! Maps parsed CLI matches to an `Action`.

use crate::cli::{
    actions::{Action, auth, fetch},
    commands::{api, auth as auth_cmd, data},
    globals::GlobalArgs,
};
use crate::features::{matches::MatchFilter, odds::BetType};
use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use secrecy::SecretString;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let api_opts = api::Options::parse(matches)?;
    let globals = GlobalArgs::new(
        api_opts.url,
        api_opts.timeout_secs,
        api_opts.credentials_file,
    );

    let Some((name, sub)) = matches.subcommand() else {
        bail!("missing subcommand, see --help");
    };

    if let Some(command) = auth_command(name, sub)? {
        return Ok(Action::Auth(auth::Args { globals, command }));
    }

    let query = fetch_query(name, sub)?;
    Ok(Action::Fetch(fetch::Args { globals, query }))
}

fn required_string(sub: &ArgMatches, id: &str) -> Result<String> {
    sub.get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn required_match_id(sub: &ArgMatches) -> Result<i64> {
    sub.get_one::<i64>(data::ARG_MATCH_ID)
        .copied()
        .context("missing required argument: <match-id>")
}

fn auth_command(name: &str, sub: &ArgMatches) -> Result<Option<auth::Command>> {
    let secret = |id: &str| required_string(sub, id).map(SecretString::from);

    let command = match name {
        auth_cmd::CMD_LOGIN => auth::Command::Login {
            email: required_string(sub, auth_cmd::ARG_EMAIL)?,
            password: secret(auth_cmd::ARG_PASSWORD)?,
        },
        auth_cmd::CMD_REGISTER => auth::Command::Register {
            email: required_string(sub, auth_cmd::ARG_EMAIL)?,
            username: required_string(sub, auth_cmd::ARG_USERNAME)?,
            password: secret(auth_cmd::ARG_PASSWORD)?,
        },
        auth_cmd::CMD_LOGOUT => auth::Command::Logout,
        auth_cmd::CMD_FORGOT_PASSWORD => auth::Command::ForgotPassword {
            email: required_string(sub, auth_cmd::ARG_EMAIL)?,
        },
        auth_cmd::CMD_RESET_PASSWORD => auth::Command::ResetPassword {
            token: required_string(sub, auth_cmd::ARG_TOKEN)?,
            password: secret(auth_cmd::ARG_PASSWORD)?,
        },
        auth_cmd::CMD_VERIFY_EMAIL => auth::Command::VerifyEmail {
            token: required_string(sub, auth_cmd::ARG_TOKEN)?,
        },
        auth_cmd::CMD_WHOAMI => auth::Command::WhoAmI,
        _ => return Ok(None),
    };

    Ok(Some(command))
}

fn fetch_query(name: &str, sub: &ArgMatches) -> Result<fetch::Query> {
    let query = match name {
        data::CMD_MATCHES => fetch::Query::Upcoming(MatchFilter {
            competition: sub
                .get_one::<String>(data::ARG_COMPETITION)
                .cloned()
                .filter(|code| !code.trim().is_empty()),
            limit: sub
                .get_one::<u32>(data::ARG_LIMIT)
                .copied()
                .unwrap_or_default(),
        }),
        data::CMD_TODAY => fetch::Query::Today,
        data::CMD_MATCH => fetch::Query::Match(required_match_id(sub)?),
        data::CMD_PREDICTION => fetch::Query::Prediction(required_match_id(sub)?),
        data::CMD_REPORT => fetch::Query::Report(required_match_id(sub)?),
        data::CMD_STANDINGS => {
            fetch::Query::Standings(required_string(sub, data::ARG_COMPETITION)?)
        }
        data::CMD_COMPETITIONS => fetch::Query::Competitions,
        data::CMD_ODDS => fetch::Query::Odds {
            match_id: required_match_id(sub)?,
            refresh: sub.get_flag(data::ARG_REFRESH),
        },
        data::CMD_VALUE_BET => fetch::Query::ValueBet {
            match_id: required_match_id(sub)?,
            bet: sub
                .get_one::<BetType>(data::ARG_BET)
                .copied()
                .context("missing required argument: --bet")?,
        },
        data::CMD_HEALTH => fetch::Query::Health,
        other => bail!("unknown subcommand: {other}"),
    };

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn dispatch(args: &[&str]) -> Result<Action> {
        let matches = commands::new().try_get_matches_from(args)?;
        handler(&matches)
    }

    #[test]
    fn login_maps_to_auth_action() -> Result<()> {
        temp_env::with_vars(
            [
                ("PRONOSCORE_PASSWORD", None::<&str>),
                ("PRONOSCORE_EMAIL", None::<&str>),
                ("PRONOSCORE_CREDENTIALS_FILE", None::<&str>),
            ],
            || {
                let action = dispatch(&[
                    "pronoscore",
                    "login",
                    "--email",
                    "fan@pronoscore.app",
                    "--password",
                    "hunter2",
                    "--api-url",
                    "https://api.pronoscore.app",
                ])?;

                let Action::Auth(args) = action else {
                    bail!("expected an auth action");
                };
                assert_eq!(args.globals.api_url, "https://api.pronoscore.app");
                let auth::Command::Login { email, password } = args.command else {
                    bail!("expected login");
                };
                assert_eq!(email, "fan@pronoscore.app");
                assert_eq!(password.expose_secret(), "hunter2");
                Ok(())
            },
        )
    }

    #[test]
    fn matches_maps_filter() -> Result<()> {
        let action = dispatch(&["pronoscore", "matches", "--competition", "fl1", "-l", "50"])?;
        let Action::Fetch(args) = action else {
            bail!("expected a fetch action");
        };
        let fetch::Query::Upcoming(filter) = args.query else {
            bail!("expected upcoming matches");
        };
        assert_eq!(filter.competition.as_deref(), Some("fl1"));
        assert_eq!(filter.limit, 50);
        Ok(())
    }

    #[test]
    fn odds_refresh_flag() -> Result<()> {
        let action = dispatch(&["pronoscore", "odds", "7", "--refresh"])?;
        let Action::Fetch(args) = action else {
            bail!("expected a fetch action");
        };
        assert!(matches!(
            args.query,
            fetch::Query::Odds {
                match_id: 7,
                refresh: true
            }
        ));
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = dispatch(&["pronoscore", "health", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_credentials_file_env_is_ignored() -> Result<()> {
        temp_env::with_vars([("PRONOSCORE_CREDENTIALS_FILE", Some(""))], || {
            let action = dispatch(&["pronoscore", "whoami"])?;
            let Action::Auth(args) = action else {
                bail!("expected an auth action");
            };
            assert_eq!(args.globals.credentials_file, None);
            assert!(matches!(args.command, auth::Command::WhoAmI));
            Ok(())
        })
    }
}
