//! Account and session subcommands.

use clap::{Arg, Command, builder::ValueParser};
use regex::Regex;

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";
pub const CMD_VERIFY_EMAIL: &str = "verify-email";
pub const CMD_WHOAMI: &str = "whoami";

pub const ARG_EMAIL: &str = "email";
pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_TOKEN: &str = "token";

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

#[must_use]
pub fn validator_email() -> ValueParser {
    ValueParser::from(move |email: &str| -> std::result::Result<String, String> {
        let email = email.trim();
        if valid_email(email) {
            Ok(email.to_string())
        } else {
            Err("invalid email address".to_string())
        }
    })
}

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Account email address")
        .env("PRONOSCORE_EMAIL")
        .required(true)
        .value_parser(validator_email())
}

fn password_arg(help: &'static str) -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long(ARG_PASSWORD)
        .help(help)
        .env("PRONOSCORE_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn token_arg(help: &'static str) -> Arg {
    Arg::new(ARG_TOKEN)
        .long(ARG_TOKEN)
        .help(help)
        .required(true)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in and store the token pair")
                .arg(email_arg())
                .arg(password_arg("Account password")),
        )
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account; the email must be verified before signing in")
                .arg(email_arg())
                .arg(
                    Arg::new(ARG_USERNAME)
                        .short('u')
                        .long(ARG_USERNAME)
                        .help("Public username")
                        .required(true),
                )
                .arg(password_arg("Account password")),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Revoke the session and forget local tokens"))
        .subcommand(
            Command::new(CMD_FORGOT_PASSWORD)
                .about("Send a password reset email")
                .arg(email_arg()),
        )
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Set a new password with the token from the reset email")
                .arg(token_arg("Reset token from the email link"))
                .arg(password_arg("New password")),
        )
        .subcommand(
            Command::new(CMD_VERIFY_EMAIL)
                .about("Confirm an email address with the token from the verification email")
                .arg(token_arg("Verification token from the email link")),
        )
        .subcommand(Command::new(CMD_WHOAMI).about("Validate the stored session and show the user"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(valid_email("fan@pronoscore.app"));
        assert!(!valid_email("fan@pronoscore"));
        assert!(!valid_email("fan pronoscore.app"));
        assert!(!valid_email(""));
    }
}
