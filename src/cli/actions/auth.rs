use crate::{
    cli::{actions::fetch::print_json, globals::GlobalArgs},
    features::auth::{
        AuthOutcome, AuthService, BootstrapOutcome, LoginCredentials, LogoutOutcome,
        RegisterRequest,
    },
};
use anyhow::{Result, anyhow, bail};
use secrecy::SecretString;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum Command {
    Login {
        email: String,
        password: SecretString,
    },
    Register {
        email: String,
        username: String,
        password: SecretString,
    },
    Logout,
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: String,
        password: SecretString,
    },
    VerifyEmail {
        token: String,
    },
    WhoAmI,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

/// Execute an account or session command.
/// # Errors
/// Returns an error if the client cannot be built or the operation failed.
pub async fn execute(args: Args) -> Result<()> {
    let service = AuthService::new(args.globals.api_client()?);

    match args.command {
        Command::Login { email, password } => {
            let outcome = service
                .login(&LoginCredentials { email, password })
                .await;
            report(&outcome)?;
            if let Some(user) = service.session().user {
                println!("Signed in as {} <{}>", user.username, user.email);
            }
            Ok(())
        }
        Command::Register {
            email,
            username,
            password,
        } => report(
            &service
                .register(&RegisterRequest {
                    email,
                    username,
                    password,
                })
                .await,
        ),
        Command::Logout => {
            match service.logout().await {
                LogoutOutcome::Revoked => {}
                LogoutOutcome::LocalOnly { reason } => {
                    warn!(error = %reason, "server did not confirm logout");
                }
            }
            println!("Signed out.");
            Ok(())
        }
        Command::ForgotPassword { email } => report(&service.forgot_password(&email).await),
        Command::ResetPassword { token, password } => {
            report(&service.reset_password(&token, &password).await)
        }
        Command::VerifyEmail { token } => report(&service.verify_email(&token).await),
        Command::WhoAmI => match service.check_auth().await {
            BootstrapOutcome::Authenticated(user) => print_json(&user),
            BootstrapOutcome::Anonymous => bail!("Not signed in. Run `pronoscore login`."),
            BootstrapOutcome::Downgraded { reason } => {
                debug!(error = %reason, "stored session no longer valid");
                bail!("Session expired. Run `pronoscore login`.")
            }
        },
    }
}

fn report(outcome: &AuthOutcome) -> Result<()> {
    match outcome {
        AuthOutcome::Success { message } => {
            if let Some(message) = message {
                println!("{message}");
            }
            Ok(())
        }
        AuthOutcome::Failure { error } => Err(anyhow!("{error}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_outcome_becomes_error() {
        let outcome = AuthOutcome::Failure {
            error: "Invalid credentials".to_string(),
        };
        let err = report(&outcome).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn success_outcome_is_ok() {
        let outcome = AuthOutcome::Success { message: None };
        assert!(report(&outcome).is_ok());
    }
}
