//! # Pronoscore (session-aware API client)
//!
//! `pronoscore` talks to the Pronoscore football prediction API: match listings,
//! results, league standings, odds and the three "family logic" predictions
//! (Papa, Grand Frère, Ma Logique). All analytics live server-side; this crate
//! owns the client half of authentication and the typed calls on top of it.
//!
//! ## Session lifecycle
//!
//! - **Credential persistence:** an access/refresh token pair stored under fixed
//!   keys (`access_token`, `refresh_token`). A dangling single token counts as
//!   logged out.
//! - **HTTP wrapper:** every authenticated call carries `Authorization: Bearer`.
//!   A `401` triggers exactly one refresh through `POST /auth/refresh` and one
//!   resend. If the refresh cannot happen, both tokens are cleared and the
//!   session store broadcasts `SessionEvent::LoginRequired`.
//! - **Lifecycle operations:** `check_auth`, `login`, `register`, `logout`,
//!   `forgot_password`, `reset_password`, `verify_email`. They never return
//!   `Err`; expected failures come back as typed outcomes so silent downgrades
//!   (bootstrap, logout) are visible in the type system.
//!
//! Token values are held in `secrecy::SecretString` and must never be logged.

pub mod cli;
pub mod client;
pub mod features;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

pub use client::{
    ApiClient, ApiError, ClientConfig, CredentialPair, CredentialStore, FileCredentialStore,
    MemoryCredentialStore, StorageError, StoredCredentials,
};
pub use features::auth::{
    AuthOutcome, AuthService, BootstrapOutcome, LoginCredentials, LogoutOutcome,
    RegisterRequest, Session, SessionEvent, SessionStore, User,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
