//! Session lifecycle operations.
//!
//! Every operation follows the same shape: mark the session as loading, run the
//! network calls, then either record the identity or record an error. Nothing
//! here returns `Err`: expected failures come back as outcomes, and the two
//! deliberately silent paths are their own variants (`BootstrapOutcome::Downgraded`
//! and `LogoutOutcome::LocalOnly`).

use crate::{
    client::{ApiClient, ApiError, CredentialPair},
    features::auth::{
        state::{Session, SessionEvent, SessionStore},
        types::{
            EmailRequest, LoginCredentials, RegisterRequest, ResetPasswordRequest, TokenPairResponse,
            TokenRequest, User,
        },
    },
};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

const LOGIN_FALLBACK: &str = "Erreur de connexion";
const REGISTER_FALLBACK: &str = "Erreur lors de l'inscription";
const FORGOT_FALLBACK: &str = "Erreur lors de l'envoi";
const RESET_FALLBACK: &str = "Erreur lors de la réinitialisation";
const VERIFY_FALLBACK: &str = "Erreur lors de la vérification";

const REGISTER_MESSAGE: &str = "Compte créé ! Vérifiez votre email.";
const FORGOT_MESSAGE: &str = "Email de réinitialisation envoyé !";
const RESET_MESSAGE: &str = "Mot de passe réinitialisé !";
const VERIFY_MESSAGE: &str = "Email vérifié !";

/// Result of a user-facing lifecycle operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Success { message: Option<String> },
    Failure { error: String },
}

impl AuthOutcome {
    fn success() -> Self {
        Self::Success { message: None }
    }

    fn success_with(message: &str) -> Self {
        Self::Success {
            message: Some(message.to_string()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message } => message.as_deref(),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success { .. } => None,
        }
    }
}

/// Result of the startup check.
#[derive(Debug)]
pub enum BootstrapOutcome {
    /// No usable credentials; nothing was sent.
    Anonymous,
    Authenticated(User),
    /// Stored credentials did not validate. They were cleared and the session is
    /// logged out without a user-visible error.
    Downgraded { reason: ApiError },
}

/// Result of logout. Local state is cleared in both cases.
#[derive(Debug)]
pub enum LogoutOutcome {
    Revoked,
    /// The server-side invalidation failed and was ignored.
    LocalOnly { reason: ApiError },
}

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.store().snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.store().subscribe()
    }

    pub fn clear_error(&self) {
        self.store().clear_error();
    }

    /// Validates persisted credentials against `/auth/me`.
    #[instrument(skip(self))]
    pub async fn check_auth(&self) -> BootstrapOutcome {
        let store = self.store();
        store.begin();

        let stored = match self.api.credentials().load() {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "failed to read stored credentials");
                self.clear_credentials();
                store.sign_out();
                return BootstrapOutcome::Downgraded { reason: err.into() };
            }
        };

        if stored.is_dangling() {
            warn!("dangling credential found at startup, clearing");
            self.clear_credentials();
            store.sign_out();
            return BootstrapOutcome::Anonymous;
        }

        if !stored.is_complete() {
            debug!("no stored session");
            store.sign_out();
            return BootstrapOutcome::Anonymous;
        }

        match self.api.get_json::<User>("/auth/me").await {
            Ok(user) => {
                info!(user_id = user.id, "session restored");
                store.authenticate(user.clone());
                BootstrapOutcome::Authenticated(user)
            }
            Err(reason) => {
                debug!(error = %reason, "stored session rejected, downgrading to anonymous");
                self.clear_credentials();
                store.sign_out();
                BootstrapOutcome::Downgraded { reason }
            }
        }
    }

    /// Exchanges credentials for a token pair and loads the identity. Tokens are
    /// persisted only once the identity fetch succeeded.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &LoginCredentials) -> AuthOutcome {
        self.store().begin();

        match self.try_login(credentials).await {
            Ok(user) => {
                info!(user_id = user.id, "login succeeded");
                self.store().authenticate(user);
                AuthOutcome::success()
            }
            Err(err) => self.failed(&err, LOGIN_FALLBACK),
        }
    }

    async fn try_login(&self, credentials: &LoginCredentials) -> Result<User, ApiError> {
        let tokens: TokenPairResponse = self
            .api
            .post_public_json("/auth/login", &credentials.payload())
            .await?;
        let pair = CredentialPair::new(tokens.access_token, tokens.refresh_token);

        let user: User = self
            .api
            .get_json_with_token("/auth/me", &pair.access_token)
            .await?;

        self.api.credentials().save(&pair)?;
        Ok(user)
    }

    /// Creates an account. Does not sign in: the address has to be verified first.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> AuthOutcome {
        self.store().begin();

        match self
            .api
            .post_public_empty("/auth/register", &request.payload())
            .await
        {
            Ok(()) => {
                info!("account created");
                self.store().finish();
                AuthOutcome::success_with(REGISTER_MESSAGE)
            }
            Err(err) => self.failed(&err, REGISTER_FALLBACK),
        }
    }

    /// Best-effort server-side invalidation, then an unconditional local reset.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> LogoutOutcome {
        self.store().begin();

        let outcome = match self.api.post_empty_unguarded("/auth/logout").await {
            Ok(()) => LogoutOutcome::Revoked,
            Err(reason) => {
                debug!(error = %reason, "server-side logout failed, clearing locally");
                LogoutOutcome::LocalOnly { reason }
            }
        };

        self.clear_credentials();
        self.store().sign_out();
        outcome
    }

    #[instrument(skip_all)]
    pub async fn forgot_password(&self, email: &str) -> AuthOutcome {
        self.store().begin();

        match self
            .api
            .post_public_empty("/auth/forgot-password", &EmailRequest { email })
            .await
        {
            Ok(()) => {
                self.store().finish();
                AuthOutcome::success_with(FORGOT_MESSAGE)
            }
            Err(err) => self.failed(&err, FORGOT_FALLBACK),
        }
    }

    /// Sets a new password using the token from the reset email.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, new_password: &SecretString) -> AuthOutcome {
        self.store().begin();

        let body = ResetPasswordRequest {
            token,
            new_password: new_password.expose_secret(),
        };
        match self.api.post_public_empty("/auth/reset-password", &body).await {
            Ok(()) => {
                self.store().finish();
                AuthOutcome::success_with(RESET_MESSAGE)
            }
            Err(err) => self.failed(&err, RESET_FALLBACK),
        }
    }

    #[instrument(skip_all)]
    pub async fn verify_email(&self, token: &str) -> AuthOutcome {
        self.store().begin();

        match self
            .api
            .post_public_empty("/auth/verify-email", &TokenRequest { token })
            .await
        {
            Ok(()) => {
                self.store().finish();
                AuthOutcome::success_with(VERIFY_MESSAGE)
            }
            Err(err) => self.failed(&err, VERIFY_FALLBACK),
        }
    }

    fn store(&self) -> &SessionStore {
        self.api.session()
    }

    fn failed(&self, err: &ApiError, fallback: &str) -> AuthOutcome {
        warn!(error = %err, "auth operation failed");
        let message = err.user_message(fallback);
        self.store().fail(message.clone());
        AuthOutcome::Failure { error: message }
    }

    fn clear_credentials(&self) {
        if let Err(err) = self.api.credentials().clear() {
            error!(error = %err, "failed to clear stored credentials");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::{ClientConfig, CredentialStore, MemoryCredentialStore};
    use anyhow::{Result, bail};
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn service_for(server: &MockServer, store: Arc<MemoryCredentialStore>) -> AuthService {
        let config = ClientConfig::new(&server.uri(), 5).unwrap();
        let api = ApiClient::new(config, store, SessionStore::new()).unwrap();
        AuthService::new(api)
    }

    #[test]
    fn outcome_accessors() {
        let ok = AuthOutcome::success_with(REGISTER_MESSAGE);
        assert!(ok.is_success());
        assert_eq!(ok.message(), Some(REGISTER_MESSAGE));
        assert_eq!(ok.error(), None);

        let failed = AuthOutcome::Failure {
            error: "nope".to_string(),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.error(), Some("nope"));
        assert_eq!(failed.message(), None);
    }

    #[tokio::test]
    async fn dangling_credentials_are_cleared_without_network() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let store = Arc::new(MemoryCredentialStore::new());
        store.save_access_token(&SecretString::from("orphan".to_string()))?;
        let service = service_for(&server, store.clone());

        let outcome = service.check_auth().await;

        assert!(matches!(outcome, BootstrapOutcome::Anonymous));
        assert!(store.load()?.is_empty());
        assert!(!service.session().is_loading);
        let Some(requests) = server.received_requests().await else {
            bail!("wiremock request recording is disabled");
        };
        assert!(requests.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn register_does_not_sign_in() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .and(body_json(json!({
                "email": "new@pronoscore.app",
                "username": "newbie",
                "password": "s3cret-pass"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 3,
                "email": "new@pronoscore.app",
                "username": "newbie"
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new());
        let service = service_for(&server, store.clone());
        let outcome = service
            .register(&RegisterRequest::new(
                "new@pronoscore.app",
                "newbie",
                "s3cret-pass",
            ))
            .await;

        assert_eq!(outcome.message(), Some(REGISTER_MESSAGE));
        let session = service.session();
        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        assert!(store.load()?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn register_surfaces_server_detail() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "Email déjà utilisé"
            })))
            .mount(&server)
            .await;

        let service = service_for(&server, Arc::new(MemoryCredentialStore::new()));
        let outcome = service
            .register(&RegisterRequest::new("dup@pronoscore.app", "dup", "pw"))
            .await;

        assert_eq!(outcome.error(), Some("Email déjà utilisé"));
        assert_eq!(service.session().error.as_deref(), Some("Email déjà utilisé"));
        Ok(())
    }

    #[tokio::test]
    async fn forgot_password_falls_back_to_generic_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/forgot-password"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let service = service_for(&server, Arc::new(MemoryCredentialStore::new()));
        let outcome = service.forgot_password("fan@pronoscore.app").await;

        assert_eq!(outcome.error(), Some(FORGOT_FALLBACK));
        service.clear_error();
        assert_eq!(service.session().error, None);
        Ok(())
    }

    #[tokio::test]
    async fn forgot_password_success_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/forgot-password"))
            .and(body_json(json!({ "email": "fan@pronoscore.app" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "ok"
            })))
            .mount(&server)
            .await;

        let service = service_for(&server, Arc::new(MemoryCredentialStore::new()));
        let outcome = service.forgot_password("fan@pronoscore.app").await;

        assert_eq!(outcome.message(), Some(FORGOT_MESSAGE));
        assert!(!service.session().is_loading);
        Ok(())
    }

    #[tokio::test]
    async fn reset_password_sends_token_and_new_password() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/reset-password"))
            .and(body_json(json!({
                "token": "reset-123",
                "new_password": "n3w-pass"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "ok"
            })))
            .mount(&server)
            .await;

        let service = service_for(&server, Arc::new(MemoryCredentialStore::new()));
        let outcome = service
            .reset_password("reset-123", &SecretString::from("n3w-pass".to_string()))
            .await;

        assert_eq!(outcome.message(), Some(RESET_MESSAGE));
        Ok(())
    }

    #[tokio::test]
    async fn verify_email_reports_expired_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/verify-email"))
            .and(body_json(json!({ "token": "stale" })))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "Token expiré"
            })))
            .mount(&server)
            .await;

        let service = service_for(&server, Arc::new(MemoryCredentialStore::new()));
        let outcome = service.verify_email("stale").await;

        assert_eq!(outcome.error(), Some("Token expiré"));
        Ok(())
    }

    #[tokio::test]
    async fn logout_revokes_and_signs_out() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Déconnecté"
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_pair(&CredentialPair::new(
            "access-1",
            "refresh-1",
        )));
        let service = service_for(&server, store.clone());
        service.api().session().authenticate(User {
            id: 1,
            email: "fan@pronoscore.app".to_string(),
            username: "fan".to_string(),
            email_verified: true,
            created_at: None,
            full_name: None,
            is_active: true,
        });
        let mut events = service.subscribe();

        let outcome = service.logout().await;

        assert!(matches!(outcome, LogoutOutcome::Revoked));
        assert!(store.load()?.is_empty());
        assert!(!service.session().is_authenticated);
        assert_eq!(events.try_recv()?, SessionEvent::SignedOut);
        Ok(())
    }
}
