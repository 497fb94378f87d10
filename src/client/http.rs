//! Bearer-token HTTP wrapper with a one-shot refresh on `401 Unauthorized`.
//!
//! Every authenticated request reads the stored access token and attaches it as
//! `Authorization: Bearer`. When the response is a 401 the wrapper exchanges the
//! refresh token once and resends the original request once. If no refresh is
//! possible the session is terminated: both tokens are cleared and the session
//! store broadcasts `SessionEvent::LoginRequired`. Any other status, including a
//! second 401, goes back to the caller untouched.

use crate::{
    APP_USER_AGENT,
    client::{
        config::ClientConfig,
        credentials::{CredentialPair, CredentialStore},
        errors::ApiError,
    },
    features::auth::state::SessionStore,
};
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{future::Future, sync::Arc};
use tracing::{debug, error, info, instrument, warn};

/// Anything the retry policy can inspect for a status code.
pub trait StatusCarrier {
    fn status_code(&self) -> StatusCode;
}

impl StatusCarrier for Response {
    fn status_code(&self) -> StatusCode {
        self.status()
    }
}

/// Result of trying to exchange the refresh token.
#[derive(Debug)]
pub enum RefreshResult {
    /// A new access token, already persisted.
    Refreshed(SecretString),
    /// No refresh token is stored.
    Unavailable,
    /// The refresh call failed or its result could not be stored.
    Rejected(ApiError),
}

/// How a request went through the refresh-on-401 policy.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// First response was not a 401.
    Passed(T),
    /// Refreshed once and resent once; holds the resend's response, whatever it is.
    Retried(T),
    /// A 401 that could not be recovered; holds the original response.
    SessionFailed(T),
}

impl<T> RetryOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Passed(response) | Self::Retried(response) | Self::SessionFailed(response) => {
                response
            }
        }
    }
}

/// Runs `send` and, on a 401, calls `refresh` at most once before a single resend.
///
/// `send` must be idempotent. It receives `None` on the first attempt (use the
/// stored token) and `Some(token)` on the resend. `refresh` is `FnOnce`, so a
/// request can never trigger more than one refresh.
///
/// # Errors
/// Returns the transport error of either attempt.
pub async fn with_auth_retry<T, S, SFut, R, RFut>(
    mut send: S,
    refresh: R,
) -> Result<RetryOutcome<T>, ApiError>
where
    T: StatusCarrier,
    S: FnMut(Option<SecretString>) -> SFut,
    SFut: Future<Output = Result<T, ApiError>>,
    R: FnOnce() -> RFut,
    RFut: Future<Output = RefreshResult>,
{
    let response = send(None).await?;
    if response.status_code() != StatusCode::UNAUTHORIZED {
        return Ok(RetryOutcome::Passed(response));
    }

    debug!("received 401, attempting token refresh");

    match refresh().await {
        RefreshResult::Refreshed(token) => {
            let retried = send(Some(token)).await?;
            if retried.status_code() == StatusCode::UNAUTHORIZED {
                warn!("request still unauthorized after token refresh");
            }
            Ok(RetryOutcome::Retried(retried))
        }
        RefreshResult::Unavailable => {
            warn!("no refresh token stored, session cannot be recovered");
            Ok(RetryOutcome::SessionFailed(response))
        }
        RefreshResult::Rejected(err) => {
            warn!(error = %err, "token refresh rejected");
            Ok(RetryOutcome::SessionFailed(response))
        }
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// HTTP client for the Pronoscore API, shared by lifecycle operations and
/// feature clients.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    credentials: Arc<dyn CredentialStore>,
    session: SessionStore,
}

impl ApiClient {
    /// Builds the client.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the underlying HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        session: SessionStore,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            config,
            credentials,
            session,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Authenticated GET returning JSON.
    ///
    /// # Errors
    /// Returns `ApiError` on transport failure, non-2xx status, or a body that
    /// does not decode.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_json_with_query(path, &[]).await
    }

    /// Authenticated GET with query parameters.
    ///
    /// # Errors
    /// See [`ApiClient::get_json`].
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.send_authorized(Method::GET, path, query, None).await?;
        handle_json_response(response).await
    }

    /// Authenticated POST with a JSON body, returning JSON. The body is encoded
    /// once and replayed unchanged on the resend.
    ///
    /// # Errors
    /// See [`ApiClient::get_json`].
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = encode_body(body)?;
        let response = self
            .send_authorized(Method::POST, path, &[], Some(payload))
            .await?;
        handle_json_response(response).await
    }

    /// Authenticated POST without a body, returning JSON.
    ///
    /// # Errors
    /// See [`ApiClient::get_json`].
    pub async fn post_without_body<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send_authorized(Method::POST, path, &[], None).await?;
        handle_json_response(response).await
    }

    /// Authenticated POST without a body, ignoring the response body.
    ///
    /// # Errors
    /// Returns `ApiError` on transport failure or non-2xx status.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send_authorized(Method::POST, path, &[], None).await?;
        handle_empty_response(response).await
    }

    /// Unauthenticated POST returning JSON. Never intercepted.
    ///
    /// # Errors
    /// See [`ApiClient::get_json`].
    pub async fn post_public_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .post(self.config.endpoint(path))
            .json(body)
            .send()
            .await?;
        handle_json_response(response).await
    }

    /// Unauthenticated POST ignoring the response body. Never intercepted.
    ///
    /// # Errors
    /// Returns `ApiError` on transport failure or non-2xx status.
    pub async fn post_public_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.config.endpoint(path))
            .json(body)
            .send()
            .await?;
        handle_empty_response(response).await
    }

    /// GET with an explicit bearer token, bypassing stored credentials and the
    /// refresh policy.
    ///
    /// # Errors
    /// See [`ApiClient::get_json`].
    pub async fn get_json_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.config.endpoint(path))
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        handle_json_response(response).await
    }

    /// Authenticated POST without a body that never terminates the session.
    ///
    /// For callers that reset local state themselves, such as logout: an
    /// unrecoverable 401 comes back as an error and no `LoginRequired` is sent.
    ///
    /// # Errors
    /// Returns `ApiError` on transport failure or non-2xx status.
    pub async fn post_empty_unguarded(&self, path: &str) -> Result<(), ApiError> {
        let outcome = self.send_with_retry(Method::POST, path, &[], None).await?;
        handle_empty_response(outcome.into_inner()).await
    }

    async fn send_authorized(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Response, ApiError> {
        let outcome = self.send_with_retry(method, path, query, body).await?;

        if let RetryOutcome::SessionFailed(_) = &outcome {
            self.terminate_session();
        }

        Ok(outcome.into_inner())
    }

    #[instrument(skip(self, query, body))]
    async fn send_with_retry(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<RetryOutcome<Response>, ApiError> {
        let url = self.config.endpoint(path);
        let url = url.as_str();
        let body = body.as_ref();

        with_auth_retry(
            move |token| self.send_once(method.clone(), url, query, body, token),
            || self.refresh_access_token(),
        )
        .await
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<SecretString>,
    ) -> Result<Response, ApiError> {
        let token = match token {
            Some(token) => Some(token),
            None => self.stored_access_token()?,
        };

        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = &token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        debug!(status = %response.status(), "response received");
        Ok(response)
    }

    /// Stored access token, clearing a dangling single token on the way.
    fn stored_access_token(&self) -> Result<Option<SecretString>, ApiError> {
        let stored = self.credentials.load()?;
        if stored.is_dangling() {
            warn!("dangling credential found, clearing");
            self.credentials.clear()?;
            return Ok(None);
        }
        Ok(stored.access_token)
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// The refresh call itself is a plain request, so it can never recurse into
    /// the retry policy.
    async fn refresh_access_token(&self) -> RefreshResult {
        let stored = match self.credentials.load() {
            Ok(stored) => stored,
            Err(err) => return RefreshResult::Rejected(err.into()),
        };
        let Some(refresh_token) = stored.refresh_token else {
            return RefreshResult::Unavailable;
        };

        let request = RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        };
        let tokens: RefreshResponse = match self.post_public_json("/auth/refresh", &request).await
        {
            Ok(tokens) => tokens,
            Err(err) => return RefreshResult::Rejected(err),
        };

        let access_token = SecretString::from(tokens.access_token);
        let persisted = match tokens.refresh_token {
            Some(rotated) => self.credentials.save(&CredentialPair {
                access_token: access_token.clone(),
                refresh_token: SecretString::from(rotated),
            }),
            None => self.credentials.save_access_token(&access_token),
        };
        if let Err(err) = persisted {
            return RefreshResult::Rejected(err.into());
        }

        info!("access token refreshed");
        RefreshResult::Refreshed(access_token)
    }

    /// Hard session termination: no partially authenticated state survives.
    fn terminate_session(&self) {
        if let Err(err) = self.credentials.clear() {
            error!(error = %err, "failed to clear credentials after session failure");
        }
        self.session.expire();
    }
}

fn encode_body<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }
}

async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }
}
