//! Request and response types for auth endpoints. Passwords and tokens are held
//! in `SecretString` and only exposed while building the wire payload.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Identity record returned by `GET /auth/me`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub(crate) fn payload(&self) -> PasswordPayload<'_> {
        PasswordPayload {
            email: &self.email,
            username: None,
            password: self.password.expose_secret(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: SecretString,
}

impl RegisterRequest {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub(crate) fn payload(&self) -> PasswordPayload<'_> {
        PasswordPayload {
            email: &self.email,
            username: Some(&self.username),
            password: self.password.expose_secret(),
        }
    }
}

/// Borrowed wire form for login and register bodies. Never log it.
#[derive(Serialize)]
pub(crate) struct PasswordPayload<'a> {
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    pub password: &'a str,
}

/// `POST /auth/login` response.
#[derive(Deserialize)]
pub(crate) struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub(crate) struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub token: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub new_password: &'a str,
}
