//! Error type shared by every API call. Transport failures, HTTP failures and
//! decoding failures stay distinct so lifecycle operations can decide which ones
//! are surfaced and which ones are swallowed.

use crate::client::credentials::StorageError;
use serde_json::Value;
use thiserror::Error;

/// Maximum number of error body characters kept for display.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// Non-2xx response. `detail` holds the server's structured message when the
    /// body carried one; `message` is what gets displayed.
    #[error("Request failed ({status}): {message}")]
    Http {
        status: u16,
        detail: Option<String>,
        message: String,
    },

    #[error("Response error: {0}")]
    Parse(String),

    #[error("Request error: {0}")]
    Serialization(String),

    /// Rejected locally; nothing was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Builds an HTTP error from a raw response body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        let message = detail.clone().unwrap_or_else(|| sanitize_body(body));
        Self::Http {
            status,
            detail,
            message,
        }
    }

    /// Server-provided message, if the error came with one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Message suitable for a form: the server detail, else `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_decode() {
            Self::Parse(format!("Failed to decode response: {err}"))
        } else if err.is_builder() {
            Self::Serialization(format!("Failed to build request: {err}"))
        } else {
            Self::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

/// Pulls the FastAPI-style `detail` out of an error body.
///
/// `detail` is either a string or, for validation failures, a list of objects
/// with a `msg` field.
fn extract_detail(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;

    match json.get("detail")? {
        Value::String(message) => {
            let message = message.trim();
            (!message.is_empty()).then(|| message.to_string())
        }
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// Sanitizes HTTP error bodies for display by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
