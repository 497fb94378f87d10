//! Client configuration: API base URL and request timeout. Values come from CLI
//! flags or their environment fallbacks; empty values fall back to defaults.
//! Configuration values are public; do not store secrets here.

use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Versioned prefix every endpoint lives under.
pub const API_PREFIX: &str = "/api/v1";

/// Generous by default: the hosted backend can take tens of seconds to cold start.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported scheme {0}: only http and https are allowed")]
    UnsupportedScheme(String),

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Builds a config from a base URL and a timeout in seconds.
    ///
    /// # Errors
    /// Returns `ConfigError` if the URL does not parse, is not http(s), or the
    /// timeout is zero.
    pub fn new(api_base_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let api_base_url =
            normalize_base_url(api_base_url).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let parsed = Url::parse(&api_base_url).map_err(|err| ConfigError::InvalidUrl {
            url: api_base_url.clone(),
            reason: err.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }

        Ok(Self {
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Builds the full endpoint URL for a path relative to the API prefix.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim();
        format!(
            "{}{}/{}",
            self.api_base_url,
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }
}

/// Trims whitespace and trailing slashes; `None` for an empty value.
fn normalize_base_url(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
