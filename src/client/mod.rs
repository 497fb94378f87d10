//! Shared client plumbing: configuration, credential persistence, typed errors and
//! the bearer-token HTTP wrapper. Feature modules build on `ApiClient` so every
//! authenticated call goes through the same refresh-on-401 policy.
//!
//! Nothing in here logs token material; tokens stay inside `SecretString` until the
//! moment a header is written.

pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;

pub use config::{ClientConfig, ConfigError};
pub use credentials::{
    CredentialPair, CredentialStore, FileCredentialStore, MemoryCredentialStore, StorageError,
    StoredCredentials,
};
pub use errors::ApiError;
pub use http::{ApiClient, RefreshResult, RetryOutcome, StatusCarrier, with_auth_retry};
