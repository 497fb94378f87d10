use crate::{
    client::{ApiClient, ClientConfig, CredentialStore, FileCredentialStore},
    features::auth::SessionStore,
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub timeout_secs: u64,
    pub credentials_file: Option<PathBuf>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, timeout_secs: u64, credentials_file: Option<PathBuf>) -> Self {
        Self {
            api_url,
            timeout_secs,
            credentials_file,
        }
    }

    /// # Errors
    /// Returns an error if the URL or timeout is invalid.
    pub fn client_config(&self) -> Result<ClientConfig> {
        ClientConfig::new(&self.api_url, self.timeout_secs).context("invalid API configuration")
    }

    /// # Errors
    /// Returns an error if no credentials path was given and the user config
    /// directory cannot be resolved.
    pub fn credential_store(&self) -> Result<FileCredentialStore> {
        let path = match &self.credentials_file {
            Some(path) => path.clone(),
            None => FileCredentialStore::default_path()
                .context("cannot locate a credentials file, pass --credentials-file")?,
        };
        Ok(FileCredentialStore::new(path))
    }

    /// Builds an API client backed by the credentials file and a fresh session.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn api_client(&self) -> Result<ApiClient> {
        let credentials: Arc<dyn CredentialStore> = Arc::new(self.credential_store()?);
        ApiClient::new(self.client_config()?, credentials, SessionStore::new())
            .context("failed to build API client")
    }
}
