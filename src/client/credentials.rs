//! Durable storage for the access/refresh token pair.
//!
//! Two opaque values live under fixed keys. Either both are present (logged in)
//! or the pair counts as absent; a dangling single token is cleared by whoever
//! notices it first. Tokens are wrapped in `SecretString` and are never logged.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use thiserror::Error;
use tracing::debug;

/// Storage keys for the persisted tokens.
pub struct StorageKeys;

impl StorageKeys {
    pub const ACCESS_TOKEN: &'static str = "access_token";
    pub const REFRESH_TOKEN: &'static str = "refresh_token";
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Path error: {0}")]
    Path(String),
}

/// A complete token pair as returned by a successful login.
#[derive(Clone, Debug)]
pub struct CredentialPair {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

impl CredentialPair {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }
}

/// Whatever is currently persisted; either field may be missing.
#[derive(Clone, Debug, Default)]
pub struct StoredCredentials {
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

impl StoredCredentials {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    /// Exactly one of the two tokens is present.
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        self.access_token.is_some() != self.refresh_token.is_some()
    }

    #[must_use]
    pub fn pair(&self) -> Option<CredentialPair> {
        match (&self.access_token, &self.refresh_token) {
            (Some(access_token), Some(refresh_token)) => Some(CredentialPair {
                access_token: access_token.clone(),
                refresh_token: refresh_token.clone(),
            }),
            _ => None,
        }
    }
}

/// Backend for token persistence.
pub trait CredentialStore: Send + Sync {
    /// Write both tokens. Implementations aim for both-or-neither.
    fn save(&self, pair: &CredentialPair) -> Result<(), StorageError>;

    fn load(&self) -> Result<StoredCredentials, StorageError>;

    /// Replace only the access token, keeping the stored refresh token.
    fn save_access_token(&self, token: &SecretString) -> Result<(), StorageError>;

    /// Remove both tokens. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Process-local store used for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    data: Mutex<HashMap<&'static str, SecretString>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a pair.
    #[must_use]
    pub fn with_pair(pair: &CredentialPair) -> Self {
        let store = Self::new();
        {
            let mut data = store.data.lock().unwrap_or_else(PoisonError::into_inner);
            data.insert(StorageKeys::ACCESS_TOKEN, pair.access_token.clone());
            data.insert(StorageKeys::REFRESH_TOKEN, pair.refresh_token.clone());
        }
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, pair: &CredentialPair) -> Result<(), StorageError> {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.insert(StorageKeys::ACCESS_TOKEN, pair.access_token.clone());
        data.insert(StorageKeys::REFRESH_TOKEN, pair.refresh_token.clone());
        Ok(())
    }

    fn load(&self) -> Result<StoredCredentials, StorageError> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(StoredCredentials {
            access_token: data.get(StorageKeys::ACCESS_TOKEN).cloned(),
            refresh_token: data.get(StorageKeys::REFRESH_TOKEN).cloned(),
        })
    }

    fn save_access_token(&self, token: &SecretString) -> Result<(), StorageError> {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.insert(StorageKeys::ACCESS_TOKEN, token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.remove(StorageKeys::ACCESS_TOKEN);
        data.remove(StorageKeys::REFRESH_TOKEN);
        Ok(())
    }
}

/// On-disk layout: one JSON object keyed like `StorageKeys`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl From<CredentialsDocument> for StoredCredentials {
    fn from(doc: CredentialsDocument) -> Self {
        Self {
            access_token: doc.access_token.map(SecretString::from),
            refresh_token: doc.refresh_token.map(SecretString::from),
        }
    }
}

/// Durable store backed by a JSON file, replaced atomically on every write.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<config dir>/pronoscore/credentials.json`.
    ///
    /// # Errors
    /// Returns `StorageError::Path` if the platform has no config directory.
    pub fn default_path() -> Result<PathBuf, StorageError> {
        dirs::config_dir()
            .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("credentials.json"))
            .ok_or_else(|| StorageError::Path("no user config directory available".to_string()))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<CredentialsDocument, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(CredentialsDocument::default()),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| StorageError::Encoding(format!("invalid credentials file: {err}"))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(CredentialsDocument::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes to a sibling temp file and renames it over the target.
    fn write_document(&self, doc: &CredentialsDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_vec(doc)
            .map_err(|err| StorageError::Encoding(format!("failed to encode credentials: {err}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        let written = open_private(&tmp_path).and_then(|mut file| {
            file.write_all(&payload)?;
            file.sync_all()
        });
        if let Err(err) = written.and_then(|()| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        debug!(path = %self.path.display(), "credentials written");
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, pair: &CredentialPair) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_document(&CredentialsDocument {
            access_token: Some(pair.access_token.expose_secret().to_string()),
            refresh_token: Some(pair.refresh_token.expose_secret().to_string()),
        })
    }

    fn load(&self) -> Result<StoredCredentials, StorageError> {
        self.read_document().map(StoredCredentials::from)
    }

    fn save_access_token(&self, token: &SecretString) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.read_document()?;
        doc.access_token = Some(token.expose_secret().to_string());
        self.write_document(&doc)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "credentials cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
