//! Locally persisted client credentials.
//!
//! This module provides the key-value store holding session tokens
//! and the secure string wrapper that keeps them out of logs.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::RwLock;
use thiserror::Error;

/// Key under which the access token is stored.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Authentication type for API requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// Standard `Authorization: Bearer` header.
    Bearer,
    /// No authentication header is sent.
    None,
}

impl AuthType {
    /// Parse auth type from string.
    /// Defaults to `Bearer` for unknown values.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => AuthType::None,
            _ => AuthType::Bearer,
        }
    }
}

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Errors that can occur when reading or writing credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to access credentials file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credentials file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize credentials: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Key-value persistence for client credentials.
///
/// `clear` wipes every key, not just the ones this crate wrote.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<SecureString>;
    fn set(&self, key: &str, value: SecureString) -> Result<(), CredentialError>;
    fn clear(&self) -> Result<(), CredentialError>;
    fn is_empty(&self) -> bool;
}

/// Credentials kept for the lifetime of the process.
#[derive(Default)]
pub struct MemoryCredentialStore {
    values: RwLock<BTreeMap<String, SecureString>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<SecureString> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: SecureString) -> Result<(), CredentialError> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        self.values.write().clear();
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

/// Credentials persisted as a flat TOML table.
///
/// The file is read once on open; writes go through an exclusive file
/// lock and replace the whole table.
pub struct FileCredentialStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileCredentialStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| CredentialError::Io {
                path: path.clone(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| CredentialError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), CredentialError> {
        let io_err = |e| CredentialError::Io {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = toml::to_string(values)?;
        let mut file: File = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.lock_exclusive().map_err(io_err)?;
        let written = file.write_all(content.as_bytes()).and_then(|_| file.sync_all());
        let _ = FileExt::unlock(&file);
        written.map_err(io_err)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<SecureString> {
        self.values.read().get(key).map(SecureString::new)
    }

    fn set(&self, key: &str, value: SecureString) -> Result<(), CredentialError> {
        let mut values = self.values.write();
        values.insert(key.to_string(), value.expose().to_string());
        self.persist(&values)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        self.values.write().clear();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}
