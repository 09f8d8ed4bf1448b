//! File-backed credential persistence.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use learnverse_core::error::StorageError;
use learnverse_core::{AccessToken, CredentialBackend, CredentialRecord, RefreshToken, Result};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Default credential file name inside the data directory.
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// On-disk shape of the credential record.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default)]
    interests_skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<StoredCredentials> for CredentialRecord {
    fn from(stored: StoredCredentials) -> Self {
        CredentialRecord {
            access_token: stored.access_token.map(AccessToken::new),
            refresh_token: stored.refresh_token.map(RefreshToken::new),
            interests_skipped: stored.interests_skipped,
        }
    }
}

impl From<&CredentialRecord> for StoredCredentials {
    fn from(record: &CredentialRecord) -> Self {
        StoredCredentials {
            access_token: record.access_token.as_ref().map(|t| t.as_str().to_string()),
            refresh_token: record.refresh_token.as_ref().map(|t| t.as_str().to_string()),
            interests_skipped: record.interests_skipped,
            updated_at: Some(Utc::now()),
        }
    }
}

/// Stores the credential record as a JSON file.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, under an exclusive lock, so a crash never leaves a half-written
/// record behind.
#[derive(Debug, Clone)]
pub struct FileCredentialBackend {
    path: PathBuf,
}

impl FileCredentialBackend {
    /// Use the credential file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Use `credentials.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CREDENTIALS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn map_io(&self, err: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn lock(&self) -> std::result::Result<File, StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.map_io(e))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.map_io(e))?;

        lock_file.lock_exclusive().map_err(|e| self.map_io(e))?;
        Ok(lock_file)
    }

    fn load_blocking(&self) -> std::result::Result<CredentialRecord, StorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No credential file, using defaults");
            return Ok(CredentialRecord::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.map_io(e))?;
        let stored: StoredCredentials =
            serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(stored.into())
    }

    fn persist_blocking(&self, record: &CredentialRecord) -> std::result::Result<(), StorageError> {
        let lock_file = self.lock()?;

        let json = serde_json::to_string_pretty(&StoredCredentials::from(record)).map_err(|e| {
            StorageError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let tmp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        };

        let result = write().map_err(|e| self.map_io(e));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }

        lock_file.unlock().map_err(|e| self.map_io(e))?;
        result
    }
}

#[async_trait]
impl CredentialBackend for FileCredentialBackend {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<CredentialRecord> {
        let backend = self.clone();
        let record = tokio::task::spawn_blocking(move || backend.load_blocking())
            .await
            .map_err(|e| StorageError::Task {
                message: e.to_string(),
            })??;
        Ok(record)
    }

    #[instrument(skip(self, record), fields(path = %self.path.display()))]
    async fn persist(&self, record: &CredentialRecord) -> Result<()> {
        let backend = self.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || backend.persist_blocking(&record))
            .await
            .map_err(|e| StorageError::Task {
                message: e.to_string(),
            })??;
        debug!("Credential record persisted");
        Ok(())
    }
}
