//! In-memory credential persistence.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use learnverse_core::{CredentialBackend, CredentialRecord, Result};

/// Keeps the credential record in process memory only.
///
/// Clones share the same record, which lets tests inspect what a store
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialBackend {
    record: Arc<Mutex<CredentialRecord>>,
}

impl MemoryCredentialBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record.
    pub fn with_record(record: CredentialRecord) -> Self {
        Self {
            record: Arc::new(Mutex::new(record)),
        }
    }

    /// The last persisted record.
    pub fn snapshot(&self) -> CredentialRecord {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CredentialBackend for MemoryCredentialBackend {
    async fn load(&self) -> Result<CredentialRecord> {
        Ok(self.snapshot())
    }

    async fn persist(&self, record: &CredentialRecord) -> Result<()> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = record.clone();
        Ok(())
    }
}
