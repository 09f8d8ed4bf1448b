//! Durable persistence behind the credential store.

use async_trait::async_trait;

use crate::Result;
use crate::session::CredentialRecord;

/// A durable key-value namespace holding the [`CredentialRecord`].
///
/// Implementations must persist the whole record in one write so that the
/// access and refresh tokens are never observed out of step.
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    /// Load the stored record, or the default record if none exists yet.
    async fn load(&self) -> Result<CredentialRecord>;

    /// Replace the stored record.
    async fn persist(&self, record: &CredentialRecord) -> Result<()>;
}
