//! Process-wide credential store with push-updated reads.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, instrument};

use learnverse_core::{AccessToken, CredentialBackend, CredentialRecord, RefreshToken, Result};

/// Shared handle to the persisted credentials.
///
/// Construct once at startup with [`CredentialStore::open`] and clone the
/// handle into every consumer; clones share state.
///
/// Writers are serialised: each write mutates the record, persists it in
/// full, and only then publishes the new values. Readers take a snapshot of
/// the last published value and never wait on a writer.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Box<dyn CredentialBackend>,
    record: Mutex<CredentialRecord>,
    access: watch::Sender<Option<AccessToken>>,
    refresh: watch::Sender<Option<RefreshToken>>,
    interests_skipped: watch::Sender<bool>,
}

impl CredentialStore {
    /// Load the persisted record from `backend` and wrap it in a store.
    #[instrument(skip(backend))]
    pub async fn open(backend: impl CredentialBackend + 'static) -> Result<Self> {
        let record = backend.load().await?;
        debug!(
            has_access = record.has_access_token(),
            has_refresh = record.refresh_token.is_some(),
            interests_skipped = record.interests_skipped,
            "Credential store opened"
        );

        let (access, _) = watch::channel(record.access_token.clone());
        let (refresh, _) = watch::channel(record.refresh_token.clone());
        let (interests_skipped, _) = watch::channel(record.interests_skipped);

        Ok(Self {
            inner: Arc::new(StoreInner {
                backend: Box::new(backend),
                record: Mutex::new(record),
                access,
                refresh,
                interests_skipped,
            }),
        })
    }

    /// Overwrite both tokens in a single persisted write.
    #[instrument(skip_all)]
    pub async fn save_tokens(&self, access: AccessToken, refresh: RefreshToken) -> Result<()> {
        self.update(|record| {
            record.access_token = Some(access);
            record.refresh_token = Some(refresh);
        })
        .await?;
        info!("Stored new token pair");
        Ok(())
    }

    /// Overwrite only the access token; the refresh token is kept.
    #[instrument(skip_all)]
    pub async fn save_access_token(&self, access: AccessToken) -> Result<()> {
        self.update(|record| record.access_token = Some(access)).await
    }

    /// Remove both tokens. The interests-skipped flag is left untouched.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        self.update(|record| {
            record.access_token = None;
            record.refresh_token = None;
        })
        .await?;
        info!("Cleared stored tokens");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn save_interests_skipped(&self, skipped: bool) -> Result<()> {
        self.update(|record| record.interests_skipped = skipped).await
    }

    pub async fn clear_interests_skipped(&self) -> Result<()> {
        self.save_interests_skipped(false).await
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.inner.access.borrow().clone()
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.inner.refresh.borrow().clone()
    }

    /// Current interests-skipped flag; `false` until set.
    pub fn interests_skipped(&self) -> bool {
        *self.inner.interests_skipped.borrow()
    }

    /// Stream of the access token: the current value first, then every change.
    pub fn watch_access_token(&self) -> WatchStream<Option<AccessToken>> {
        WatchStream::new(self.inner.access.subscribe())
    }

    /// Stream of the refresh token: the current value first, then every change.
    pub fn watch_refresh_token(&self) -> WatchStream<Option<RefreshToken>> {
        WatchStream::new(self.inner.refresh.subscribe())
    }

    /// Stream of the interests-skipped flag.
    pub fn watch_interests_skipped(&self) -> WatchStream<bool> {
        WatchStream::new(self.inner.interests_skipped.subscribe())
    }

    /// Raw receiver for callers that want `changed()` semantics.
    pub fn subscribe_access_token(&self) -> watch::Receiver<Option<AccessToken>> {
        self.inner.access.subscribe()
    }

    /// Snapshot of the whole record.
    pub fn record(&self) -> CredentialRecord {
        CredentialRecord {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            interests_skipped: self.interests_skipped(),
        }
    }

    async fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut CredentialRecord),
    {
        let mut current = self.inner.record.lock().await;
        let mut next = current.clone();
        mutate(&mut next);

        // Persist before publishing so observers never see unsaved values.
        self.inner.backend.persist(&next).await?;

        publish(&self.inner.access, next.access_token.clone());
        publish(&self.inner.refresh, next.refresh_token.clone());
        publish(&self.inner.interests_skipped, next.interests_skipped);

        *current = next;
        Ok(())
    }
}

fn publish<T: PartialEq>(sender: &watch::Sender<T>, value: T) {
    sender.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    });
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("tokens", &"[REDACTED]")
            .field("interests_skipped", &self.interests_skipped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCredentialBackend;
    use async_trait::async_trait;
    use learnverse_core::Error;
    use learnverse_core::error::StorageError;
    use tokio_stream::StreamExt;

    struct FailingBackend;

    #[async_trait]
    impl CredentialBackend for FailingBackend {
        async fn load(&self) -> Result<CredentialRecord> {
            Ok(CredentialRecord::default())
        }

        async fn persist(&self, _record: &CredentialRecord) -> Result<()> {
            Err(StorageError::Io {
                path: "/dev/full".to_string(),
                message: "disk full".to_string(),
            }
            .into())
        }
    }

    fn seeded(access: &str, refresh: &str) -> MemoryCredentialBackend {
        MemoryCredentialBackend::with_record(CredentialRecord {
            access_token: Some(AccessToken::new(access)),
            refresh_token: Some(RefreshToken::new(refresh)),
            interests_skipped: false,
        })
    }

    #[tokio::test]
    async fn opens_with_persisted_values() {
        let store = CredentialStore::open(seeded("A1", "R1")).await.unwrap();
        assert_eq!(store.access_token(), Some(AccessToken::new("A1")));
        assert_eq!(store.refresh_token(), Some(RefreshToken::new("R1")));
        assert!(!store.interests_skipped());
    }

    #[tokio::test]
    async fn save_tokens_writes_both_in_one_record() {
        let backend = seeded("A1", "R1");
        let store = CredentialStore::open(backend.clone()).await.unwrap();

        store
            .save_tokens(AccessToken::new("A2"), RefreshToken::new("R2"))
            .await
            .unwrap();

        let persisted = backend.snapshot();
        assert_eq!(persisted.access_token, Some(AccessToken::new("A2")));
        assert_eq!(persisted.refresh_token, Some(RefreshToken::new("R2")));
        assert_eq!(store.record(), persisted);
    }

    #[tokio::test]
    async fn save_access_token_keeps_refresh_token() {
        let store = CredentialStore::open(seeded("A1", "R1")).await.unwrap();
        store.save_access_token(AccessToken::new("A9")).await.unwrap();

        assert_eq!(store.access_token(), Some(AccessToken::new("A9")));
        assert_eq!(store.refresh_token(), Some(RefreshToken::new("R1")));
    }

    #[tokio::test]
    async fn clear_keeps_interests_flag() {
        let store = CredentialStore::open(seeded("A1", "R1")).await.unwrap();
        store.save_interests_skipped(true).await.unwrap();
        store.clear().await.unwrap();

        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.interests_skipped());

        store.clear_interests_skipped().await.unwrap();
        assert!(!store.interests_skipped());
    }

    #[tokio::test]
    async fn watch_yields_current_then_updates() {
        let store = CredentialStore::open(seeded("A1", "R1")).await.unwrap();
        let mut stream = store.watch_access_token();

        assert_eq!(stream.next().await, Some(Some(AccessToken::new("A1"))));

        store
            .save_tokens(AccessToken::new("A2"), RefreshToken::new("R2"))
            .await
            .unwrap();
        assert_eq!(stream.next().await, Some(Some(AccessToken::new("A2"))));

        store.clear().await.unwrap();
        assert_eq!(stream.next().await, Some(None));
    }

    #[tokio::test]
    async fn interests_flag_defaults_to_false() {
        let store = CredentialStore::open(MemoryCredentialBackend::new())
            .await
            .unwrap();
        let mut stream = store.watch_interests_skipped();
        assert_eq!(stream.next().await, Some(false));
    }

    #[tokio::test]
    async fn failed_persist_publishes_nothing() {
        let store = CredentialStore::open(FailingBackend).await.unwrap();

        let err = store
            .save_tokens(AccessToken::new("A2"), RefreshToken::new("R2"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Storage(StorageError::Io { .. })));
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[tokio::test]
    async fn concurrent_writers_never_mix_pairs() {
        let backend = MemoryCredentialBackend::new();
        let store = CredentialStore::open(backend.clone()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .save_tokens(
                        AccessToken::new(format!("A{i}")),
                        RefreshToken::new(format!("R{i}")),
                    )
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = backend.snapshot();
        let access = record.access_token.unwrap();
        let refresh = record.refresh_token.unwrap();
        assert_eq!(&access.as_str()[1..], &refresh.as_str()[1..]);
        assert_eq!(store.record().access_token, Some(access));
    }

    #[test]
    fn debug_redacts_tokens() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let store = rt
            .block_on(CredentialStore::open(seeded("secret-access", "secret-refresh")))
            .unwrap();
        let debug = format!("{:?}", store);
        assert!(!debug.contains("secret"));
    }
}
