//! Top-level authentication state machine.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use learnverse_core::error::ApiError;
use learnverse_core::{
    AccessToken, Credentials, Error, RefreshToken, Registration, Result, SessionState,
};
use learnverse_store::CredentialStore;

use crate::client::ApiClient;
use crate::endpoints::AuthResponse;
use crate::repo::{AuthRepository, InterestsRepository};

/// State of the login, registration or interest form currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    /// The last submission failed; the message is user-facing.
    Failed(String),
}

/// Drives [`SessionState`] from user actions and session invalidation.
///
/// API failures never escape: they land in [`FormState::Failed`] and leave
/// the session state as it was. Only credential storage failures are
/// returned as errors.
#[derive(Clone)]
pub struct AuthViewModel {
    inner: Arc<ViewModelInner>,
}

struct ViewModelInner {
    client: ApiClient,
    store: CredentialStore,
    auth: AuthRepository,
    interests: InterestsRepository,
    session: watch::Sender<SessionState>,
    form: watch::Sender<FormState>,
}

impl AuthViewModel {
    pub fn new(client: ApiClient) -> Self {
        let (session, _) = watch::channel(SessionState::Loading);
        let (form, _) = watch::channel(FormState::Idle);

        Self {
            inner: Arc::new(ViewModelInner {
                store: client.store().clone(),
                auth: AuthRepository::new(client.clone()),
                interests: InterestsRepository::new(client.clone()),
                client,
                session,
                form,
            }),
        }
    }

    pub fn session_state(&self) -> SessionState {
        *self.inner.session.borrow()
    }

    pub fn watch_session(&self) -> watch::Receiver<SessionState> {
        self.inner.session.subscribe()
    }

    pub fn form_state(&self) -> FormState {
        self.inner.form.borrow().clone()
    }

    pub fn watch_form(&self) -> watch::Receiver<FormState> {
        self.inner.form.subscribe()
    }

    /// Resolve `Loading` from the stored credentials.
    #[instrument(skip(self))]
    pub fn start(&self) -> SessionState {
        let record = self.inner.store.record();
        let state = if record.has_access_token() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };

        info!(
            %state,
            interests_skipped = record.interests_skipped,
            "Session restored"
        );
        self.set_session(state);
        state
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let credentials = match Credentials::new(email, password) {
            Ok(credentials) => credentials,
            Err(e) => {
                self.set_form(FormState::Failed(e.to_string()));
                return Ok(());
            }
        };

        self.set_form(FormState::Submitting);
        match self.inner.auth.login(&credentials).await {
            Ok(response) => {
                if !self.store_tokens(&response).await? {
                    return Ok(());
                }
                let next = if response.has_interests() {
                    SessionState::Authenticated
                } else {
                    SessionState::NeedsInterestSelection
                };
                self.set_form(FormState::Idle);
                self.set_session(next);
            }
            Err(e) => self.fail(&e),
        }
        Ok(())
    }

    /// Create an account. New accounts always go through interest selection.
    #[instrument(skip(self, name, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let registration = match Registration::new(name, email, password) {
            Ok(registration) => registration,
            Err(e) => {
                self.set_form(FormState::Failed(e.to_string()));
                return Ok(());
            }
        };

        self.set_form(FormState::Submitting);
        match self.inner.auth.register(&registration).await {
            Ok(response) => {
                if !self.store_tokens(&response).await? {
                    return Ok(());
                }
                self.set_form(FormState::Idle);
                self.set_session(SessionState::NeedsInterestSelection);
            }
            Err(e) => self.fail(&e),
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn save_interests(&self, interests: &[String]) -> Result<()> {
        self.set_form(FormState::Submitting);
        match self.inner.interests.save(interests).await {
            Ok(()) => {
                self.inner.store.clear_interests_skipped().await?;
                self.set_form(FormState::Idle);
                self.set_session(SessionState::Authenticated);
            }
            Err(e) => self.fail(&e),
        }
        Ok(())
    }

    /// The user dismissed interest selection; remember it and carry on.
    #[instrument(skip(self))]
    pub async fn cancel_interest_selection(&self) -> Result<()> {
        self.inner.store.save_interests_skipped(true).await?;
        self.set_form(FormState::Idle);
        self.set_session(SessionState::Authenticated);
        Ok(())
    }

    /// Log out locally, telling the server first on a best-effort basis.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let record = self.inner.store.record();
        if record.access_token.is_none() && record.refresh_token.is_none() {
            debug!("No stored session, nothing to log out");
            self.set_session(SessionState::Unauthenticated);
            return Ok(());
        }

        if let Err(e) = self.inner.auth.logout(record.refresh_token.as_ref()).await {
            warn!(error = %e, "Server-side logout failed, clearing local session anyway");
        }

        self.clear_session().await?;
        info!("Logged out");
        Ok(())
    }

    /// Log out locally whenever the client reports an unrecoverable 401.
    ///
    /// The task runs until aborted through the returned handle.
    pub fn listen_for_invalidation(&self) -> JoinHandle<()> {
        let mut events = self.inner.client.subscribe_invalidation();
        let view_model = self.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        info!(reason = ?event.reason, "Session invalidated");
                    }
                    Err(RecvError::Lagged(missed)) => {
                        debug!(missed, "Missed invalidation events");
                    }
                    Err(RecvError::Closed) => break,
                }

                if let Err(e) = view_model.clear_session().await {
                    warn!(error = %e, "Could not clear credentials after invalidation");
                }
            }
        })
    }

    /// Persist the tokens from a login or registration reply.
    ///
    /// Returns `false`, storing nothing, when the reply carries no access token.
    async fn store_tokens(&self, response: &AuthResponse) -> Result<bool> {
        let access = AccessToken::new(response.access_token.clone());
        let refresh = RefreshToken::new(response.refresh_token.clone());

        if access.is_blank() {
            self.fail(&Error::Api(ApiError::malformed(200, "empty access token")));
            return Ok(false);
        }

        let stored = if refresh.is_blank() {
            self.inner.store.save_access_token(access).await
        } else {
            self.inner.store.save_tokens(access, refresh).await
        };

        if let Err(e) = &stored {
            self.set_form(FormState::Failed(e.user_message()));
        }
        stored.map(|()| true)
    }

    /// The local half of logout: forget tokens and the interests flag.
    ///
    /// Invalidation runs this; callers that observe a
    /// [`SessionInvalidated`](crate::SessionInvalidated) themselves can too.
    pub async fn clear_session(&self) -> Result<()> {
        self.inner.store.clear().await?;
        self.inner.store.clear_interests_skipped().await?;
        self.set_form(FormState::Idle);
        self.set_session(SessionState::Unauthenticated);
        Ok(())
    }

    fn fail(&self, error: &Error) {
        warn!(error = %error, "Request failed");
        self.set_form(FormState::Failed(error.user_message()));
    }

    fn set_session(&self, state: SessionState) {
        self.inner.session.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                debug!(from = %current, to = %state, "Session state changed");
                *current = state;
                true
            }
        });
    }

    fn set_form(&self, state: FormState) {
        self.inner.form.send_replace(state);
    }
}

impl std::fmt::Debug for AuthViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthViewModel")
            .field("session", &self.session_state())
            .field("form", &self.form_state())
            .finish()
    }
}
