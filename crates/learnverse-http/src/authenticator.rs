//! Recovery from expired access tokens.
//!
//! On a 401 the [`Authenticator`] exchanges the stored refresh token for a
//! new pair, persists it, and hands back the original request carrying the
//! new access token for exactly one replay.

use reqwest::Url;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, instrument, warn};

use learnverse_core::error::AuthError;
use learnverse_core::{AccessToken, Error, RefreshToken, Result, TokenPair};
use learnverse_store::CredentialStore;

use crate::config::ClientConfig;
use crate::endpoints::{AUTH_REFRESH, RefreshRequest, RefreshResponse};
use crate::request::ApiRequest;

/// Why the session can no longer be recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    /// No refresh token is stored.
    MissingRefreshToken,
    /// The refresh endpoint refused the refresh token.
    RefreshRejected { status: u16 },
}

/// Broadcast when a 401 could not be recovered and the user must log in again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInvalidated {
    pub reason: InvalidationReason,
}

/// Calls the token-refresh endpoint.
///
/// Owns its own HTTP client with no authorizer or authenticator attached,
/// so a 401 from the refresh endpoint cannot recurse.
#[derive(Debug, Clone)]
pub struct TokenRefresher {
    client: reqwest::Client,
    url: Url,
}

impl TokenRefresher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: config.http_client()?,
            url: config.base_url().endpoint(AUTH_REFRESH),
        })
    }

    /// Exchange `token` for a new access/refresh pair.
    #[instrument(skip_all)]
    pub async fn refresh(&self, token: &RefreshToken) -> Result<TokenPair> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&RefreshRequest {
                refresh_token: token.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AuthError::RefreshRejected {
                status: status.as_u16(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(AuthError::RefreshFailed {
                message: format!("refresh endpoint returned HTTP {}", status.as_u16()),
            }
            .into());
        }

        let body: RefreshResponse = response.json().await.map_err(|e| AuthError::RefreshFailed {
            message: format!("malformed refresh response: {}", e),
        })?;

        let pair = TokenPair {
            access: AccessToken::new(body.access_token),
            refresh: RefreshToken::new(body.refresh_token),
        };
        if pair.access.is_blank() || pair.refresh.is_blank() {
            return Err(AuthError::RefreshFailed {
                message: "refresh response contained an empty token".to_string(),
            }
            .into());
        }

        Ok(pair)
    }
}

/// Reacts to 401 responses with a refresh-and-replay.
#[derive(Debug)]
pub struct Authenticator {
    store: CredentialStore,
    refresher: TokenRefresher,
    invalidated: broadcast::Sender<SessionInvalidated>,
    // One exchange at a time; later callers reuse its result.
    refresh_lock: Mutex<()>,
}

impl Authenticator {
    pub fn new(store: CredentialStore, refresher: TokenRefresher) -> Self {
        let (invalidated, _) = broadcast::channel(8);
        Self {
            store,
            refresher,
            invalidated,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Receive a [`SessionInvalidated`] event whenever recovery is impossible.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionInvalidated> {
        self.invalidated.subscribe()
    }

    /// Decide how to answer a 401 for `request`.
    ///
    /// Returns the request to replay, or `None` to let the 401 through.
    /// Never retries a replay, never retries a skip-marked request, and
    /// never clears stored credentials.
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url(), attempt = request.attempt()))]
    pub async fn authenticate(&self, request: &ApiRequest) -> Option<ApiRequest> {
        if request.attempt() > 0 {
            debug!("Replay was also rejected, giving up");
            return None;
        }
        if request.skips_authorization() {
            debug!("Request manages its own authorization, not refreshing");
            return None;
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have refreshed while this one was in flight.
        if let Some(current) = self.store.access_token().filter(|t| !t.is_blank())
            && request.bearer_token() != Some(current.as_str())
        {
            debug!("Access token changed since the request was sent, replaying");
            return self.replay(request, &current);
        }

        let Some(refresh_token) = self.store.refresh_token().filter(|t| !t.is_blank()) else {
            warn!("Received 401 with no refresh token stored");
            self.signal(InvalidationReason::MissingRefreshToken);
            return None;
        };

        match self.refresher.refresh(&refresh_token).await {
            Ok(pair) => {
                if let Err(e) = self
                    .store
                    .save_tokens(pair.access.clone(), pair.refresh)
                    .await
                {
                    warn!(error = %e, "Could not persist refreshed tokens");
                    return None;
                }
                info!("Access token refreshed");
                self.replay(request, &pair.access)
            }
            Err(Error::Auth(AuthError::RefreshRejected { status })) => {
                warn!(status, "Refresh token rejected");
                self.signal(InvalidationReason::RefreshRejected { status });
                None
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                None
            }
        }
    }

    fn replay(&self, request: &ApiRequest, token: &AccessToken) -> Option<ApiRequest> {
        match request.replay_with(token) {
            Ok(replay) => Some(replay),
            Err(e) => {
                warn!(error = %e, "Could not rebuild request with new token");
                None
            }
        }
    }

    fn signal(&self, reason: InvalidationReason) {
        // No subscribers is fine: nobody is tracking the session.
        let _ = self.invalidated.send(SessionInvalidated { reason });
    }
}
