//! HTTP client for the LearnVerse API.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, instrument, trace};

use learnverse_core::error::{ApiError, AuthError};
use learnverse_core::{BaseUrl, Result};
use learnverse_store::CredentialStore;

use crate::authenticator::{Authenticator, SessionInvalidated, TokenRefresher};
use crate::authorizer::Authorizer;
use crate::config::ClientConfig;
use crate::endpoints::ErrorResponse;
use crate::request::ApiRequest;

/// Authenticated client shared by every repository.
///
/// Each call runs authorize, send, and on a 401 a single
/// refresh-and-replay. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    store: CredentialStore,
    authorizer: Authorizer,
    authenticator: Authenticator,
}

impl ApiClient {
    /// Build a client and its dedicated refresh client from `config`.
    pub fn new(config: ClientConfig, store: CredentialStore) -> Result<Self> {
        let http = config.http_client()?;
        let refresher = TokenRefresher::new(&config)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                authorizer: Authorizer::new(store.clone()),
                authenticator: Authenticator::new(store.clone(), refresher),
                store,
                config,
            }),
        })
    }

    pub fn base_url(&self) -> &BaseUrl {
        self.inner.config.base_url()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &CredentialStore {
        &self.inner.store
    }

    /// Events fired when a 401 could not be recovered.
    pub fn subscribe_invalidation(&self) -> broadcast::Receiver<SessionInvalidated> {
        self.inner.authenticator.subscribe()
    }

    /// Start a request to a slash-separated endpoint path.
    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest::new(method, self.base_url().endpoint(path))
    }

    /// Start a request to `path` followed by extra, individually encoded segments.
    pub fn request_at<I, S>(&self, method: Method, path: &str, segments: I) -> ApiRequest
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .chain(segments.into_iter().map(|s| s.as_ref().to_string()))
            .collect();
        ApiRequest::new(method, self.base_url().join_segments(base))
    }

    pub fn get(&self, path: &str) -> ApiRequest {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> ApiRequest {
        self.request(Method::POST, path)
    }

    /// Run the full pipeline and return a successful response.
    ///
    /// A 401 that survives recovery becomes [`AuthError::Unauthorized`];
    /// any other non-success status becomes [`ApiError`].
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, mut request: ApiRequest) -> Result<reqwest::Response> {
        self.inner.authorizer.authorize(&mut request);

        let mut response = self.dispatch(&request).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(replay) = self.inner.authenticator.authenticate(&request).await {
                debug!("Replaying request with refreshed token");
                response = self.dispatch(&replay).await?;
            }
        }

        check_status(response).await
    }

    /// Execute and decode a JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::malformed(status, e).into())
    }

    /// Execute and discard the body.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.execute(request).await?;
        Ok(())
    }

    /// Execute and return the raw body.
    pub async fn send_bytes(&self, request: ApiRequest) -> Result<Bytes> {
        let response = self.execute(request).await?;
        Ok(response.bytes().await?)
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let built = request.build(&self.inner.http)?;
        let response = self.inner.http.execute(built).await?;
        trace!(status = %response.status(), attempt = request.attempt(), "API response");
        Ok(response)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let (error, message) = match response.json::<ErrorResponse>().await {
        Ok(body) => (body.error, body.message),
        Err(_) => (None, None),
    };

    if status == StatusCode::UNAUTHORIZED {
        return Err(AuthError::Unauthorized { message }.into());
    }

    Err(ApiError::new(status.as_u16(), error, message).into())
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", self.base_url())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnverse_store::MemoryCredentialBackend;

    #[tokio::test]
    async fn request_at_encodes_segments() {
        let store = CredentialStore::open(MemoryCredentialBackend::new())
            .await
            .unwrap();
        let config = ClientConfig::new(BaseUrl::new("https://api.learnverse.app/v1").unwrap());
        let client = ApiClient::new(config, store).unwrap();

        let request = client.request_at(
            Method::GET,
            "api/tutor-verification/status",
            ["tutor@learnverse.app"],
        );
        assert_eq!(
            request.url().as_str(),
            "https://api.learnverse.app/v1/api/tutor-verification/status/tutor@learnverse.app"
        );
    }
}
