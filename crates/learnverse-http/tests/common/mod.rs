//! Shared helpers for the mock API tests.

#![allow(dead_code)]

use learnverse_core::{AccessToken, BaseUrl, CredentialRecord, RefreshToken};
use learnverse_http::{ApiClient, ClientConfig};
use learnverse_store::{CredentialStore, MemoryCredentialBackend};
use wiremock::MockServer;

/// Base URL pointing at a mock server.
pub fn mock_base_url(server: &MockServer) -> BaseUrl {
    BaseUrl::new(server.uri()).unwrap()
}

/// A credential record holding the given tokens.
pub fn record(access: Option<&str>, refresh: Option<&str>) -> CredentialRecord {
    CredentialRecord {
        access_token: access.map(AccessToken::new),
        refresh_token: refresh.map(RefreshToken::new),
        interests_skipped: false,
    }
}

/// A client against `server` whose store starts from `backend`.
pub async fn client_with_backend(server: &MockServer, backend: MemoryCredentialBackend) -> ApiClient {
    let store = CredentialStore::open(backend).await.unwrap();
    ApiClient::new(ClientConfig::new(mock_base_url(server)), store).unwrap()
}

/// A client against `server` with a seeded store, plus a handle on what it persists.
pub async fn client_with(
    server: &MockServer,
    access: Option<&str>,
    refresh: Option<&str>,
) -> (ApiClient, MemoryCredentialBackend) {
    let backend = MemoryCredentialBackend::with_record(record(access, refresh));
    let client = client_with_backend(server, backend.clone()).await;
    (client, backend)
}

/// Requests the server saw for `path`, in arrival order.
pub async fn requests_to(server: &MockServer, path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect()
}

/// The Authorization header of a received request.
pub fn authorization(request: &wiremock::Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
