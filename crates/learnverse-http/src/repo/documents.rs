//! Downloading verification documents with a caller-supplied token.

use bytes::Bytes;
use reqwest::{Method, Url};
use tracing::instrument;

use learnverse_core::error::InvalidInputError;
use learnverse_core::{AccessToken, Result};

use crate::client::ApiClient;
use crate::request::ApiRequest;

/// Fetches protected documents (verification scans) by absolute URL.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    client: ApiClient,
}

impl DocumentRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET <url>` with a caller-supplied bearer token.
    ///
    /// The URL may point outside the API base, so the request bypasses the
    /// automatic authorizer and refresh.
    #[instrument(skip(self, token))]
    pub async fn fetch(&self, url: &str, token: &AccessToken) -> Result<Bytes> {
        let url = Url::parse(url).map_err(|e| InvalidInputError::Other {
            message: format!("invalid document URL '{}': {}", url, e),
        })?;

        let request = ApiRequest::new(Method::GET, url).with_manual_bearer(token)?;
        self.client.send_bytes(request).await
    }
}
