//! Login, registration and logout.

use tracing::{info, instrument};

use learnverse_core::{Credentials, RefreshToken, Registration, Result};

use crate::client::ApiClient;
use crate::endpoints::{
    AUTH_LOGIN, AUTH_LOGOUT, AUTH_REGISTER, AuthResponse, LoginRequest, RefreshRequest,
    RegisterRequest,
};

#[derive(Debug, Clone)]
pub struct AuthRepository {
    client: ApiClient,
}

impl AuthRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST auth/login`. Does not touch the credential store.
    ///
    /// Sent without a bearer token, so a 401 here means bad credentials and
    /// never triggers a token refresh.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let request = self
            .client
            .post(AUTH_LOGIN)
            .skip_authorization()
            .json(&LoginRequest {
                email: credentials.email().as_str(),
                password: credentials.password(),
            })?;

        let response: AuthResponse = self.client.send_json(request).await?;
        info!(has_interests = response.has_interests(), "Logged in");
        Ok(response)
    }

    /// `POST auth/register`.
    #[instrument(skip(self, registration), fields(email = %registration.email()))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        let request = self
            .client
            .post(AUTH_REGISTER)
            .skip_authorization()
            .json(&RegisterRequest {
                name: registration.name(),
                email: registration.email().as_str(),
                password: registration.password(),
            })?;

        let response = self.client.send_json(request).await?;
        info!("Account registered");
        Ok(response)
    }

    /// `POST auth/logout`, invalidating `refresh_token` server-side.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: Option<&RefreshToken>) -> Result<()> {
        let request = self.client.post(AUTH_LOGOUT).json(&RefreshRequest {
            refresh_token: refresh_token.map(RefreshToken::as_str).unwrap_or_default(),
        })?;
        self.client.send_empty(request).await
    }
}
