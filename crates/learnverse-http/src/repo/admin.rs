//! Administrator review of tutor verifications.

use reqwest::Method;
use tracing::{info, instrument};

use learnverse_core::Result;
use learnverse_core::error::InvalidInputError;
use learnverse_core::model::TutorVerification;

use crate::client::ApiClient;
use crate::endpoints::{ADMIN_VERIFICATIONS, ADMIN_VERIFICATIONS_PENDING, RejectRequest};

#[derive(Debug, Clone)]
pub struct AdminRepository {
    client: ApiClient,
}

impl AdminRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn pending_verifications(&self) -> Result<Vec<TutorVerification>> {
        self.client
            .send_json(self.client.get(ADMIN_VERIFICATIONS_PENDING))
            .await
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, verification_id: i64) -> Result<()> {
        let request = self.client.request_at(
            Method::POST,
            ADMIN_VERIFICATIONS,
            [verification_id.to_string().as_str(), "approve"],
        );
        self.client.send_empty(request).await?;
        info!(verification_id, "Verification approved");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn reject(&self, verification_id: i64, reason: &str) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(InvalidInputError::Required { field: "reason" }.into());
        }

        let request = self
            .client
            .request_at(
                Method::POST,
                ADMIN_VERIFICATIONS,
                [verification_id.to_string().as_str(), "reject"],
            )
            .json(&RejectRequest { reason })?;
        self.client.send_empty(request).await?;
        info!(verification_id, "Verification rejected");
        Ok(())
    }
}
