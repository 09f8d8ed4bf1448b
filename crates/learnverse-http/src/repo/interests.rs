use tracing::instrument;

use learnverse_core::Result;
use learnverse_core::error::InvalidInputError;

use crate::client::ApiClient;
use crate::endpoints::{
    InterestsResponse, SaveInterestsRequest, USER_INTERESTS, USER_INTERESTS_AVAILABLE,
};

/// The signed-in user's learning interests.
#[derive(Debug, Clone)]
pub struct InterestsRepository {
    client: ApiClient,
}

impl InterestsRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn my_interests(&self) -> Result<Vec<String>> {
        let response: InterestsResponse =
            self.client.send_json(self.client.get(USER_INTERESTS)).await?;
        Ok(response.interests)
    }

    /// Interests the user can choose from.
    #[instrument(skip(self))]
    pub async fn available(&self) -> Result<Vec<String>> {
        let response: InterestsResponse = self
            .client
            .send_json(self.client.get(USER_INTERESTS_AVAILABLE))
            .await?;
        Ok(response.interests)
    }

    /// Replace the user's interests. At least one is required.
    #[instrument(skip(self))]
    pub async fn save(&self, interests: &[String]) -> Result<()> {
        if interests.iter().all(|i| i.trim().is_empty()) {
            return Err(InvalidInputError::Required { field: "interests" }.into());
        }

        let request = self
            .client
            .post(USER_INTERESTS)
            .json(&SaveInterestsRequest { interests })?;
        self.client.send_empty(request).await
    }
}
