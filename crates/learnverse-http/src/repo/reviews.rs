use reqwest::Method;
use tracing::instrument;

use learnverse_core::Result;
use learnverse_core::model::{NewReview, Review};

use crate::client::ApiClient;
use crate::endpoints::{ACTIVITIES, REVIEWS_SEGMENT};

#[derive(Debug, Clone)]
pub struct ReviewRepository {
    client: ApiClient,
}

impl ReviewRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, activity_id: i64) -> Result<Vec<Review>> {
        let request = self.client.request_at(
            Method::GET,
            ACTIVITIES,
            [activity_id.to_string().as_str(), REVIEWS_SEGMENT],
        );
        self.client.send_json(request).await
    }

    #[instrument(skip(self, review), fields(rating = review.rating()))]
    pub async fn submit(&self, activity_id: i64, review: &NewReview) -> Result<Review> {
        let request = self
            .client
            .request_at(
                Method::POST,
                ACTIVITIES,
                [activity_id.to_string().as_str(), REVIEWS_SEGMENT],
            )
            .json(review)?;
        self.client.send_json(request).await
    }
}
