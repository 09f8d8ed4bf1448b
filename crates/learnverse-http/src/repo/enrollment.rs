use reqwest::Method;
use tracing::instrument;

use learnverse_core::Result;
use learnverse_core::model::Enrollment;

use crate::client::ApiClient;
use crate::endpoints::{ENROLLMENTS, ENROLLMENTS_MINE};

#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    client: ApiClient,
}

impl EnrollmentRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST api/enrollments/{activityId}`.
    #[instrument(skip(self))]
    pub async fn enroll(&self, activity_id: i64) -> Result<Enrollment> {
        let request = self
            .client
            .request_at(Method::POST, ENROLLMENTS, [activity_id.to_string()]);
        self.client.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn my_enrollments(&self) -> Result<Vec<Enrollment>> {
        self.client.send_json(self.client.get(ENROLLMENTS_MINE)).await
    }
}
