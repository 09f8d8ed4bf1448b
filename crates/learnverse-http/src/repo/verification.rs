//! Tutor verification applications.

use reqwest::Method;
use tracing::instrument;

use learnverse_core::model::{UploadFile, VerificationStatus};
use learnverse_core::{Email, Result};

use crate::client::ApiClient;
use crate::endpoints::{TUTOR_VERIFICATION_REGISTER, TUTOR_VERIFICATION_STATUS};
use crate::request::FormField;

/// A tutor's application for verification.
#[derive(Debug, Clone)]
pub struct TutorApplication {
    pub name: String,
    pub email: Email,
    pub subject: String,
    /// Identity or qualification document.
    pub document: UploadFile,
}

#[derive(Debug, Clone)]
pub struct TutorVerificationRepository {
    client: ApiClient,
}

impl TutorVerificationRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submit an application as a multipart upload.
    #[instrument(skip(self, application), fields(email = %application.email))]
    pub async fn register(&self, application: TutorApplication) -> Result<VerificationStatus> {
        let fields = vec![
            FormField::text("name", application.name),
            FormField::text("email", application.email.as_str()),
            FormField::text("subject", application.subject),
            FormField::file("document", application.document),
        ];

        let request = self
            .client
            .post(TUTOR_VERIFICATION_REGISTER)
            .multipart(fields);
        self.client.send_json(request).await
    }

    #[instrument(skip(self), fields(email = %email))]
    pub async fn status(&self, email: &Email) -> Result<VerificationStatus> {
        let request =
            self.client
                .request_at(Method::GET, TUTOR_VERIFICATION_STATUS, [email.as_str()]);
        self.client.send_json(request).await
    }
}
