//! Tutor verification workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationState {
    Pending,
    Approved,
    Rejected,
    NotSubmitted,
}

/// Result of `GET api/tutor-verification/status/{email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    pub status: VerificationState,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// A verification application as listed for administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorVerification {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub document_url: Option<String>,
    pub status: VerificationState,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}
