use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student's enrollment in an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i64,
    pub activity_id: i64,
    #[serde(default)]
    pub activity_title: Option<String>,
    #[serde(default)]
    pub enrolled_at: Option<DateTime<Utc>>,
}
