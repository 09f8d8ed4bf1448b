//! Activity reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidInputError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub activity_id: i64,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A review about to be submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl NewReview {
    /// Create a review; the rating must be 1 to 5 stars.
    pub fn new(rating: u8, comment: Option<String>) -> Result<Self, InvalidInputError> {
        if !(1..=5).contains(&rating) {
            return Err(InvalidInputError::Rating { value: rating });
        }
        let comment = comment.filter(|c| !c.trim().is_empty());
        Ok(Self { rating, comment })
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }
}
