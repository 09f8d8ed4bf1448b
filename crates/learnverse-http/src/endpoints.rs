//! LearnVerse REST endpoint paths and wire types.
//!
//! Paths are relative to the configured base URL.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth
// ============================================================================

pub const AUTH_REGISTER: &str = "auth/register";
pub const AUTH_LOGIN: &str = "auth/login";
pub const AUTH_REFRESH: &str = "auth/refresh";
pub const AUTH_LOGOUT: &str = "auth/logout";

// ============================================================================
// User interests
// ============================================================================

pub const USER_INTERESTS: &str = "api/user/interests";
pub const USER_INTERESTS_AVAILABLE: &str = "api/user/interests/available";

// ============================================================================
// Activities, enrollment and reviews
// ============================================================================

pub const ACTIVITIES: &str = "api/activities";
pub const ACTIVITIES_MY_FEED: &str = "api/activities/my-feed";
pub const ACTIVITIES_FILTER: &str = "api/activities/filter";
pub const ACTIVITIES_PROXIMITY: &str = "api/activities/filter/proximity";
pub const ACTIVITIES_NATURAL_SEARCH: &str = "api/activities/search/natural";
/// `api/activities/{id}/reviews`
pub const REVIEWS_SEGMENT: &str = "reviews";

pub const ENROLLMENTS: &str = "api/enrollments";
pub const ENROLLMENTS_MINE: &str = "api/enrollments/my";

// ============================================================================
// Community
// ============================================================================

pub const COMMUNITY_FEED: &str = "api/community/feed";
pub const COMMUNITY_POSTS: &str = "api/community/posts";
pub const COMMUNITY_USERS: &str = "api/community/users";

// ============================================================================
// Tutor verification and admin
// ============================================================================

pub const TUTOR_VERIFICATION_REGISTER: &str = "api/tutor-verification/register";
pub const TUTOR_VERIFICATION_STATUS: &str = "api/tutor-verification/status";
pub const ADMIN_VERIFICATIONS: &str = "api/admin/tutor-verifications";
pub const ADMIN_VERIFICATIONS_PENDING: &str = "api/admin/tutor-verifications/pending";

// ============================================================================
// Assistant
// ============================================================================

pub const ASSISTANT_CHAT: &str = "api/assistant/chat";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for `auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for `auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from login and registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
}

impl AuthResponse {
    /// True if the account has at least one recorded interest.
    pub fn has_interests(&self) -> bool {
        self.interests.as_ref().is_some_and(|i| !i.is_empty())
    }
}

/// Request body for `auth/refresh` and `auth/logout`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response from `auth/refresh`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Request body for `api/user/interests`.
#[derive(Debug, Serialize)]
pub struct SaveInterestsRequest<'a> {
    pub interests: &'a [String],
}

/// Response listing interests.
#[derive(Debug, Deserialize)]
pub struct InterestsResponse {
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Request body for `api/activities/search/natural`.
#[derive(Debug, Serialize)]
pub struct NaturalSearchRequest<'a> {
    pub query: &'a str,
    pub page: u32,
    pub size: u32,
}

/// Query for paged listings without other filters.
#[derive(Debug, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
}

/// Request body for adding a comment.
#[derive(Debug, Serialize)]
pub struct CommentRequest<'a> {
    pub content: &'a str,
}

/// Request body for rejecting a verification.
#[derive(Debug, Serialize)]
pub struct RejectRequest<'a> {
    pub reason: &'a str,
}

/// Request body for the assistant chat stream.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
