//! Domain repositories.
//!
//! Thin pass-throughs over [`ApiClient`](crate::ApiClient): they shape the
//! request, decode the response and translate failures. They never retry
//! and never cache.

mod activities;
mod admin;
mod assistant;
mod auth;
mod community;
mod documents;
mod enrollment;
mod interests;
mod reviews;
mod verification;

pub use activities::ActivityRepository;
pub use admin::AdminRepository;
pub use assistant::{AssistantRepository, ChatStream};
pub use auth::AuthRepository;
pub use community::CommunityRepository;
pub use documents::DocumentRepository;
pub use enrollment::EnrollmentRepository;
pub use interests::InterestsRepository;
pub use reviews::ReviewRepository;
pub use verification::{TutorApplication, TutorVerificationRepository};
