//! Domain models exchanged with the API.

mod activity;
mod community;
mod enrollment;
mod review;
mod upload;
mod verification;

pub use activity::{Activity, ActivityFilter, Page, ProximityQuery};
pub use community::{Comment, Post};
pub use enrollment::Enrollment;
pub use review::{NewReview, Review};
pub use upload::UploadFile;
pub use verification::{TutorVerification, VerificationState, VerificationStatus};
