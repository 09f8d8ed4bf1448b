//! learnverse-core - Core types and traits for the LearnVerse API client.

pub mod credentials;
pub mod error;
pub mod model;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{Credentials, Registration};
pub use error::Error;
pub use session::{CredentialRecord, SessionState};
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::CredentialBackend;
pub use types::{BaseUrl, Email};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
