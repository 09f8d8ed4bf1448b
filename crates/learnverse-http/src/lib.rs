//! learnverse-http - Authenticated access layer for the LearnVerse API.
//!
//! Every call goes through [`ApiClient`]: the [`Authorizer`] attaches the
//! stored bearer token, and on a 401 the [`Authenticator`] exchanges the
//! refresh token and replays the request once.
//!
//! # Example
//!
//! ```no_run
//! use learnverse_core::BaseUrl;
//! use learnverse_http::{ApiClient, AuthViewModel, ClientConfig};
//! use learnverse_store::{CredentialStore, FileCredentialBackend};
//!
//! # async fn example() -> Result<(), learnverse_core::Error> {
//! let store = CredentialStore::open(FileCredentialBackend::in_dir("/tmp/learnverse")).await?;
//! let config = ClientConfig::new(BaseUrl::new("https://api.learnverse.app")?);
//! let client = ApiClient::new(config, store)?;
//!
//! let session = AuthViewModel::new(client);
//! session.listen_for_invalidation();
//! session.start();
//! session.login("alice@example.com", "hunter22").await?;
//! println!("{}", session.session_state());
//! # Ok(())
//! # }
//! ```

mod authenticator;
mod authorizer;
mod client;
mod config;
pub mod endpoints;
pub mod repo;
mod request;
mod session;
pub mod sse;

pub use authenticator::{Authenticator, InvalidationReason, SessionInvalidated, TokenRefresher};
pub use authorizer::Authorizer;
pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};
pub use request::{ApiRequest, FormField, RequestBody, SKIP_AUTHORIZATION_HEADER};
pub use session::{AuthViewModel, FormState};
