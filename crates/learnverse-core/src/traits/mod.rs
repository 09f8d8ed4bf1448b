//! Core traits for pluggable client behavior.

mod credential_backend;

pub use credential_backend::CredentialBackend;
