//! Error types for the LearnVerse client.
//!
//! A single error type with explicit variants for transport, authentication,
//! API, input validation and credential storage failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for LearnVerse client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, protocol).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (rejected credentials, expired session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from the API.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Input rejected locally before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential persistence failures.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Message suitable for showing to the user.
    ///
    /// Prefers the server's own message when the API supplied one.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(api) => api
                .message
                .clone()
                .or_else(|| api.error.clone())
                .unwrap_or_else(|| format!("Request failed with status {}", api.status)),
            Error::Auth(AuthError::Unauthorized { message: Some(message) }) => message.clone(),
            Error::Auth(_) => "Your session has expired. Please log in again.".to_string(),
            Error::Transport(TransportError::Timeout) => {
                "The server took too long to respond.".to_string()
            }
            Error::Transport(_) => "Could not reach the server. Check your connection.".to_string(),
            Error::InvalidInput(err) => err.to_string(),
            Error::Storage(err) => err.to_string(),
        }
    }

    /// True if the error is a terminal authentication failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Auth(AuthError::Unauthorized { .. }))
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Connect or read timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The API answered 401 and the session could not be recovered.
    #[error("unauthorized")]
    Unauthorized { message: Option<String> },

    /// No refresh token is stored.
    #[error("no refresh token available")]
    RefreshTokenMissing,

    /// The refresh endpoint rejected the refresh token.
    #[error("refresh token rejected with HTTP {status}")]
    RefreshRejected { status: u16 },

    /// The refresh exchange failed for another reason.
    #[error("token refresh failed: {message}")]
    RefreshFailed { message: String },
}

/// A non-success response from the API.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Short error code, if the server sent one.
    pub error: Option<String>,
    /// Human-readable message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// A 2xx response whose body did not match the expected shape.
    pub fn malformed(status: u16, reason: impl fmt::Display) -> Self {
        Self::new(
            status,
            Some("MalformedResponse".to_string()),
            Some(format!("unexpected response body: {}", reason)),
        )
    }

    /// True for 5xx statuses.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// A required field was empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Invalid email address.
    #[error("invalid email '{value}': {reason}")]
    Email { value: String, reason: String },

    /// Invalid base URL.
    #[error("invalid API URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Review rating outside 1..=5.
    #[error("rating must be between 1 and 5, got {value}")]
    Rating { value: u8 },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The backing file exists but could not be parsed.
    #[error("corrupt credential file {path}: {message}")]
    Corrupt { path: String, message: String },

    /// A background storage task could not complete.
    #[error("storage task failed: {message}")]
    Task { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_message() {
        let err = Error::Api(ApiError::new(
            409,
            Some("Conflict".to_string()),
            Some("Already enrolled".to_string()),
        ));
        assert_eq!(err.user_message(), "Already enrolled");
    }

    #[test]
    fn user_message_falls_back_to_status() {
        let err = Error::Api(ApiError::new(502, None, None));
        assert_eq!(err.user_message(), "Request failed with status 502");
    }

    #[test]
    fn api_error_display_includes_parts() {
        let err = ApiError::new(404, Some("NotFound".into()), Some("no such activity".into()));
        assert_eq!(err.to_string(), "HTTP 404 [NotFound]: no such activity");
    }

    #[test]
    fn unauthorized_is_detected() {
        let err = Error::Auth(AuthError::Unauthorized { message: None });
        assert!(err.is_unauthorized());
        assert!(!Error::Auth(AuthError::RefreshTokenMissing).is_unauthorized());
    }
}
