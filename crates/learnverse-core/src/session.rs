//! Persisted credential record and derived session state.

use std::fmt;

use crate::tokens::{AccessToken, RefreshToken};

/// Everything the client persists between runs.
///
/// Owned by the credential store; only its save and clear operations
/// mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
    /// The user dismissed interest selection; used to pick the landing screen.
    pub interests_skipped: bool,
}

impl CredentialRecord {
    /// True if a non-blank access token is stored.
    pub fn has_access_token(&self) -> bool {
        self.access_token.as_ref().is_some_and(|t| !t.is_blank())
    }

    /// True if nothing beyond defaults is stored.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && !self.interests_skipped
    }
}

/// Top-level authentication state shown by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Stored credentials are still being read.
    #[default]
    Loading,
    /// No usable credentials; the user must log in or register.
    Unauthenticated,
    /// Logged in, but the account has no recorded interests yet.
    NeedsInterestSelection,
    /// Logged in and ready.
    Authenticated,
}

impl SessionState {
    /// True for both logged-in states.
    pub fn is_logged_in(self) -> bool {
        match self {
            SessionState::NeedsInterestSelection | SessionState::Authenticated => true,
            SessionState::Loading | SessionState::Unauthenticated => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Loading => "loading",
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::NeedsInterestSelection => "needs interest selection",
            SessionState::Authenticated => "authenticated",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty() {
        let record = CredentialRecord::default();
        assert!(record.is_empty());
        assert!(!record.has_access_token());
    }

    #[test]
    fn blank_access_token_does_not_count() {
        let record = CredentialRecord {
            access_token: Some(AccessToken::new(" ")),
            ..Default::default()
        };
        assert!(!record.has_access_token());
        assert!(!record.is_empty());
    }

    #[test]
    fn logged_in_states() {
        assert!(SessionState::Authenticated.is_logged_in());
        assert!(SessionState::NeedsInterestSelection.is_logged_in());
        assert!(!SessionState::Loading.is_logged_in());
        assert!(!SessionState::Unauthenticated.is_logged_in());
    }
}
