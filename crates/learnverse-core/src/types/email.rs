//! Email address type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InvalidInputError;

/// A syntactically plausible email address (`local@domain.tld`).
///
/// The server performs the authoritative check; this only catches obvious
/// typos before a request is sent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(s: &str) -> Result<Self, InvalidInputError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InvalidInputError::Required { field: "email" });
        }

        let invalid = |reason: &str| InvalidInputError::Email {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (local, domain) = s.split_once('@').ok_or_else(|| invalid("missing '@'"))?;
        if local.is_empty() {
            return Err(invalid("empty local part"));
        }
        if domain.contains('@') {
            return Err(invalid("more than one '@'"));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(invalid("domain must contain a dot"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(invalid("contains whitespace"));
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = InvalidInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
