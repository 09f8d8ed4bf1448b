//! Login and registration credentials.

use std::fmt;

use crate::error::InvalidInputError;
use crate::types::Email;

/// Login credentials.
///
/// The password is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use learnverse_core::Credentials;
///
/// let creds = Credentials::new("alice@example.com", "hunter22").unwrap();
/// assert_eq!(creds.email().as_str(), "alice@example.com");
/// assert!(Credentials::new("alice@example.com", "").is_err());
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: Email,
    password: String,
}

impl Credentials {
    /// Validate and create login credentials.
    pub fn new(email: &str, password: impl Into<String>) -> Result<Self, InvalidInputError> {
        let email = Email::new(email)?;
        let password = required("password", password.into())?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// New-account details.
#[derive(Clone)]
pub struct Registration {
    name: String,
    credentials: Credentials,
}

impl Registration {
    /// Validate and create registration details.
    pub fn new(
        name: impl Into<String>,
        email: &str,
        password: impl Into<String>,
    ) -> Result<Self, InvalidInputError> {
        let name = required("name", name.into())?;
        let credentials = Credentials::new(email, password)?;
        Ok(Self { name, credentials })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        self.credentials.email()
    }

    pub fn password(&self) -> &str {
        self.credentials.password()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", self.credentials.email())
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn required(field: &'static str, value: String) -> Result<String, InvalidInputError> {
    if value.trim().is_empty() {
        Err(InvalidInputError::Required { field })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("alice@example.com", "secret123").unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice@example.com"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn blank_password_is_rejected() {
        let err = Credentials::new("alice@example.com", "  ").unwrap_err();
        assert!(matches!(err, InvalidInputError::Required { field: "password" }));
    }

    #[test]
    fn registration_requires_name() {
        let err = Registration::new("", "bob@example.com", "pw").unwrap_err();
        assert!(matches!(err, InvalidInputError::Required { field: "name" }));
    }

    #[test]
    fn registration_hides_password() {
        let reg = Registration::new("Bob", "bob@example.com", "topsecret").unwrap();
        assert!(!format!("{:?}", reg).contains("topsecret"));
        assert_eq!(reg.name(), "Bob");
    }
}
