//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the LearnVerse API.
///
/// Must use HTTPS, or HTTP for localhost. Endpoint paths are appended as
/// path segments, so a base with a path prefix (`https://host/v1`) keeps it.
///
/// # Example
///
/// ```
/// use learnverse_core::BaseUrl;
///
/// let base = BaseUrl::new("https://api.learnverse.app/").unwrap();
/// assert_eq!(base.endpoint("auth/login").as_str(),
///            "https://api.learnverse.app/auth/login");
///
/// let prefixed = BaseUrl::new("https://api.learnverse.app/v1").unwrap();
/// assert_eq!(prefixed.endpoint("auth/login").as_str(),
///            "https://api.learnverse.app/v1/auth/login");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Create a new base URL from a string, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::BaseUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;
        Ok(Self(url))
    }

    /// Build the absolute URL for a slash-separated endpoint path.
    pub fn endpoint(&self, path: &str) -> Url {
        self.join_segments(path.split('/').filter(|s| !s.is_empty()))
    }

    /// Build an absolute URL from individual path segments.
    ///
    /// Each segment is percent-encoded, so user-supplied values such as
    /// email addresses cannot inject extra path components.
    pub fn join_segments<I, S>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.0.clone();
        // Cannot fail: validate() rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment.as_ref());
            }
        }
        url
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        let scheme = url.scheme();
        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BaseUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let base = BaseUrl::new("https://api.learnverse.app").unwrap();
        assert_eq!(base.host(), Some("api.learnverse.app"));
    }

    #[test]
    fn valid_localhost_http() {
        let base = BaseUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            base.endpoint("api/activities/my-feed").as_str(),
            "http://127.0.0.1:8080/api/activities/my-feed"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(BaseUrl::new("http://api.learnverse.app").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(BaseUrl::new("/auth/login").is_err());
    }

    #[test]
    fn segments_are_encoded() {
        let base = BaseUrl::new("https://api.learnverse.app").unwrap();
        let url = base.join_segments(["api", "tutor-verification", "status", "a/b@x.io"]);
        assert_eq!(
            url.as_str(),
            "https://api.learnverse.app/api/tutor-verification/status/a%2Fb@x.io"
        );
    }
}
