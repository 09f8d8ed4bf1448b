//! Outbound request description.
//!
//! An [`ApiRequest`] can be turned into a `reqwest::Request` any number of
//! times, which lets the recovery path replay it after a token refresh even
//! when the body is a multipart upload.

use std::fmt;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Url};
use serde::Serialize;

use learnverse_core::error::InvalidInputError;
use learnverse_core::model::UploadFile;
use learnverse_core::{AccessToken, Result};

/// Marker header telling the authorizer to leave the request alone.
///
/// Stripped before the request is sent.
pub const SKIP_AUTHORIZATION_HEADER: &str = "x-skip-authorization";

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text { name: String, value: String },
    File { name: String, file: UploadFile },
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormField::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(name: impl Into<String>, file: UploadFile) -> Self {
        FormField::File {
            name: name.into(),
            file,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormField>),
}

/// An API call plus its replay count.
#[derive(Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: RequestBody,
    skip_authorization: bool,
    attempt: u8,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            skip_authorization: false,
            attempt: 0,
        }
    }

    /// Append query parameters from a flat serializable struct.
    ///
    /// `None` fields are skipped; sequences become repeated keys.
    pub fn query<Q: Serialize>(mut self, params: &Q) -> Result<Self> {
        let value = serde_json::to_value(params).map_err(invalid)?;
        let serde_json::Value::Object(map) = value else {
            return Err(InvalidInputError::Other {
                message: "query parameters must serialize to an object".to_string(),
            }
            .into());
        };

        {
            let mut pairs = self.url.query_pairs_mut();
            for (key, value) in &map {
                match value {
                    serde_json::Value::Null => {}
                    serde_json::Value::Array(items) => {
                        for item in items {
                            pairs.append_pair(key, &scalar(item));
                        }
                    }
                    other => {
                        pairs.append_pair(key, &scalar(other));
                    }
                }
            }
        }

        if self.url.query() == Some("") {
            self.url.set_query(None);
        }
        Ok(self)
    }

    /// Set a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body).map_err(invalid)?);
        Ok(self)
    }

    /// Set a multipart body.
    pub fn multipart(mut self, fields: Vec<FormField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    /// Add a header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(invalid)?;
        let value = HeaderValue::from_str(value).map_err(invalid)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Supply the Authorization header manually and opt out of automatic
    /// authorization and refresh.
    pub fn with_manual_bearer(mut self, token: &AccessToken) -> Result<Self> {
        self.set_bearer(token)?;
        self.headers.insert(
            HeaderName::from_static(SKIP_AUTHORIZATION_HEADER),
            HeaderValue::from_static("true"),
        );
        Ok(self)
    }

    /// Opt out of automatic authorization and refresh.
    pub fn skip_authorization(mut self) -> Self {
        self.skip_authorization = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// 0 for the original request, 1 for its replay.
    pub fn attempt(&self) -> u8 {
        self.attempt
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The bearer token currently attached, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.header_value(AUTHORIZATION.as_str())
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    /// True if flagged at the call site or carrying the marker header.
    pub fn skips_authorization(&self) -> bool {
        self.skip_authorization || self.headers.contains_key(SKIP_AUTHORIZATION_HEADER)
    }

    /// Convert a marker header into the call-site flag and drop the header.
    pub(crate) fn take_skip_marker(&mut self) -> bool {
        if self.headers.remove(SKIP_AUTHORIZATION_HEADER).is_some() {
            self.skip_authorization = true;
        }
        self.skip_authorization
    }

    /// Set `Authorization: Bearer <token>`, replacing any existing value.
    pub fn set_bearer(&mut self, token: &AccessToken) -> Result<()> {
        let mut value = HeaderValue::from_str(&token.bearer()).map_err(invalid)?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// A copy of this request for its single replay, carrying `token`.
    pub fn replay_with(&self, token: &AccessToken) -> Result<Self> {
        let mut replay = self.clone();
        replay.set_bearer(token)?;
        replay.attempt = self.attempt.saturating_add(1);
        Ok(replay)
    }

    /// Build a sendable request for `client`.
    pub(crate) fn build(&self, client: &reqwest::Client) -> Result<reqwest::Request> {
        let builder = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());

        let builder = match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)?),
        };

        Ok(builder.build()?)
    }
}

fn build_form(fields: &[FormField]) -> Result<Form> {
    let mut form = Form::new();
    for field in fields {
        form = match field {
            FormField::Text { name, value } => form.text(name.clone(), value.clone()),
            FormField::File { name, file } => {
                let part = Part::bytes(file.content.to_vec())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime_type)?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn invalid(err: impl fmt::Display) -> learnverse_core::Error {
    InvalidInputError::Other {
        message: err.to_string(),
    }
    .into()
}

// Headers may carry tokens; only show their names.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("skip_authorization", &self.skip_authorization)
            .field("attempt", &self.attempt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnverse_core::model::ActivityFilter;

    fn url() -> Url {
        Url::parse("https://api.learnverse.app/api/activities/filter").unwrap()
    }

    #[test]
    fn query_skips_none_fields() {
        let filter = ActivityFilter {
            category: Some("chess".into()),
            page: 1,
            size: 10,
            ..Default::default()
        };
        let request = ApiRequest::new(Method::GET, url()).query(&filter).unwrap();
        assert_eq!(request.url().query(), Some("category=chess&page=1&size=10"));
    }

    #[test]
    fn header_accepts_mixed_case_names() {
        let request = ApiRequest::new(Method::GET, url())
            .header("Accept", "text/event-stream")
            .unwrap();
        assert_eq!(request.header_value("accept"), Some("text/event-stream"));
    }

    #[test]
    fn header_rejects_invalid_names() {
        let result = ApiRequest::new(Method::GET, url()).header("bad header", "x");
        assert!(matches!(result, Err(learnverse_core::Error::InvalidInput(_))));
    }

    #[test]
    fn replay_replaces_authorization_and_counts() {
        let mut request = ApiRequest::new(Method::GET, url());
        request.set_bearer(&AccessToken::new("A1")).unwrap();

        let replay = request.replay_with(&AccessToken::new("A2")).unwrap();
        assert_eq!(replay.bearer_token(), Some("A2"));
        assert_eq!(replay.attempt(), 1);
        assert_eq!(request.attempt(), 0);
    }

    #[test]
    fn marker_header_is_taken() {
        let mut request = ApiRequest::new(Method::GET, url())
            .header(SKIP_AUTHORIZATION_HEADER, "true")
            .unwrap();
        assert!(request.skips_authorization());
        assert!(request.take_skip_marker());
        assert!(request.header_value(SKIP_AUTHORIZATION_HEADER).is_none());
        assert!(request.skips_authorization());
    }

    #[test]
    fn debug_hides_header_values() {
        let request = ApiRequest::new(Method::GET, url())
            .with_manual_bearer(&AccessToken::new("very-secret"))
            .unwrap();
        assert!(!format!("{:?}", request).contains("very-secret"));
    }

    #[test]
    fn multipart_builds_repeatedly() {
        let client = reqwest::Client::new();
        let request = ApiRequest::new(Method::POST, url()).multipart(vec![
            FormField::text("content", "hello"),
            FormField::file(
                "image",
                UploadFile::new("cat.png", "image/png", vec![1u8, 2, 3]),
            ),
        ]);

        assert!(request.build(&client).is_ok());
        assert!(request.build(&client).is_ok());
    }
}
