//! Pure request construction.
//!
//! [`RequestBuilder`] turns a [`RequestMetadata`] and a [`RequestBody`] into a
//! plain-data [`Request`]. It performs no I/O and holds no mutable state, so
//! concurrent calls never interfere. Authentication is attached afterwards by
//! the client and the request is handed to the transport.

use crate::{metadata::RequestMetadata, ApiRoot, Error, Result};
use http::{header, HeaderMap, HeaderValue, Method};
use serde::Serialize;
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The payload of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// A JSON document, sent as UTF-8 with `content-type: application/json`.
    Json(serde_json::Value),
    /// Form fields, sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Serializes `value` into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestSerialization`] if `value` cannot be
    /// represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(RequestBody::Json)
            .map_err(|e| Error::RequestSerialization(e.to_string()))
    }

    /// Builds a form body from key/value pairs.
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A fully built request, ready for authentication and sending.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method.
    pub method: Method,
    /// The absolute URL, query string included.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Encoded body bytes, if any.
    pub body: Option<Vec<u8>>,
}

/// Builds [`Request`]s against a fixed [`ApiRoot`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    root: ApiRoot,
    default_headers: HeaderMap,
}

impl RequestBuilder {
    /// Creates a builder for `root` with no default headers.
    pub fn new(root: ApiRoot) -> Self {
        Self {
            root,
            default_headers: HeaderMap::new(),
        }
    }

    /// Sets headers added to every request before the per-request ones.
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Returns the API root.
    pub fn root(&self) -> &ApiRoot {
        &self.root
    }

    /// Builds a request from `metadata` and `body`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpclient::{ApiRoot, RequestBody, RequestBuilder, metadata::RequestMetadata};
    /// use http::Method;
    ///
    /// let builder = RequestBuilder::new(ApiRoot::parse("https://example.com/wp-json").unwrap());
    /// let metadata = RequestMetadata::new(Method::GET, "wp/v2/posts")
    ///     .with_query_param("search", "hello world");
    ///
    /// let request = builder.build(&metadata, RequestBody::Empty).unwrap();
    /// assert_eq!(
    ///     request.url.as_str(),
    ///     "https://example.com/wp-json/wp/v2/posts?search=hello+world"
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the path does not form a valid URL.
    pub fn build(&self, metadata: &RequestMetadata, body: RequestBody) -> Result<Request> {
        let mut url = self.root.join(&metadata.path)?;
        if !metadata.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &metadata.query_params {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = self.default_headers.clone();
        for (name, value) in &metadata.headers {
            headers.insert(name, value.clone());
        }

        let body = match body {
            RequestBody::Empty => None,
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(&value)
                    .map_err(|e| Error::RequestSerialization(e.to_string()))?;
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_CONTENT_TYPE),
                );
                Some(bytes)
            }
            RequestBody::Form(fields) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&fields)
                    .finish();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(FORM_CONTENT_TYPE),
                );
                Some(encoded.into_bytes())
            }
        };

        Ok(Request {
            method: metadata.method.clone(),
            url,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(ApiRoot::parse("http://localhost:8080/wp-json/").unwrap())
    }

    #[test]
    fn test_get_without_body() {
        let metadata = RequestMetadata::new(Method::GET, "wp/v2/settings");
        let request = builder().build(&metadata, RequestBody::Empty).unwrap();

        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url.as_str(),
            "http://localhost:8080/wp-json/wp/v2/settings"
        );
        assert!(request.body.is_none());
        assert!(request.headers.get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_query_params_are_encoded() {
        let metadata = RequestMetadata::new(Method::GET, "wp/v2/posts")
            .with_query_param("search", "a&b c")
            .with_query_param("page", "2");
        let request = builder().build(&metadata, RequestBody::Empty).unwrap();

        assert_eq!(request.url.query(), Some("search=a%26b+c&page=2"));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let metadata = RequestMetadata::new(Method::POST, "wp/v2/settings");
        let body = RequestBody::json(&json!({ "title": "Grüße" })).unwrap();
        let request = builder().build(&metadata, body).unwrap();

        assert_eq!(
            request.headers.get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
        let bytes = request.body.unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"title":"Grüße"}"#);
    }

    #[test]
    fn test_form_body_is_url_encoded() {
        let metadata = RequestMetadata::new(Method::POST, "jwt-auth/v1/token");
        let body = RequestBody::form([("username", "admin"), ("password", "p@ss word")]);
        let request = builder().build(&metadata, body).unwrap();

        assert_eq!(
            request.headers.get(header::CONTENT_TYPE).unwrap(),
            FORM_CONTENT_TYPE
        );
        assert_eq!(
            request.body.unwrap(),
            b"username=admin&password=p%40ss+word".to_vec()
        );
    }

    #[test]
    fn test_default_and_request_headers_are_merged() {
        let mut defaults = HeaderMap::new();
        defaults.insert(header::USER_AGENT, HeaderValue::from_static("wpclient-test"));
        defaults.insert("x-site", HeaderValue::from_static("default"));

        let metadata = RequestMetadata::new(Method::GET, "wp/v2/posts")
            .with_header("x-site", "override")
            .unwrap();
        let request = builder()
            .with_default_headers(defaults)
            .build(&metadata, RequestBody::Empty)
            .unwrap();

        assert_eq!(request.headers.get(header::USER_AGENT).unwrap(), "wpclient-test");
        assert_eq!(request.headers.get("x-site").unwrap(), "override");
    }

    #[test]
    fn test_building_has_no_side_effects() {
        let builder = builder();
        let metadata = RequestMetadata::new(Method::GET, "wp/v2/posts");
        let first = builder.build(&metadata, RequestBody::Empty).unwrap();
        let second = builder.build(&metadata, RequestBody::Empty).unwrap();
        assert_eq!(first.url, second.url);
        assert_eq!(first.headers, second.headers);
    }
}
