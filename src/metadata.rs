//! Per-request metadata and configuration types.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Whether a success response may come back without a body.
///
/// This is part of every request so an empty 2xx is never confused with
/// "content expected but missing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyPolicy {
    /// A 2xx response must carry a JSON body.
    #[default]
    Required,
    /// A 2xx response with an empty body yields the target type's default.
    EmptyOk,
}

/// Metadata for an individual API request.
///
/// Carries everything needed to build a single request: method, path
/// relative to the API root, extra headers, query parameters, the
/// [`BodyPolicy`], and optional timeout and cancellation overrides.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path, relative to the API root (e.g. `wp/v2/posts`).
    pub path: String,

    /// Additional headers for this request.
    pub headers: HeaderMap,

    /// Query parameters, appended in insertion order.
    pub query_params: Vec<(String, String)>,

    /// How an empty success body is treated.
    pub body_policy: BodyPolicy,

    /// Overrides the client's default timeout for this request.
    pub timeout: Option<Duration>,

    /// Cancels the request when triggered.
    pub cancellation: Option<CancellationToken>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            body_policy: BodyPolicy::default(),
            timeout: None,
            cancellation: None,
        }
    }

    /// Adds a header to the request. An `Authorization` header is replaced by
    /// the client's auth method.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::InvalidHeader(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::InvalidHeader(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Adds multiple query parameters to the request.
    pub fn with_query_params(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.query_params.extend(params);
        self
    }

    /// Sets how an empty success body is treated.
    pub fn with_body_policy(mut self, policy: BodyPolicy) -> Self {
        self.body_policy = policy;
        self
    }

    /// Overrides the client timeout for this request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches a cancellation token; cancelling it aborts the request
    /// with [`crate::Error::Cancelled`].
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}
