//! The WordPress API client.
//!
//! [`Client`] ties the pipeline together: every call builds a request,
//! attaches the active authentication, sends it over the shared transport
//! and interprets the response. Use [`ClientBuilder`] to configure one.

use crate::{
    auth::{AttachAuth, AuthMethod, JwtUser, RequestAuth, TokenStore},
    interpret::{interpret, interpret_required},
    metadata::RequestMetadata,
    request::{RequestBody, RequestBuilder},
    transport::{RawResponse, Transport},
    ApiRoot, Error, Response, Result,
};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Namespace of the core WordPress REST routes.
pub const WP_V2_PATH: &str = "wp/v2/";

/// Namespace of the JWT authentication plugin routes.
pub const JWT_PATH: &str = "jwt-auth/v1/";

const DEFAULT_USER_AGENT: &str = concat!("wpclient/", env!("CARGO_PKG_VERSION"));

/// A client for a WordPress REST API root.
///
/// Cloning is cheap; clones share the connection pool, the auth method and
/// the token store. Calls may be issued concurrently from any task.
///
/// # Examples
///
/// ```no_run
/// use wpclient::{AuthMethod, Client};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Post {
///     id: u64,
/// }
///
/// # async fn example() -> Result<(), wpclient::Error> {
/// let client = Client::new("https://example.com/wp-json")?;
///
/// client.authenticate("admin", "secret").await?;
/// client.set_auth_method(AuthMethod::Jwt);
///
/// let post = client.get::<Post>("wp/v2/posts/1").await?;
/// println!("Post {}", post.data.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    requests: RequestBuilder,
    transport: Transport,
    auth_method: RwLock<AuthMethod>,
    tokens: TokenStore,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client for `api_root` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if `api_root` is empty, whitespace
    /// only or not an absolute URL.
    pub fn new(api_root: impl AsRef<str>) -> Result<Self> {
        Self::builder().api_root(api_root)?.build()
    }

    /// Returns the normalized API root.
    pub fn api_root(&self) -> &ApiRoot {
        self.inner.requests.root()
    }

    /// Returns the active authentication method.
    pub fn auth_method(&self) -> AuthMethod {
        self.inner.auth_method.read().clone()
    }

    /// Replaces the active authentication method.
    ///
    /// Requests already in flight keep the method they started with.
    pub fn set_auth_method(&self, method: AuthMethod) {
        *self.inner.auth_method.write() = method;
    }

    /// Returns the stored bearer token, if any.
    pub fn token(&self) -> Option<Arc<str>> {
        self.inner.tokens.get()
    }

    /// Stores a bearer token obtained elsewhere.
    pub fn set_token(&self, token: impl Into<Arc<str>>) {
        self.inner.tokens.set(token);
    }

    /// Forgets the stored bearer token.
    pub fn clear_token(&self) {
        self.inner.tokens.clear();
    }

    /// Makes a typed request.
    ///
    /// The body, if any, is sent as JSON. An empty success body is accepted
    /// only when `metadata.body_policy` is [`crate::metadata::BodyPolicy::EmptyOk`],
    /// in which case the result holds `Res::default()`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wpclient::{Client, metadata::{BodyPolicy, RequestMetadata}};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), wpclient::Error> {
    /// let client = Client::new("https://example.com/wp-json")?;
    ///
    /// let metadata = RequestMetadata::new(Method::DELETE, "wp/v2/comments/7")
    ///     .with_query_param("force", "true")
    ///     .with_body_policy(BodyPolicy::EmptyOk);
    ///
    /// let response = client
    ///     .call::<(), serde_json::Value>(metadata, None)
    ///     .await?;
    /// println!("Deleted: {}", response.data);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the transport error if no response was obtained, otherwise
    /// the classification error for a non-success response.
    pub async fn call<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned + Default,
    {
        let body = body.map(RequestBody::json).transpose()?.unwrap_or_default();
        let raw = self.execute(&metadata, body, self.auth_method()).await?;
        interpret(raw, metadata.body_policy).inspect_err(|e| log_failure(&metadata, e))
    }

    /// Makes a request whose success response must carry a body.
    pub(crate) async fn send_required<Res>(
        &self,
        metadata: RequestMetadata,
        body: RequestBody,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let raw = self.execute(&metadata, body, self.auth_method()).await?;
        interpret_required(raw).inspect_err(|e| log_failure(&metadata, e))
    }

    /// Builds, authenticates and sends one request.
    async fn execute(
        &self,
        metadata: &RequestMetadata,
        body: RequestBody,
        auth: AuthMethod,
    ) -> Result<RawResponse> {
        let mut request = self.inner.requests.build(metadata, body)?;
        RequestAuth {
            method: auth,
            tokens: &self.inner.tokens,
        }
        .attach(&mut request.headers)?;

        self.inner
            .transport
            .send(request, metadata.timeout, metadata.cancellation.as_ref())
            .await
            .inspect_err(|e| log_failure(metadata, e))
    }

    /// Makes a GET request to `path`, relative to the API root.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wpclient::Client;
    ///
    /// # async fn example() -> Result<(), wpclient::Error> {
    /// let client = Client::new("https://example.com/wp-json")?;
    /// let posts = client.get::<serde_json::Value>("wp/v2/posts").await?;
    /// println!("{}", posts.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::GET, path);
        self.send_required(metadata, RequestBody::Empty).await
    }

    /// Makes a POST request to `path` with a JSON body.
    pub async fn post<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::POST, path);
        self.send_required(metadata, RequestBody::json(body)?).await
    }

    /// Makes a PUT request to `path` with a JSON body.
    pub async fn put<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::PUT, path);
        self.send_required(metadata, RequestBody::json(body)?).await
    }

    /// Makes a PATCH request to `path` with a JSON body.
    pub async fn patch<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
    ) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::PATCH, path);
        self.send_required(metadata, RequestBody::json(body)?).await
    }

    /// Makes a DELETE request to `path`.
    pub async fn delete<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::DELETE, path);
        self.send_required(metadata, RequestBody::Empty).await
    }

    /// Logs in through the JWT plugin and stores the issued token.
    ///
    /// Credentials are sent form-encoded without any authorization header.
    /// On failure the previously stored token, if any, is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthRejected`] when the server refuses the login with
    /// a 4xx status, [`Error::Deserialization`] when a success body carries
    /// no usable token, and transport or server errors as they occur.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<JwtUser> {
        let metadata = RequestMetadata::new(Method::POST, format!("{JWT_PATH}token"));
        let body = RequestBody::form([("username", username), ("password", password)]);

        let raw = self.execute(&metadata, body, AuthMethod::None).await?;
        let response = interpret_required::<JwtUser>(raw).map_err(|e| match e {
            Error::ClientError {
                status,
                raw_response,
                ..
            } => Error::AuthRejected {
                status,
                raw_response,
            },
            other => other,
        })?;

        if response.data.token.is_empty() {
            return Err(Error::Deserialization {
                raw_response: response.raw_body,
                serde_error: "login response carried an empty token".to_string(),
                status: response.status,
                type_name: std::any::type_name::<JwtUser>(),
            });
        }

        self.inner.tokens.set(response.data.token.as_str());
        tracing::info!(
            user = response.data.user_nicename.as_deref().unwrap_or(username),
            "Stored JWT token"
        );

        Ok(response.data)
    }

    /// Asks the JWT plugin whether the stored token is still valid.
    ///
    /// Returns `true` iff the server answers with a 2xx status; the body is
    /// ignored. The stored token is never modified, even when the answer is
    /// `false`: call [`Client::authenticate`] or [`Client::clear_token`] to
    /// act on it.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was obtained.
    pub async fn validate_token(&self) -> Result<bool> {
        let metadata = RequestMetadata::new(Method::POST, format!("{JWT_PATH}token/validate"));
        let raw = self
            .execute(&metadata, RequestBody::Empty, AuthMethod::Jwt)
            .await?;

        let valid = raw.status.is_success();
        tracing::debug!(status = raw.status.as_u16(), valid, "Validated JWT token");
        Ok(valid)
    }
}

fn log_failure(metadata: &RequestMetadata, error: &Error) {
    tracing::warn!(
        error = %error,
        method = %metadata.method,
        path = %metadata.path,
        "Request failed"
    );
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use wpclient::{AuthMethod, BasicCredentials, ClientBuilder};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), wpclient::Error> {
/// let client = ClientBuilder::new()
///     .api_root("https://example.com/wp-json")?
///     .timeout(Duration::from_secs(30))
///     .auth_method(AuthMethod::Basic(BasicCredentials::new("admin", "app-password")))
///     .default_header("X-Site", "blog")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_root: Option<ApiRoot>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    auth_method: AuthMethod,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            http::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_USER_AGENT),
        );

        Self {
            api_root: None,
            default_headers,
            timeout: None,
            auth_method: AuthMethod::None,
        }
    }

    /// Sets the API root all request paths are relative to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the root is empty or invalid.
    pub fn api_root(mut self, api_root: impl AsRef<str>) -> Result<Self> {
        self.api_root = Some(ApiRoot::parse(api_root)?);
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// `Authorization` is always set by the active [`AuthMethod`], so a
    /// default value for it is never sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::InvalidHeader(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::InvalidHeader(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the `User-Agent` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid header value.
    pub fn user_agent(self, user_agent: impl AsRef<str>) -> Result<Self> {
        self.default_header(http::header::USER_AGENT.as_str(), user_agent)
    }

    /// Sets the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the initial authentication method.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = method;
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if no API root was provided or the
    /// HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let api_root = self
            .api_root
            .ok_or_else(|| Error::Construction("API root is required".to_string()))?;

        let transport = Transport::new(self.timeout)?;
        let requests = RequestBuilder::new(api_root).with_default_headers(self.default_headers);

        tracing::debug!(api_root = %requests.root(), "Created WordPress client");

        Ok(Client {
            inner: Arc::new(ClientInner {
                requests,
                transport,
                auth_method: RwLock::new(self.auth_method),
                tokens: TokenStore::new(),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_root() {
        let client = Client::new("http://localhost/wp-json").unwrap();
        assert_eq!(client.api_root().as_str(), "http://localhost/wp-json/");
    }

    #[test]
    fn test_new_rejects_blank_root() {
        assert!(matches!(Client::new("  "), Err(Error::Construction(_))));
    }

    #[test]
    fn test_build_requires_root() {
        assert!(matches!(
            Client::builder().build(),
            Err(Error::Construction(_))
        ));
    }

    #[test]
    fn test_auth_method_is_shared_between_clones() {
        let client = Client::new("http://localhost/wp-json").unwrap();
        let clone = client.clone();
        assert_eq!(client.auth_method(), AuthMethod::None);

        clone.set_auth_method(AuthMethod::Jwt);
        assert_eq!(client.auth_method(), AuthMethod::Jwt);

        clone.set_token("abc");
        assert_eq!(client.token().as_deref(), Some("abc"));
        client.clear_token();
        assert!(clone.token().is_none());
    }
}
