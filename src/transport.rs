//! The only component that touches the network.
//!
//! [`Transport`] owns one `reqwest::Client` for the lifetime of the API
//! client, so every request (the JWT login included) shares its connection
//! pool. Each call is a single exchange: no retries, default redirect policy.

use crate::{request::Request, Error, Result};
use http::{HeaderMap, StatusCode};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// An HTTP response read in full, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The response body as text.
    pub body: String,
    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl RawResponse {
    /// Creates a response with no headers and zero latency.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            latency: Duration::ZERO,
        }
    }
}

/// Sends requests over a shared, reusable HTTP client.
#[derive(Debug, Clone)]
pub struct Transport {
    http_client: reqwest::Client,
    default_timeout: Option<Duration>,
}

impl Transport {
    /// Creates a transport with an optional default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the underlying HTTP client cannot
    /// be built.
    pub fn new(default_timeout: Option<Duration>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Construction(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            default_timeout,
        })
    }

    /// Returns the default timeout applied when a request sets none.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    /// Performs one HTTP exchange.
    ///
    /// `timeout` overrides the default timeout. If `cancel` fires before the
    /// response body has been read the exchange is dropped and
    /// [`Error::Cancelled`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`], [`Error::Cancelled`], or
    /// [`Error::Network`] when no complete response was obtained. HTTP error
    /// statuses are not errors at this layer.
    pub async fn send(
        &self,
        request: Request,
        timeout: Option<Duration>,
        cancel: Option<&CancellationToken>,
    ) -> Result<RawResponse> {
        let exchange = self.exchange(request, timeout.or(self.default_timeout));

        match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tracing::warn!("Request cancelled by caller");
                        Err(Error::Cancelled)
                    }
                    result = exchange => result,
                }
            }
            None => exchange.await,
        }
    }

    async fn exchange(&self, request: Request, timeout: Option<Duration>) -> Result<RawResponse> {
        let Request {
            method,
            url,
            headers,
            body,
        } = request;

        tracing::debug!(
            method = %method,
            url = %url,
            timeout_ms = timeout.map(|t| t.as_millis() as u64),
            "Executing HTTP request"
        );

        let mut builder = self.http_client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let start_time = Instant::now();
        let response = builder.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(classify_transport_error)?;
        let latency = start_time.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Received HTTP response"
        );

        Ok(RawResponse {
            status,
            headers,
            body,
            latency,
        })
    }
}

fn classify_transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        tracing::warn!(error = %error, "Request timed out");
        Error::Timeout
    } else {
        tracing::warn!(error = %error, "Network error");
        Error::Network(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::RequestMetadata, ApiRoot, RequestBody, RequestBuilder};
    use http::Method;

    fn request_to(root: &str) -> Request {
        RequestBuilder::new(ApiRoot::parse(root).unwrap())
            .build(
                &RequestMetadata::new(Method::GET, "wp/v2/settings"),
                RequestBody::Empty,
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let transport = Transport::new(None).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = transport
            .send(request_to("http://127.0.0.1:9/wp-json"), None, Some(&token))
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let transport = Transport::new(Some(Duration::from_secs(5))).unwrap();
        let result = transport
            .send(request_to("http://127.0.0.1:9/wp-json"), None, None)
            .await;
        assert!(matches!(result, Err(Error::Network(_))), "{result:?}");
    }

    #[test]
    fn test_raw_response_new() {
        let raw = RawResponse::new(StatusCode::OK, "{}");
        assert_eq!(raw.status, StatusCode::OK);
        assert_eq!(raw.body, "{}");
        assert!(raw.headers.is_empty());
    }
}
