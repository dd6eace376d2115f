//! Response wrapper that preserves both parsed data and raw response details.
//!
//! The [`Response`] type wraps the deserialized response data along with
//! metadata about the HTTP exchange: status, headers, latency and the raw
//! body. WordPress collection endpoints report their size in the
//! `X-WP-Total` and `X-WP-TotalPages` headers, exposed through
//! [`Response::total`] and [`Response::total_pages`].

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// Header carrying the number of items in a collection.
pub const TOTAL_HEADER: &str = "x-wp-total";

/// Header carrying the number of pages in a collection.
pub const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// A wrapper around a successful HTTP response.
///
/// # Examples
///
/// ```no_run
/// use wpclient::Client;
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
/// let response = client.get::<Vec<Post>>("wp/v2/posts").await?;
///
/// println!("Fetched {} posts", response.data.len());
/// println!("Request took {:?}", response.latency);
/// if let Some(pages) = response.total_pages() {
///     println!("{pages} pages available");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The deserialized response data.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Returns a reference to a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Returns the collection size reported by `X-WP-Total`.
    pub fn total(&self) -> Option<u64> {
        self.header(TOTAL_HEADER)?.trim().parse().ok()
    }

    /// Returns the page count reported by `X-WP-TotalPages`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wpclient::Response;
    /// # use http::{HeaderMap, HeaderValue, StatusCode};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("x-wp-totalpages", HeaderValue::from_static("3"));
    ///
    /// let response = Response::new((), String::new(), StatusCode::OK, headers, Duration::ZERO);
    /// assert_eq!(response.total_pages(), Some(3));
    /// ```
    pub fn total_pages(&self) -> Option<u32> {
        self.header(TOTAL_PAGES_HEADER)?.trim().parse().ok()
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn with_headers(pairs: &[(&'static str, &'static str)]) -> Response<()> {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(*value));
        }
        Response::new((), String::new(), StatusCode::OK, headers, Duration::ZERO)
    }

    #[test]
    fn test_pagination_headers() {
        let response = with_headers(&[("x-wp-total", "42"), ("x-wp-totalpages", "5")]);
        assert_eq!(response.total(), Some(42));
        assert_eq!(response.total_pages(), Some(5));
    }

    #[test]
    fn test_missing_or_garbage_pagination_headers() {
        assert_eq!(with_headers(&[]).total_pages(), None);
        assert_eq!(with_headers(&[("x-wp-total", "many")]).total(), None);
    }

    #[test]
    fn test_deref_to_data() {
        let response = Response::new(
            vec![1, 2, 3],
            "[1,2,3]".to_string(),
            StatusCode::OK,
            HeaderMap::new(),
            Duration::ZERO,
        );
        assert_eq!(response.len(), 3);
    }
}
