//! Error types for WordPress API calls.
//!
//! Every failure the client can produce is a variant of [`Error`]. Variants that
//! come from an HTTP response keep the status and the raw body so callers can
//! diagnose what the server actually said. [`Error::kind`] folds the variants
//! into the coarse [`ErrorKind`] taxonomy callers usually branch on.

use http::{HeaderMap, StatusCode};

/// The main error type for WordPress API calls.
///
/// # Examples
///
/// ```no_run
/// use wpclient::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("https://example.com/wp-json")?;
///
/// match client.get::<serde_json::Value>("wp/v2/posts/1").await {
///     Ok(response) => println!("Post: {:?}", response.data),
///     Err(Error::AuthRejected { status, .. }) => {
///         eprintln!("Credentials rejected ({status}), log in again");
///     }
///     Err(Error::ClientError { status, raw_response, .. }) => {
///         eprintln!("Request refused {status}: {raw_response}");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The client could not be constructed (empty API root, unusable transport).
    #[error("Construction error: {0}")]
    Construction(String),

    /// An invalid URL was produced while building a request.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name or value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A network-level error occurred before a response was obtained.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request did not complete within its timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request was cancelled by the caller before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request: {0}")]
    RequestSerialization(String),

    /// A success response could not be decoded into the expected type.
    ///
    /// Also returned when a body was required but the server sent none.
    #[error("Failed to deserialize {type_name} (status {status}): {serde_error}")]
    Deserialization {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
        /// The Rust type the body was decoded into
        type_name: &'static str,
    },

    /// The server rejected the credentials (401/403, or any 4xx on login).
    ///
    /// Kept apart from [`Error::ClientError`] so callers can decide to
    /// re-authenticate instead of giving up.
    #[error("Authentication rejected ({status}): {raw_response}")]
    AuthRejected {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// The server answered with a non-success status below 500.
    #[error("Client error {status}: {raw_response}")]
    ClientError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The server answered with a 5xx status.
    #[error("Server error {status}: {raw_response}")]
    ServerError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Client construction or request assembly failed.
    Construction,
    /// No response was obtained (connection, DNS, TLS, timeout).
    Network,
    /// The caller cancelled the request.
    Cancelled,
    /// A payload could not be serialized or a response could not be decoded.
    Serialization,
    /// The server refused the credentials.
    AuthRejected,
    /// Any other non-success status below 500.
    ClientError,
    /// A 5xx status.
    ServerError,
}

impl Error {
    /// Returns the [`ErrorKind`] this error belongs to.
    ///
    /// # Examples
    ///
    /// ```
    /// use wpclient::{Error, ErrorKind};
    /// use http::StatusCode;
    ///
    /// let err = Error::AuthRejected {
    ///     status: StatusCode::UNAUTHORIZED,
    ///     raw_response: String::new(),
    /// };
    /// assert_eq!(err.kind(), ErrorKind::AuthRejected);
    /// assert_eq!(Error::Timeout.kind(), ErrorKind::Network);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Construction(_) | Error::InvalidUrl(_) | Error::InvalidHeader(_) => {
                ErrorKind::Construction
            }
            Error::Network(_) | Error::Timeout => ErrorKind::Network,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::RequestSerialization(_) | Error::Deserialization { .. } => {
                ErrorKind::Serialization
            }
            Error::AuthRejected { .. } => ErrorKind::AuthRejected,
            Error::ClientError { .. } => ErrorKind::ClientError,
            Error::ServerError { .. } => ErrorKind::ServerError,
        }
    }

    /// Returns `true` if the server rejected the credentials.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Error::AuthRejected { .. })
    }

    /// Returns the HTTP status code if this error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Deserialization { status, .. }
            | Error::AuthRejected { status, .. }
            | Error::ClientError { status, .. }
            | Error::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error came from a response.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Deserialization { raw_response, .. }
            | Error::AuthRejected { raw_response, .. }
            | Error::ClientError { raw_response, .. }
            | Error::ServerError { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for WordPress API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            Error::Construction("empty".into()).kind(),
            ErrorKind::Construction
        );
        assert_eq!(Error::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            Error::RequestSerialization("bad".into()).kind(),
            ErrorKind::Serialization
        );
        assert_eq!(
            Error::ServerError {
                status: StatusCode::BAD_GATEWAY,
                raw_response: String::new(),
                headers: HeaderMap::new(),
            }
            .kind(),
            ErrorKind::ServerError
        );
    }

    #[test]
    fn test_status_and_body_accessors() {
        let err = Error::ClientError {
            status: StatusCode::NOT_FOUND,
            raw_response: "missing".into(),
            headers: HeaderMap::new(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.raw_response(), Some("missing"));
        assert!(!err.is_auth_rejected());

        assert_eq!(Error::Timeout.status(), None);
        assert_eq!(Error::Timeout.raw_response(), None);
    }

    #[test]
    fn test_deserialization_message_names_type() {
        let err = Error::Deserialization {
            raw_response: "{".into(),
            serde_error: "EOF while parsing".into(),
            status: StatusCode::OK,
            type_name: "my::Post",
        };
        assert!(err.to_string().contains("my::Post"));
    }
}
