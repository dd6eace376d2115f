//! The API root every request path is resolved against.

use crate::{Error, Result};
use std::fmt;
use url::Url;

/// An absolute API root URL that always ends with exactly one `/`.
///
/// # Examples
///
/// ```
/// use wpclient::ApiRoot;
///
/// let root = ApiRoot::parse("https://example.com/wp-json").unwrap();
/// assert_eq!(root.as_str(), "https://example.com/wp-json/");
///
/// let root = ApiRoot::parse("https://example.com/wp-json/").unwrap();
/// assert_eq!(root.as_str(), "https://example.com/wp-json/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoot(String);

impl ApiRoot {
    /// Parses and normalizes an API root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the input is empty, whitespace only,
    /// or not an absolute URL.
    pub fn parse(uri: impl AsRef<str>) -> Result<Self> {
        let uri = uri.as_ref().trim();
        if uri.is_empty() {
            return Err(Error::Construction("API root must not be empty".to_string()));
        }

        let mut normalized = uri.trim_end_matches('/').to_string();
        normalized.push('/');

        let parsed = Url::parse(&normalized)
            .map_err(|e| Error::Construction(format!("Invalid API root {uri:?}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Construction(format!(
                "API root {uri:?} cannot be used as a base URL"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized root, including the trailing `/`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves a path relative to the root.
    ///
    /// Leading `/` characters on `path` are ignored so the root separator is
    /// never doubled.
    pub fn join(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}{}", self.0, path))?)
    }
}

impl fmt::Display for ApiRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
