//! Authentication methods and the bearer token store.
//!
//! A client has exactly one active [`AuthMethod`]. Before a request is sent
//! the client takes a snapshot of that method and calls
//! [`AttachAuth::attach`] on it, so changing the method while a request is in
//! flight never affects that request.
//!
//! JWT tokens live in a [`TokenStore`]. The Jwt method does not copy the token
//! when it is selected; it reads the store at attach time.

use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use http::{header, HeaderMap, HeaderValue};
use parking_lot::RwLock;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Something that can add authorization to an outgoing request.
pub trait AttachAuth {
    /// Adds authorization headers, if any, to `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the credential cannot be encoded
    /// as a header value.
    fn attach(&self, headers: &mut HeaderMap) -> Result<()>;
}

/// Secret material for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub enum BasicCredentials {
    /// A username/password pair, encoded on every attach.
    UserPassword {
        /// Account name (application passwords use the login name)
        username: String,
        /// Password or application password
        password: String,
    },
    /// A pre-encoded `base64(user:password)` value.
    Encoded(String),
}

impl BasicCredentials {
    /// Creates username/password credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        BasicCredentials::UserPassword {
            username: username.into(),
            password: password.into(),
        }
    }

    fn header_value(&self) -> String {
        match self {
            BasicCredentials::UserPassword { username, password } => {
                format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
            }
            BasicCredentials::Encoded(encoded) => format!("Basic {encoded}"),
        }
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasicCredentials::UserPassword { username, .. } => f
                .debug_struct("UserPassword")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            BasicCredentials::Encoded(_) => f.write_str("Encoded(<redacted>)"),
        }
    }
}

/// The authentication scheme applied to requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthMethod {
    /// Send requests without authorization.
    #[default]
    None,
    /// HTTP Basic authentication.
    Basic(BasicCredentials),
    /// Bearer authentication with the token held by the client's [`TokenStore`].
    Jwt,
}

/// Holds the current bearer token.
///
/// Reads take a single snapshot of the token and writes are exclusive, so a
/// reader sees either the old or the new token in full. A request attached
/// just before a re-authentication finishes still carries the old token; the
/// server rejects it and the caller sees [`Error::AuthRejected`].
#[derive(Clone, Default)]
pub struct TokenStore {
    slot: Arc<RwLock<Option<Arc<str>>>>,
}

impl TokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the current token.
    pub fn get(&self) -> Option<Arc<str>> {
        self.slot.read().clone()
    }

    /// Replaces the current token.
    pub fn set(&self, token: impl Into<Arc<str>>) {
        *self.slot.write() = Some(token.into());
    }

    /// Removes the current token.
    pub fn clear(&self) {
        *self.slot.write() = None;
    }

    /// Attaches `Authorization: Bearer <token>` when a non-empty token is stored.
    pub(crate) fn attach_bearer(&self, headers: &mut HeaderMap) -> Result<()> {
        let Some(token) = self.get().filter(|t| !t.is_empty()) else {
            tracing::debug!("No bearer token stored, sending request without authorization");
            return Ok(());
        };
        let mut value = HeaderValue::try_from(format!("Bearer {token}"))
            .map_err(|e| Error::InvalidHeader(format!("Invalid bearer token: {}", e)))?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
        Ok(())
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_token", &self.slot.read().is_some())
            .finish()
    }
}

/// The auth method of one request, bound to the client's token store.
pub(crate) struct RequestAuth<'a> {
    pub(crate) method: AuthMethod,
    pub(crate) tokens: &'a TokenStore,
}

impl AttachAuth for RequestAuth<'_> {
    fn attach(&self, headers: &mut HeaderMap) -> Result<()> {
        // Only the active method decides what authorizes a request.
        headers.remove(header::AUTHORIZATION);
        match &self.method {
            AuthMethod::None => Ok(()),
            AuthMethod::Basic(credentials) => {
                let mut value = HeaderValue::try_from(credentials.header_value())
                    .map_err(|e| Error::InvalidHeader(format!("Invalid basic credentials: {}", e)))?;
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
                Ok(())
            }
            AuthMethod::Jwt => self.tokens.attach_bearer(headers),
        }
    }
}

/// The body returned by a successful JWT login.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JwtUser {
    /// The issued bearer token.
    pub token: String,
    /// Email address of the authenticated user.
    #[serde(default)]
    pub user_email: Option<String>,
    /// URL-friendly name of the authenticated user.
    #[serde(default)]
    pub user_nicename: Option<String>,
    /// Display name of the authenticated user.
    #[serde(default)]
    pub user_display_name: Option<String>,
}

impl fmt::Debug for JwtUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtUser")
            .field("token", &"<redacted>")
            .field("user_email", &self.user_email)
            .field("user_nicename", &self.user_nicename)
            .field("user_display_name", &self.user_display_name)
            .finish()
    }
}
