//! # wpclient - a typed client core for the WordPress REST API
//!
//! `wpclient` is the request layer resource wrappers (posts, pages, media,
//! ...) are built on. It resolves paths against an API root, attaches one of
//! several authentication schemes, serializes payloads, classifies HTTP
//! outcomes into typed errors and decodes success bodies, built on top of
//! `reqwest`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use wpclient::{AuthMethod, Client};
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize)]
//! struct NewPost {
//!     title: String,
//!     status: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct Post {
//!     id: u64,
//!     link: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wpclient::Error> {
//!     let client = Client::builder()
//!         .api_root("https://example.com/wp-json")?
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     // Log in through the JWT plugin and use the token from now on
//!     client.authenticate("admin", "secret").await?;
//!     client.set_auth_method(AuthMethod::Jwt);
//!
//!     let draft = NewPost {
//!         title: "Hello".to_string(),
//!         status: "draft".to_string(),
//!     };
//!     let created = client.post::<_, Post>("wp/v2/posts", &draft).await?;
//!     println!("Created post {} at {}", created.data.id, created.data.link);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! Every call runs the same one-shot pipeline:
//!
//! 1. [`RequestBuilder`] resolves the path against the [`ApiRoot`] and encodes
//!    query parameters and the body (JSON, or form fields for the login).
//! 2. The active [`AuthMethod`] is snapshotted and attached through
//!    [`AttachAuth`]. Bearer tokens are read from the [`TokenStore`] at this
//!    point.
//! 3. [`Transport`] performs the exchange on the client's shared connection
//!    pool, honouring the timeout and an optional cancellation token.
//! 4. [`interpret`](interpret::interpret) classifies the response and decodes
//!    it into a [`Response<T>`] or an [`Error`].
//!
//! Nothing is retried. Callers that want retries wrap the client.
//!
//! ## Error Handling
//!
//! ```no_run
//! use wpclient::{Client, Error, ErrorKind};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::new("https://example.com/wp-json")?;
//! match client.get_settings().await {
//!     Ok(settings) => println!("Site: {:?}", settings.title),
//!     Err(e) if e.kind() == ErrorKind::AuthRejected => {
//!         client.authenticate("admin", "secret").await?;
//!     }
//!     Err(Error::Deserialization { raw_response, type_name, .. }) => {
//!         eprintln!("Could not decode {type_name}: {raw_response}");
//!     }
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
mod error;
pub mod interpret;
pub mod metadata;
pub mod pagination;
mod request;
mod response;
mod root;
pub mod settings;
mod transport;

pub use auth::{AttachAuth, AuthMethod, BasicCredentials, JwtUser, TokenStore};
pub use client::{Client, ClientBuilder, JWT_PATH, WP_V2_PATH};
pub use error::{Error, ErrorKind, Result};
pub use pagination::PageQuery;
pub use request::{Request, RequestBody, RequestBuilder};
pub use response::Response;
pub use root::ApiRoot;
pub use settings::Settings;
pub use transport::{RawResponse, Transport};
