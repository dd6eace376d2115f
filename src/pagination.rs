//! Fetching every page of a WordPress collection.
//!
//! Collection routes take `page` and `per_page` parameters and report the
//! page count in `X-WP-TotalPages`. [`Client::get_all`] walks the pages in
//! order. Each page is a single request; the first failure ends the walk,
//! except the "invalid page number" answer to a page past the end.

use crate::{metadata::RequestMetadata, Client, Error, RequestBody, Result};
use http::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tokio_util::sync::CancellationToken;

/// Largest `per_page` value WordPress accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Page limit applied when neither `X-WP-TotalPages` nor
/// [`PageQuery::max_pages`] bounds the walk.
pub const UNCOUNTED_PAGE_LIMIT: u32 = 100;

/// Error code WordPress returns for a page past the end of a collection.
const INVALID_PAGE_CODE: &str = "rest_post_invalid_page_number";

#[derive(Deserialize)]
struct WpErrorBody {
    code: String,
}

fn is_past_last_page(error: &Error) -> bool {
    match error {
        Error::ClientError {
            status,
            raw_response,
            ..
        } if *status == StatusCode::BAD_REQUEST => {
            serde_json::from_str::<WpErrorBody>(raw_response)
                .is_ok_and(|body| body.code == INVALID_PAGE_CODE)
        }
        _ => false,
    }
}

/// Parameters for [`Client::get_all`].
#[derive(Debug, Clone)]
pub struct PageQuery {
    per_page: u32,
    max_pages: Option<u32>,
    params: Vec<(String, String)>,
    cancellation: Option<CancellationToken>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            per_page: MAX_PER_PAGE,
            max_pages: None,
            params: Vec::new(),
            cancellation: None,
        }
    }
}

impl PageQuery {
    /// Creates a query fetching pages of [`MAX_PER_PAGE`] items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size, clamped to `1..=100`.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Stops after `max_pages` pages even if more are available.
    ///
    /// Without this limit, a server that sends no `X-WP-TotalPages` header is
    /// read for at most [`UNCOUNTED_PAGE_LIMIT`] pages.
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Adds a filter parameter sent with every page request.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Cancels the walk when `token` fires.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn page_request(&self, path: &str, page: u32) -> RequestMetadata {
        let mut metadata = RequestMetadata::new(Method::GET, path)
            .with_query_params(self.params.iter().cloned())
            .with_query_param("per_page", self.per_page.to_string())
            .with_query_param("page", page.to_string());
        if let Some(token) = &self.cancellation {
            metadata = metadata.with_cancellation(token.clone());
        }
        metadata
    }

    fn is_last_page(&self, page: u32, fetched: usize, total_pages: Option<u32>) -> bool {
        if fetched == 0 || self.max_pages.is_some_and(|max| page >= max) {
            return true;
        }
        match total_pages {
            Some(total) => page >= total,
            None => {
                fetched < self.per_page as usize
                    || (self.max_pages.is_none() && page >= UNCOUNTED_PAGE_LIMIT)
            }
        }
    }
}

impl Client {
    /// Fetches every item of the collection at `path`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wpclient::{Client, PageQuery};
    ///
    /// # async fn example() -> Result<(), wpclient::Error> {
    /// let client = Client::new("https://example.com/wp-json")?;
    /// let tags = client
    ///     .get_all::<serde_json::Value>("wp/v2/tags", PageQuery::new().param("hide_empty", "true"))
    ///     .await?;
    /// println!("{} tags", tags.len());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the error of the first page request that fails. A 400
    /// `rest_post_invalid_page_number` for any page after the first is not an
    /// error: it means the previous page was the last one, and the items
    /// fetched so far are returned.
    pub async fn get_all<T>(&self, path: impl Into<String>, query: PageQuery) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let path = path.into();
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let metadata = query.page_request(&path, page);
            let response = match self
                .send_required::<Vec<T>>(metadata, RequestBody::Empty)
                .await
            {
                Ok(response) => response,
                Err(e) if page > 1 && is_past_last_page(&e) => {
                    tracing::debug!(path = %path, page, "Page past the end of collection");
                    break;
                }
                Err(e) => return Err(e),
            };

            let total_pages = response.total_pages();
            let fetched = response.data.len();
            items.extend(response.data);

            tracing::debug!(
                path = %path,
                page,
                fetched,
                total_pages,
                "Fetched collection page"
            );

            if query.is_last_page(page, fetched, total_pages) {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}
