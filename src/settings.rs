//! Site settings endpoints (`wp/v2/settings`).

use crate::{client::WP_V2_PATH, metadata::RequestMetadata, Client, RequestBody, Result};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Site-wide settings.
///
/// Fields WordPress core exposes are typed; anything else (plugin settings)
/// is kept in `extra` and sent back unchanged on update. `None` fields are
/// omitted from updates so only the fields you set are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Site title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Site tagline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Site URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Administrator email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// City or UTC offset the site's times are shown in, e.g. `Europe/London`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// PHP date format used for dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    /// PHP date format used for times.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    /// Day the week starts on, `0` being Sunday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_of_week: Option<u8>,
    /// WordPress locale code, e.g. `en_US`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Whether emoticons like `:-)` are converted to graphics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_smilies: Option<bool>,
    /// ID of the category new posts are filed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_category: Option<u64>,
    /// Post format new posts get.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_post_format: Option<String>,
    /// Number of posts shown on blog pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts_per_page: Option<u32>,
    /// Whether new posts accept pingbacks and trackbacks (`open` or `closed`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ping_status: Option<String>,
    /// Whether new posts accept comments (`open` or `closed`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_comment_status: Option<String>,
    /// Settings not covered by the typed fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Client {
    /// Fetches the site settings. Requires an authenticated administrator.
    ///
    /// # Errors
    ///
    /// See [`Client::call`].
    pub async fn get_settings(&self) -> Result<Settings> {
        let metadata = RequestMetadata::new(Method::GET, format!("{WP_V2_PATH}settings"));
        Ok(self.send_required(metadata, RequestBody::Empty).await?.data)
    }

    /// Updates the site settings and returns them as stored by the server.
    ///
    /// # Errors
    ///
    /// See [`Client::call`].
    pub async fn update_settings(&self, settings: &Settings) -> Result<Settings> {
        let metadata = RequestMetadata::new(Method::POST, format!("{WP_V2_PATH}settings"));
        Ok(self
            .send_required(metadata, RequestBody::json(settings)?)
            .await?
            .data)
    }
}
