//! VK wall posting (`wall.post`).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::{PublishingConfig, VkCredentials};
use crate::domain::{ContentItem, Platform};
use crate::error::PlatformError;
use crate::ports::{PlatformAdapter, PublishReceipt};

pub const VK_API_BASE: &str = "https://api.vk.com/method";

/// Metadata key holding comma-joinable attachment ids (e.g. `photo123_456`).
pub const ATTACHMENTS_KEY: &str = "vkAttachments";

pub fn wall_message(item: &ContentItem) -> String {
    format!("{}\n\n{}", item.title, item.content)
}

pub fn post_url(owner_id: &str, post_id: &str) -> String {
    format!("https://vk.com/wall{owner_id}_{post_id}")
}

/// Maps a `wall.post` response body to a receipt.
pub fn parse_wall_post(owner_id: &str, body: &Value) -> Result<PublishReceipt, PlatformError> {
    if let Some(post_id) = body.pointer("/response/post_id").and_then(Value::as_i64) {
        let post_id = post_id.to_string();
        return Ok(PublishReceipt::new(post_id.as_str()).with_url(post_url(owner_id, &post_id)));
    }
    if let Some(error) = body.get("error") {
        let message = error
            .get("error_msg")
            .and_then(Value::as_str)
            .unwrap_or("Unknown VK error");
        let code = error.get("error_code").and_then(Value::as_i64);
        return Err(PlatformError::api(code, message));
    }
    Err(PlatformError::api(None, "Unknown VK error"))
}

pub struct VkAdapter {
    client: Client,
    creds: VkCredentials,
    base_url: String,
}

impl VkAdapter {
    pub fn new(creds: VkCredentials, config: &PublishingConfig) -> Result<Self, PlatformError> {
        if creds.access_token.is_empty() || creds.owner_id.is_empty() {
            return Err(PlatformError::Auth("VK access token and owner id are required".into()));
        }
        Ok(Self {
            client: Client::builder().timeout(config.http_timeout()).build()?,
            creds,
            base_url: VK_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn attachments(item: &ContentItem) -> String {
        match item.metadata.get(ATTACHMENTS_KEY) {
            Some(Value::Array(ids)) => ids
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(","),
            Some(Value::String(ids)) => ids.clone(),
            _ => String::new(),
        }
    }
}

#[async_trait]
impl PlatformAdapter for VkAdapter {
    fn platform(&self) -> Platform {
        Platform::Vk
    }

    async fn publish(&self, item: &ContentItem) -> Result<PublishReceipt, PlatformError> {
        let message = wall_message(item);
        let attachments = Self::attachments(item);
        let query = [
            ("access_token", self.creds.access_token.as_str()),
            ("owner_id", self.creds.owner_id.as_str()),
            ("message", message.as_str()),
            ("attachments", attachments.as_str()),
            ("from_group", "1"),
            ("v", self.creds.api_version.as_str()),
        ];

        let body: Value = self
            .client
            .post(format!("{}/wall.post", self.base_url))
            .query(&query)
            .send()
            .await?
            .json()
            .await?;
        parse_wall_post(&self.creds.owner_id, &body)
    }
}
