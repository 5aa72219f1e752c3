//! WeChat Official Account publishing: token, draft, then free-publish.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::{PublishingConfig, WeChatCredentials};
use crate::domain::content::excerpt;
use crate::domain::{ContentItem, Platform};
use crate::error::PlatformError;
use crate::ports::{Clock, PlatformAdapter, PublishReceipt};

pub const WECHAT_API_BASE: &str = "https://api.wechat.com/cgi-bin";

const DIGEST_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub author: String,
    pub digest: String,
    pub content: String,
    pub thumb_media_id: String,
}

impl Article {
    pub fn from_item(item: &ContentItem, author: &str, thumb_media_id: &str) -> Self {
        Self {
            title: item.title.clone(),
            author: author.to_string(),
            digest: excerpt(&item.content, DIGEST_CHARS).to_string(),
            content: item.content.clone(),
            thumb_media_id: thumb_media_id.to_string(),
        }
    }
}

pub fn parse_token(body: &Value, now: DateTime<Utc>) -> Result<AccessToken, PlatformError> {
    let token = body
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| PlatformError::Auth("Authentication failed".into()))?;
    let expires_in = body.get("expires_in").and_then(Value::as_i64).unwrap_or(0);
    Ok(AccessToken {
        token: token.to_string(),
        expires_at: now + Duration::seconds(expires_in),
    })
}

/// Reads `field` from a WeChat response, or maps `errmsg`/`errcode`.
pub fn parse_field(body: &Value, field: &str) -> Result<String, PlatformError> {
    if let Some(value) = body.get(field).and_then(Value::as_str) {
        return Ok(value.to_string());
    }
    let message = body
        .get("errmsg")
        .and_then(Value::as_str)
        .unwrap_or("Unknown WeChat error");
    let code = body.get("errcode").and_then(Value::as_i64);
    Err(PlatformError::api(code, message))
}

pub struct WeChatAdapter {
    client: Client,
    creds: WeChatCredentials,
    clock: Arc<dyn Clock>,
    base_url: String,
    token: Mutex<Option<AccessToken>>,
}

impl WeChatAdapter {
    pub fn new(
        creds: WeChatCredentials,
        clock: Arc<dyn Clock>,
        config: &PublishingConfig,
    ) -> Result<Self, PlatformError> {
        if creds.app_id.is_empty() || creds.app_secret.is_empty() {
            return Err(PlatformError::Auth("WeChat app id and secret are required".into()));
        }
        Ok(Self {
            client: Client::builder().timeout(config.http_timeout()).build()?,
            creds,
            clock,
            base_url: WECHAT_API_BASE.to_string(),
            token: Mutex::new(None),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Cached token, refreshed once expired.
    async fn access_token(&self) -> Result<String, PlatformError> {
        let now = self.clock.now();
        if let Some(cached) = self.token.lock().await.as_ref()
            && cached.is_valid(now)
        {
            return Ok(cached.token.clone());
        }

        debug!("refreshing WeChat access token");
        let body: Value = self
            .client
            .get(format!("{}/token", self.base_url))
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", self.creds.app_id.as_str()),
                ("secret", self.creds.app_secret.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;
        let fresh = parse_token(&body, now)?;
        let token = fresh.token.clone();
        *self.token.lock().await = Some(fresh);
        Ok(token)
    }

    async fn post(&self, path: &str, token: &str, payload: &Value) -> Result<Value, PlatformError> {
        Ok(self
            .client
            .post(format!("{}/{path}", self.base_url))
            .query(&[("access_token", token)])
            .json(payload)
            .send()
            .await?
            .json()
            .await?)
    }

    pub async fn create_draft(&self, articles: &[Article]) -> Result<String, PlatformError> {
        let token = self.access_token().await?;
        let body = self.post("draft/add", &token, &json!({ "articles": articles })).await?;
        parse_field(&body, "media_id")
    }

    pub async fn submit(&self, media_id: &str) -> Result<String, PlatformError> {
        let token = self.access_token().await?;
        let body = self
            .post("freepublish/submit", &token, &json!({ "media_id": media_id }))
            .await?;
        parse_field(&body, "publish_id")
    }
}

#[async_trait]
impl PlatformAdapter for WeChatAdapter {
    fn platform(&self) -> Platform {
        Platform::Wechat
    }

    fn check(&self, item: &ContentItem) -> Result<(), PlatformError> {
        require_cover(item)
    }

    async fn publish(&self, item: &ContentItem) -> Result<PublishReceipt, PlatformError> {
        let thumb = item.metadata.thumb_media_id().unwrap_or_default();
        let article = Article::from_item(item, &self.creds.author, thumb);
        let media_id = self.create_draft(&[article]).await?;
        let publish_id = self.submit(&media_id).await?;
        Ok(PublishReceipt::new(publish_id))
    }
}

/// WeChat articles need a cover image uploaded beforehand.
pub fn require_cover(item: &ContentItem) -> Result<(), PlatformError> {
    match item.metadata.thumb_media_id() {
        Some(_) => Ok(()),
        None => Err(PlatformError::Rejected(
            "WeChat requires a cover image (thumbMediaId)".into(),
        )),
    }
}
