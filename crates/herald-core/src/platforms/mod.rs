//! Platform adapters and the helpers they share.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{PlatformsConfig, PublishingConfig};
use crate::domain::{ContentItem, Platform};
use crate::error::PlatformError;
use crate::ports::{Clock, PlatformAdapter, PublishReceipt};
use crate::publishing::AdapterRegistry;

pub mod oauth;
pub mod thread;
pub mod twitter;
pub mod vk;
pub mod wechat;

pub use oauth::{OAuthError, OAuthSigner};
pub use thread::{TWEET_LIMIT, content_to_thread};
pub use twitter::TwitterAdapter;
pub use vk::VkAdapter;
pub use wechat::WeChatAdapter;

/// TikTok posts need a hosted video.
pub fn require_video(item: &ContentItem) -> Result<(), PlatformError> {
    match item.metadata.video_url() {
        Some(_) => Ok(()),
        None => Err(PlatformError::Rejected("TikTok requires a videoUrl".into())),
    }
}

/// Accepts everything its platform would accept, without calling out.
#[derive(Debug, Clone, Copy)]
pub struct DryRunAdapter {
    platform: Platform,
}

impl DryRunAdapter {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl PlatformAdapter for DryRunAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn check(&self, item: &ContentItem) -> Result<(), PlatformError> {
        match self.platform {
            Platform::Tiktok => require_video(item),
            Platform::Wechat => wechat::require_cover(item),
            _ => Ok(()),
        }
    }

    async fn publish(&self, item: &ContentItem) -> Result<PublishReceipt, PlatformError> {
        info!(platform = %self.platform, title = %item.title, "dry run publish");
        Ok(PublishReceipt::new(format!("dry-run-{}-{}", self.platform, item.id.as_ulid())))
    }
}

/// A dry-run adapter for every platform.
pub fn dry_run_registry() -> AdapterRegistry {
    Platform::ALL
        .into_iter()
        .fold(AdapterRegistry::new(), |registry, platform| {
            registry.with(Arc::new(DryRunAdapter::new(platform)))
        })
}

/// Live adapters for every platform with credentials in `platforms`.
pub fn live_registry(
    platforms: &PlatformsConfig,
    publishing: &PublishingConfig,
    clock: Arc<dyn Clock>,
) -> Result<AdapterRegistry, PlatformError> {
    let mut registry = AdapterRegistry::new();
    if let Some(creds) = &platforms.twitter {
        registry.register(Arc::new(TwitterAdapter::new(creds, Arc::clone(&clock), publishing)?));
    }
    if let Some(creds) = &platforms.vk {
        registry.register(Arc::new(VkAdapter::new(creds.clone(), publishing)?));
    }
    if let Some(creds) = &platforms.wechat {
        registry.register(Arc::new(WeChatAdapter::new(creds.clone(), clock, publishing)?));
    }
    info!(platforms = ?registry.platforms(), "live adapters configured");
    Ok(registry)
}
