//! Publishing task model: one content item fanned out to N platforms.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::{ContentItem, ContentKind};
use super::ids::PublishTaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Wordpress,
    Youtube,
    Instagram,
    Facebook,
    Twitter,
    Tiktok,
    Wechat,
    Vk,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::Wordpress,
        Platform::Youtube,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Twitter,
        Platform::Tiktok,
        Platform::Wechat,
        Platform::Vk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Wordpress => "wordpress",
            Platform::Youtube => "youtube",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
            Platform::Wechat => "wechat",
            Platform::Vk => "vk",
        }
    }

    /// Brand spelling used in user-facing messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Wordpress => "WordPress",
            Platform::Youtube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter",
            Platform::Tiktok => "TikTok",
            Platform::Wechat => "WeChat",
            Platform::Vk => "VK",
        }
    }

    /// The only content kind this platform accepts, if it is restricted.
    pub fn required_kind(self) -> Option<ContentKind> {
        match self {
            Platform::Wordpress => Some(ContentKind::Blog),
            Platform::Youtube => Some(ContentKind::YoutubeShort),
            Platform::Instagram => Some(ContentKind::InstagramReel),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// PublishTask state.
///
/// - Queued -> Processing -> Completed (every platform succeeded)
/// - Queued -> Processing -> Failed (at least one platform failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl PublishStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PublishStatus::Completed | PublishStatus::Failed)
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PublishStatus::Queued => "queued",
            PublishStatus::Processing => "processing",
            PublishStatus::Completed => "completed",
            PublishStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Per-platform result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub platform: Platform,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishOutcome {
    pub fn succeeded(platform: Platform, post_id: Option<String>, post_url: Option<String>) -> Self {
        Self {
            platform,
            success: true,
            post_id,
            post_url,
            error: None,
        }
    }

    pub fn failed(platform: Platform, error: impl Into<String>) -> Self {
        Self {
            platform,
            success: false,
            post_id: None,
            post_url: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishTask {
    pub id: PublishTaskId,
    pub content_item: ContentItem,
    pub platforms: Vec<Platform>,
    status: PublishStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    results: Vec<PublishOutcome>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl PublishTask {
    pub fn new(
        id: PublishTaskId,
        content_item: ContentItem,
        platforms: Vec<Platform>,
        scheduled_for: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content_item,
            platforms,
            status: PublishStatus::Queued,
            scheduled_for,
            results: Vec::new(),
            created_at,
            completed_at: None,
        }
    }

    pub fn status(&self) -> PublishStatus {
        self.status
    }

    pub fn results(&self) -> &[PublishOutcome] {
        &self.results
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Due when unscheduled or when the scheduled time has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PublishStatus::Queued && self.scheduled_for.is_none_or(|at| at <= now)
    }

    /// Queued -> Processing. Returns false when already past queued.
    pub fn begin_processing(&mut self) -> bool {
        if self.status != PublishStatus::Queued {
            return false;
        }
        self.status = PublishStatus::Processing;
        true
    }

    /// Appends one platform result while processing.
    pub fn record(&mut self, outcome: PublishOutcome) {
        if self.status == PublishStatus::Processing {
            self.results.push(outcome);
        }
    }

    /// Processing -> Completed | Failed, from the aggregate of `results`.
    pub fn finish(&mut self, at: DateTime<Utc>) -> PublishStatus {
        if self.status != PublishStatus::Processing {
            return self.status;
        }
        self.status = if self.results.iter().all(|r| r.success) {
            PublishStatus::Completed
        } else {
            PublishStatus::Failed
        };
        self.completed_at = Some(at);
        self.status
    }
}
