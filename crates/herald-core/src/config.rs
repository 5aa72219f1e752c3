//! Runtime configuration (TOML + environment overlay).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RoadmapRamp;
use crate::workers::healing::MAX_ATTEMPTS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

pub trait ConfigValidator {
    fn validate(&self) -> ConfigResult<()>;
}

fn validate_score(value: u32, field: &str) -> ConfigResult<()> {
    if value > 100 {
        return Err(ConfigError::Validation(format!(
            "{field} must be within 0..=100, got {value}"
        )));
    }
    Ok(())
}

fn validate_not_empty(value: &str, field: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    pub supervisor: SupervisorConfig,
    pub roadmap: RoadmapRamp,
    pub publishing: PublishingConfig,
    pub platforms: PlatformsConfig,
}

impl HeraldConfig {
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        let config: HeraldConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` when given, otherwise starts from defaults. Credentials
    /// from the process environment are overlaid either way.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw)?
            }
            None => HeraldConfig::default(),
        };
        config.platforms.overlay_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }
}

impl ConfigValidator for HeraldConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.supervisor.validate()?;
        self.roadmap.validate()?;
        self.publishing.validate()?;
        self.platforms.validate()?;
        Ok(())
    }
}

// ========================================
// supervisor
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub seo_threshold: u32,
    pub geo_threshold: u32,
    /// Generation attempts per task, including the first one.
    pub max_attempts: u32,
    /// Delay before each War Room round.
    pub war_room_pacing_ms: u64,
    pub vault_balance: f64,
    pub messaging: MessagingConfig,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            seo_threshold: 90,
            geo_threshold: 85,
            max_attempts: 2,
            war_room_pacing_ms: 1000,
            vault_balance: 45_200.50,
            messaging: MessagingConfig::default(),
        }
    }
}

impl SupervisorConfig {
    pub fn war_room_pacing(&self) -> Duration {
        Duration::from_millis(self.war_room_pacing_ms)
    }
}

impl ConfigValidator for SupervisorConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_score(self.seo_threshold, "supervisor.seo_threshold")?;
        validate_score(self.geo_threshold, "supervisor.geo_threshold")?;
        if !(1..=MAX_ATTEMPTS).contains(&self.max_attempts) {
            return Err(ConfigError::Validation(format!(
                "supervisor.max_attempts must be between 1 and {MAX_ATTEMPTS}"
            )));
        }
        if !self.vault_balance.is_finite() || self.vault_balance < 0.0 {
            return Err(ConfigError::Validation(
                "supervisor.vault_balance must be a non-negative amount".to_string(),
            ));
        }
        self.messaging.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    pub brand: String,
    pub landing_url: String,
    pub channel_id: String,
    pub estimated_reach: u32,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            brand: "DigitalMEng".to_string(),
            landing_url: "https://digitalmeng.com/global".to_string(),
            channel_id: "broadcast_group_01".to_string(),
            estimated_reach: 2500,
        }
    }
}

impl ConfigValidator for MessagingConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_not_empty(&self.brand, "supervisor.messaging.brand")?;
        validate_not_empty(&self.landing_url, "supervisor.messaging.landing_url")?;
        validate_not_empty(&self.channel_id, "supervisor.messaging.channel_id")
    }
}

// ========================================
// roadmap
// ========================================

impl ConfigValidator for RoadmapRamp {
    fn validate(&self) -> ConfigResult<()> {
        if self.monthly_targets.is_empty() {
            return Err(ConfigError::Validation(
                "roadmap.monthly_targets cannot be empty".to_string(),
            ));
        }
        if self.weeks_per_month == 0 {
            return Err(ConfigError::Validation(
                "roadmap.weeks_per_month must be at least 1".to_string(),
            ));
        }
        if self.pillars_per_week == 0 {
            return Err(ConfigError::Validation(
                "roadmap.pillars_per_week must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ========================================
// publishing
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishingConfig {
    /// Dispatch a task's platforms concurrently (results keep input order).
    pub parallel_fanout: bool,
    /// Number of completed tasks listed by `get_queue_status`.
    pub completed_history: usize,
    /// Pause between tweets of a thread.
    pub thread_pacing_ms: u64,
    pub http_timeout_secs: u64,
    /// Tick of the background publisher loop.
    pub poll_interval_secs: u64,
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            parallel_fanout: false,
            completed_history: 10,
            thread_pacing_ms: 1000,
            http_timeout_secs: 30,
            poll_interval_secs: 30,
        }
    }
}

impl PublishingConfig {
    pub fn thread_pacing(&self) -> Duration {
        Duration::from_millis(self.thread_pacing_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl ConfigValidator for PublishingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "publishing.http_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "publishing.poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ========================================
// platforms
// ========================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformsConfig {
    pub twitter: Option<TwitterCredentials>,
    pub vk: Option<VkCredentials>,
    pub wechat: Option<WeChatCredentials>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VkCredentials {
    pub access_token: String,
    /// User id, or group id prefixed with `-`.
    pub owner_id: String,
    #[serde(default = "default_vk_api_version")]
    pub api_version: String,
}

fn default_vk_api_version() -> String {
    "5.131".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeChatCredentials {
    pub app_id: String,
    pub app_secret: String,
    #[serde(default = "default_wechat_author")]
    pub author: String,
}

fn default_wechat_author() -> String {
    "DigitalMEng".to_string()
}

impl PlatformsConfig {
    /// Fills credentials from `HERALD_*` variables. A platform is only set
    /// when every one of its required variables is present.
    pub fn overlay_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let (Some(api_key), Some(api_secret), Some(access_token), Some(access_token_secret)) = (
            lookup("HERALD_TWITTER_API_KEY"),
            lookup("HERALD_TWITTER_API_SECRET"),
            lookup("HERALD_TWITTER_ACCESS_TOKEN"),
            lookup("HERALD_TWITTER_ACCESS_TOKEN_SECRET"),
        ) {
            self.twitter = Some(TwitterCredentials {
                api_key,
                api_secret,
                access_token,
                access_token_secret,
            });
        }

        if let (Some(access_token), Some(owner_id)) =
            (lookup("HERALD_VK_ACCESS_TOKEN"), lookup("HERALD_VK_OWNER_ID"))
        {
            self.vk = Some(VkCredentials {
                access_token,
                owner_id,
                api_version: lookup("HERALD_VK_API_VERSION").unwrap_or_else(default_vk_api_version),
            });
        }

        if let (Some(app_id), Some(app_secret)) =
            (lookup("HERALD_WECHAT_APP_ID"), lookup("HERALD_WECHAT_APP_SECRET"))
        {
            self.wechat = Some(WeChatCredentials {
                app_id,
                app_secret,
                author: lookup("HERALD_WECHAT_AUTHOR").unwrap_or_else(default_wechat_author),
            });
        }
    }
}

impl ConfigValidator for PlatformsConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(t) = &self.twitter {
            validate_not_empty(&t.api_key, "platforms.twitter.api_key")?;
            validate_not_empty(&t.api_secret, "platforms.twitter.api_secret")?;
            validate_not_empty(&t.access_token, "platforms.twitter.access_token")?;
            validate_not_empty(&t.access_token_secret, "platforms.twitter.access_token_secret")?;
        }
        if let Some(vk) = &self.vk {
            validate_not_empty(&vk.access_token, "platforms.vk.access_token")?;
            validate_not_empty(&vk.owner_id, "platforms.vk.owner_id")?;
        }
        if let Some(wc) = &self.wechat {
            validate_not_empty(&wc.app_id, "platforms.wechat.app_id")?;
            validate_not_empty(&wc.app_secret, "platforms.wechat.app_secret")?;
        }
        Ok(())
    }
}
