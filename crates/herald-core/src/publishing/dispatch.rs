//! Per-platform dispatch.
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. an adapter is registered for the platform
//! 2. the content kind is accepted by the platform
//! 3. the adapter's own precondition
//! 4. the adapter call
//!
//! Every failure becomes a `success: false` outcome.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{ContentItem, Platform, PublishOutcome};
use crate::error::PlatformError;
use crate::ports::PlatformAdapter;

/// Adapters by platform. Registering a platform twice keeps the later adapter.
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<Platform, Arc<dyn PlatformAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, adapter: Arc<dyn PlatformAdapter>) -> Self {
        self.register(adapter);
        self
    }

    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        let platform = adapter.platform();
        if self.adapters.insert(platform, adapter).is_some() {
            warn!(%platform, "adapter replaced");
        }
    }

    pub fn get(&self, platform: Platform) -> Option<&Arc<dyn PlatformAdapter>> {
        self.adapters.get(&platform)
    }

    /// Configured platforms in [`Platform::ALL`] order.
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.adapters.contains_key(p))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Kind and adapter checks that run before any external call.
pub fn precheck<'a>(
    adapters: &'a AdapterRegistry,
    platform: Platform,
    item: &ContentItem,
) -> Result<&'a Arc<dyn PlatformAdapter>, PlatformError> {
    let Some(adapter) = adapters.get(platform) else {
        return Err(PlatformError::Rejected(format!(
            "{} not configured",
            platform.display_name()
        )));
    };
    if let Some(required) = platform.required_kind()
        && item.kind != required
    {
        return Err(PlatformError::Rejected(format!(
            "Only {} content can be published to {}",
            required.label(),
            platform.display_name()
        )));
    }
    adapter.check(item)?;
    Ok(adapter)
}

/// Publishes `item` to one platform and normalizes the result.
pub async fn dispatch_one(
    adapters: &AdapterRegistry,
    platform: Platform,
    item: &ContentItem,
) -> PublishOutcome {
    debug!(%platform, title = %item.title, "dispatching");
    let result = match precheck(adapters, platform, item) {
        Ok(adapter) => adapter.publish(item).await,
        Err(rejected) => Err(rejected),
    };

    match result {
        Ok(receipt) => {
            info!(%platform, post_id = ?receipt.post_id, "published");
            PublishOutcome::succeeded(platform, receipt.post_id, receipt.post_url)
        }
        Err(PlatformError::Partial { posted, error }) => {
            warn!(%platform, post_id = ?posted.post_id, error = %error, "publish partially failed");
            PublishOutcome {
                post_id: posted.post_id,
                post_url: posted.post_url,
                ..PublishOutcome::failed(platform, error.to_string())
            }
        }
        Err(err) => {
            warn!(%platform, error = %err, "publish failed");
            PublishOutcome::failed(platform, err.to_string())
        }
    }
}

/// Publishes to every platform. Outcomes follow the order of `platforms`
/// whether the fan-out is sequential or concurrent.
pub async fn dispatch_all(
    adapters: &AdapterRegistry,
    platforms: &[Platform],
    item: &ContentItem,
    parallel: bool,
) -> Vec<PublishOutcome> {
    if parallel {
        return join_all(
            platforms
                .iter()
                .map(|&platform| dispatch_one(adapters, platform, item)),
        )
        .await;
    }

    let mut outcomes = Vec::with_capacity(platforms.len());
    for &platform in platforms {
        outcomes.push(dispatch_one(adapters, platform, item).await);
    }
    outcomes
}
