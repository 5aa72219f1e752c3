//! PlatformAdapter port - 外部配信先の統一契約
//!
//! アダプタは `Result<PublishReceipt, PlatformError>` を返し、キューが
//! `PublishOutcome` に正規化します。エラーがキューの外へ出ることはありません。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ContentItem, Platform};
use crate::error::PlatformError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub post_id: Option<String>,
    pub post_url: Option<String>,
}

impl PublishReceipt {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: Some(post_id.into()),
            post_url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.post_url = Some(url.into());
        self
    }
}

#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Adapter-specific precondition, checked before `publish`.
    fn check(&self, _item: &ContentItem) -> Result<(), PlatformError> {
        Ok(())
    }

    async fn publish(&self, item: &ContentItem) -> Result<PublishReceipt, PlatformError>;
}
