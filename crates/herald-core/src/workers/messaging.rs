//! Messaging specialist: chat-optimized broadcast drafts.

use async_trait::async_trait;
use tracing::info;

use super::{mismatch, Worker};
use crate::config::MessagingConfig;
use crate::domain::content::excerpt;
use crate::domain::output::BroadcastDraft;
use crate::domain::{WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;

pub struct MessagingWorker {
    config: MessagingConfig,
}

impl MessagingWorker {
    pub fn new(config: MessagingConfig) -> Self {
        Self { config }
    }

    pub fn draft(&self, content: &str, target_market: &str) -> String {
        let market_tag: String = target_market.split_whitespace().collect();
        format!(
            "🚀 *{brand} Global Update!*\n\n{excerpt}...\n\nTap to learn more: {url}\n\n#Automation #{market_tag}",
            brand = self.config.brand,
            excerpt = excerpt(content, 150),
            url = self.config.landing_url,
        )
    }
}

impl Default for MessagingWorker {
    fn default() -> Self {
        Self::new(MessagingConfig::default())
    }
}

#[async_trait]
impl Worker for MessagingWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Messaging
    }

    fn name(&self) -> &str {
        "Messaging Specialist"
    }

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
        let WorkerPayload::Messaging(payload) = payload else {
            return Err(mismatch(self.kind(), payload));
        };

        let draft = BroadcastDraft {
            platform: "whatsapp".to_string(),
            channel_id: self.config.channel_id.clone(),
            optimized_text: self.draft(&payload.content, &payload.target_market),
            estimated_reach: self.config.estimated_reach,
            status: "staged".to_string(),
        };
        info!(worker = self.name(), market = %payload.target_market, "broadcast draft staged");
        Ok(WorkerOutput::Messaging(draft))
    }
}
