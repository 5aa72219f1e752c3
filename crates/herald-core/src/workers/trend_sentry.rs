//! Trend sentry: pairs the top trends with the top pillars.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{mismatch, Worker};
use crate::domain::output::TrendReport;
use crate::domain::{WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;
use crate::ports::{Clock, TrendSource};

/// At most this many trends and pillars take part in bridging.
const BRIDGE_FAN: usize = 2;

pub struct TrendSentryWorker {
    source: Arc<dyn TrendSource>,
    clock: Arc<dyn Clock>,
}

impl TrendSentryWorker {
    pub fn new(source: Arc<dyn TrendSource>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }
}

#[async_trait]
impl Worker for TrendSentryWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::TrendSentry
    }

    fn name(&self) -> &str {
        "Trend Sentry Worker"
    }

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
        let WorkerPayload::TrendSentry(payload) = payload else {
            return Err(mismatch(self.kind(), payload));
        };

        let trends = self.source.fetch_current_trends().await?;
        let mut bridges = Vec::new();
        for trend in trends.iter().take(BRIDGE_FAN) {
            for pillar in payload.pillars.iter().take(BRIDGE_FAN) {
                bridges.push(self.source.bridge(trend, &pillar.name).await?);
            }
        }

        info!(
            worker = self.name(),
            trends = trends.len(),
            bridges = bridges.len(),
            "trend scan complete"
        );
        Ok(WorkerOutput::Trends(TrendReport {
            active_trends: trends,
            strategic_bridges: bridges,
            scan_time: self.clock.now(),
        }))
    }
}
