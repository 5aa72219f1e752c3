//! Worker agents.
//!
//! Each worker handles exactly one [`WorkerKind`]; the supervisor looks them
//! up by kind in a [`WorkerRegistry`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::content::keys;
use crate::domain::{ContentItem, ContentKind, ContentStatus, WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;
use crate::ports::{Clock, ContentGenerator, GeneratedContent, IdGenerator};

pub mod finance;
pub mod geo;
pub mod healing;
pub mod lobbyist;
pub mod messaging;
pub mod registry;
pub mod risk;
pub mod seo;
pub mod simulation;
pub mod social;
pub mod trend_sentry;

pub use finance::FinanceWorker;
pub use geo::GeoWorker;
pub use healing::{HealingDecision, HealingPolicy, MAX_ATTEMPTS};
pub use lobbyist::LobbyistWorker;
pub use messaging::MessagingWorker;
pub use registry::{RegistryError, WorkerRegistry};
pub use risk::RiskWorker;
pub use seo::SeoWorker;
pub use simulation::SimulationWorker;
pub use social::SocialWorker;
pub use trend_sentry::TrendSentryWorker;

#[async_trait]
pub trait Worker: Send + Sync {
    fn kind(&self) -> WorkerKind;

    /// Display name, recorded as the task's `assigned_to`.
    fn name(&self) -> &str;

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError>;
}

pub(crate) fn mismatch(worker: WorkerKind, payload: &WorkerPayload) -> WorkerError {
    WorkerError::PayloadMismatch {
        worker,
        got: payload.kind(),
    }
}

/// Collaborators shared by the quality-gated generators.
#[derive(Clone)]
pub struct GeneratorDeps {
    pub generator: Arc<dyn ContentGenerator>,
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
}

impl GeneratorDeps {
    /// Wraps a finished draft as a `pending-approval` content item.
    pub(crate) fn finalize(
        &self,
        generated: GeneratedContent,
        kind: ContentKind,
        attempts: u32,
        with_geo: bool,
    ) -> ContentItem {
        let mut metadata = generated.metadata;
        metadata.insert(keys::SEO_SCORE, generated.seo_score);
        if with_geo {
            metadata.insert_opt(keys::GEO_SCORE, generated.geo_score);
            metadata.insert_opt(keys::GEO_GRADE, generated.geo_grade);
            metadata.insert_opt(keys::GEO_BREAKDOWN, generated.geo_breakdown);
            metadata.insert(keys::GEO_RECOMMENDATIONS, generated.geo_recommendations);
            metadata.insert(keys::GEO_STRENGTHS, generated.geo_strengths);
        }
        metadata.insert(keys::HEALING_ATTEMPTS, attempts);

        ContentItem::new(
            self.ids.content_id(),
            generated.title,
            kind,
            generated.content,
            self.clock.now(),
        )
        .with_status(ContentStatus::PendingApproval)
        .with_metadata(metadata)
    }
}
