//! GEO (generative-engine optimization) worker.
//!
//! Same loop as the SEO worker, gated on the GEO score. Feedback reuses the
//! generator's own recommendations when it returned any.

use async_trait::async_trait;
use tracing::info;

use super::healing::{heal, HealingPolicy};
use super::seo::initial_request;
use super::{mismatch, GeneratorDeps, Worker};
use crate::domain::{WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;
use crate::ports::{GeneratedContent, GenerationRequest};

pub struct GeoWorker {
    deps: GeneratorDeps,
    policy: HealingPolicy,
}

impl GeoWorker {
    pub fn new(deps: GeneratorDeps) -> Self {
        Self {
            deps,
            policy: HealingPolicy::geo(),
        }
    }

    pub fn with_policy(mut self, policy: HealingPolicy) -> Self {
        self.policy = policy;
        self
    }
}

fn geo_score(generated: &GeneratedContent) -> u32 {
    generated.geo_score.unwrap_or(0)
}

fn geo_feedback(generated: &GeneratedContent, _request: &GenerationRequest) -> String {
    if generated.geo_recommendations.is_empty() {
        format!(
            "The GEO score was only {}/100. Enhance conversational flow, directness, and \
             semantic richness for better AI search engine visibility.",
            geo_score(generated)
        )
    } else {
        format!(
            "Improve the content based on these specific recommendations: {}",
            generated.geo_recommendations.join(". ")
        )
    }
}

#[async_trait]
impl Worker for GeoWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Geo
    }

    fn name(&self) -> &str {
        "GEO Specialist"
    }

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
        let WorkerPayload::Geo(payload) = payload else {
            return Err(mismatch(self.kind(), payload));
        };
        info!(worker = self.name(), topic = %payload.topic, "optimizing content for AI search");

        let healed = heal(
            self.deps.generator.as_ref(),
            initial_request(payload, true),
            self.policy,
            self.name(),
            geo_score,
            geo_feedback,
        )
        .await?;

        let score = geo_score(&healed.generated);
        let grade = healed.generated.geo_grade.clone();
        let item = self
            .deps
            .finalize(healed.generated, payload.content_type, healed.attempts, true);
        info!(
            worker = self.name(),
            content_id = %item.id,
            geo_score = score,
            geo_grade = grade.as_deref().unwrap_or("-"),
            attempts = healed.attempts,
            "content finalized"
        );
        Ok(WorkerOutput::Content(item))
    }
}
