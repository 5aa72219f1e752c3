//! SEO content worker: generates a draft and heals it until the SEO score
//! clears the threshold.

use async_trait::async_trait;
use tracing::info;

use super::healing::{heal, HealingPolicy};
use super::{mismatch, GeneratorDeps, Worker};
use crate::domain::region::region_for_language;
use crate::domain::{GenerationPayload, WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;
use crate::ports::{GeneratedContent, GenerationRequest};

pub struct SeoWorker {
    deps: GeneratorDeps,
    policy: HealingPolicy,
}

impl SeoWorker {
    pub fn new(deps: GeneratorDeps) -> Self {
        Self {
            deps,
            policy: HealingPolicy::seo(),
        }
    }

    pub fn with_policy(mut self, policy: HealingPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Builds the first generation request, injecting the regional context when
/// the language is known.
pub(crate) fn initial_request(payload: &GenerationPayload, enable_geo: bool) -> GenerationRequest {
    GenerationRequest {
        topic: payload.topic.clone(),
        keywords: payload.keywords.clone(),
        content_type: payload.content_type,
        target_audience: payload.target_audience.clone(),
        language: payload.language.clone(),
        regional_context: payload
            .language
            .as_deref()
            .and_then(region_for_language)
            .map(str::to_string),
        refinement_feedback: None,
        enable_geo,
    }
}

fn seo_feedback(generated: &GeneratedContent, request: &GenerationRequest) -> String {
    format!(
        "The SEO score was only {}/100. Please improve keyword integration for: {}. \
         Ensure the content is more structured and authoritative.",
        generated.seo_score,
        request.keywords.join(", ")
    )
}

#[async_trait]
impl Worker for SeoWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Seo
    }

    fn name(&self) -> &str {
        "SEO Content Worker"
    }

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
        let WorkerPayload::Seo(payload) = payload else {
            return Err(mismatch(self.kind(), payload));
        };
        info!(worker = self.name(), topic = %payload.topic, "generating content");

        let healed = heal(
            self.deps.generator.as_ref(),
            initial_request(payload, false),
            self.policy,
            self.name(),
            |g| g.seo_score,
            seo_feedback,
        )
        .await?;

        let score = healed.generated.seo_score;
        let item = self
            .deps
            .finalize(healed.generated, payload.content_type, healed.attempts, false);
        info!(
            worker = self.name(),
            content_id = %item.id,
            seo_score = score,
            attempts = healed.attempts,
            "content finalized"
        );
        Ok(WorkerOutput::Content(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::{ContentKind, ContentStatus};
    use crate::domain::payload::RiskPayload;
    use crate::test_support::{fixed_clock, ids, ScriptedGenerator};

    fn worker(generator: &ScriptedGenerator) -> SeoWorker {
        let clock = fixed_clock();
        SeoWorker::new(GeneratorDeps {
            generator: Arc::new(generator.clone()),
            ids: ids(clock.clone()),
            clock,
        })
    }

    fn payload() -> WorkerPayload {
        WorkerPayload::Seo(GenerationPayload::new(
            "Zero-trust networking",
            vec!["zero trust".into(), "sase".into()],
            ContentKind::Blog,
            "IT leaders",
        ))
    }

    #[tokio::test]
    async fn heals_once_and_records_attempts() {
        // 70 on the first attempt, 96 on the second
        let generator = ScriptedGenerator::with_seo_scores(&[70, 96]);

        let out = worker(&generator).execute(&payload()).await.unwrap();
        let item = out.into_content().unwrap();

        assert_eq!(item.metadata.healing_attempts(), Some(2));
        assert_eq!(item.metadata.seo_score(), Some(96));
        assert_eq!(item.status, ContentStatus::PendingApproval);
        assert_eq!(item.kind, ContentKind::Blog);
        assert_eq!(item.title, "draft 2");
    }

    #[tokio::test]
    async fn feedback_cites_score_and_keywords() {
        let generator = ScriptedGenerator::with_seo_scores(&[61, 91]);

        worker(&generator).execute(&payload()).await.unwrap();

        let feedback = generator.requests()[1].refinement_feedback.clone().unwrap();
        assert!(feedback.contains("61/100"));
        assert!(feedback.contains("zero trust, sase"));
    }

    #[tokio::test]
    async fn first_pass_above_threshold_is_not_regenerated() {
        let generator = ScriptedGenerator::with_seo_scores(&[92]);

        let item = worker(&generator)
            .execute(&payload())
            .await
            .unwrap()
            .into_content()
            .unwrap();

        assert_eq!(item.metadata.healing_attempts(), Some(1));
        assert_eq!(generator.calls(), 1);
        assert!(item.metadata.geo_score().is_none());
    }

    #[tokio::test]
    async fn language_adds_regional_context() {
        let generator = ScriptedGenerator::with_seo_scores(&[95]);
        let WorkerPayload::Seo(p) = payload() else { unreachable!() };
        let payload = WorkerPayload::Seo(p.with_language("pt"));

        worker(&generator).execute(&payload).await.unwrap();

        let req = &generator.requests()[0];
        assert_eq!(req.regional_context.as_deref(), Some("Brazil / Portugal"));
        assert!(!req.enable_geo);
    }

    #[tokio::test]
    async fn generator_metadata_passes_through() {
        let mut draft = crate::ports::GeneratedContent {
            seo_score: 95,
            ..Default::default()
        };
        draft.metadata.insert("readingTime", "3 min");
        let generator = ScriptedGenerator::with_outputs(vec![draft]);

        let item = worker(&generator)
            .execute(&payload())
            .await
            .unwrap()
            .into_content()
            .unwrap();

        assert_eq!(item.metadata.get("readingTime"), Some(&serde_json::json!("3 min")));
    }

    #[tokio::test]
    async fn rejects_foreign_payload() {
        let generator = ScriptedGenerator::with_seo_scores(&[95]);
        let foreign = WorkerPayload::Risk(RiskPayload {
            content: vec![],
            velocity: 1,
        });

        let err = worker(&generator).execute(&foreign).await.unwrap_err();
        assert!(matches!(err, WorkerError::PayloadMismatch { .. }));
        assert_eq!(generator.calls(), 0);
    }
}
