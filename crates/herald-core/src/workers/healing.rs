//! Self-healing loop: regenerate until a quality score clears its threshold.

use tracing::{debug, warn};

use crate::error::WorkerError;
use crate::ports::{ContentGenerator, GeneratedContent, GenerationRequest};

/// Hard ceiling on generation attempts per task, whatever the policy asks for.
pub const MAX_ATTEMPTS: u32 = 2;

/// Threshold and attempt bound for one quality-gated generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealingPolicy {
    pub threshold: u32,
    /// Total generation attempts, including the first. Capped at [`MAX_ATTEMPTS`].
    pub max_attempts: u32,
}

impl HealingPolicy {
    pub fn new(threshold: u32, max_attempts: u32) -> Self {
        Self {
            threshold,
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS),
        }
    }

    pub fn seo() -> Self {
        Self::new(90, MAX_ATTEMPTS)
    }

    pub fn geo() -> Self {
        Self::new(85, MAX_ATTEMPTS)
    }

    fn attempt_limit(&self) -> u32 {
        self.max_attempts.clamp(1, MAX_ATTEMPTS)
    }

    /// Pure: given the latest score and attempts so far, what next?
    pub fn decide(&self, score: u32, attempts: u32) -> HealingDecision {
        if score >= self.threshold {
            HealingDecision::Accept
        } else if attempts < self.attempt_limit() {
            HealingDecision::Regenerate
        } else {
            HealingDecision::Exhausted
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealingDecision {
    Accept,
    Regenerate,
    /// Out of attempts; keep the last draft with its sub-threshold score.
    Exhausted,
}

/// Result of a healing run.
#[derive(Debug, Clone)]
pub struct Healed {
    pub generated: GeneratedContent,
    pub attempts: u32,
}

/// Runs generate → score → feedback until the policy accepts or gives up.
///
/// Generator errors abort the loop immediately.
pub async fn heal<S, F>(
    generator: &dyn ContentGenerator,
    mut request: GenerationRequest,
    policy: HealingPolicy,
    worker: &str,
    score: S,
    feedback: F,
) -> Result<Healed, WorkerError>
where
    S: Fn(&GeneratedContent) -> u32,
    F: Fn(&GeneratedContent, &GenerationRequest) -> String,
{
    let mut attempts = 0;
    loop {
        let generated = generator.generate(&request).await?;
        attempts += 1;

        let current = score(&generated);
        match policy.decide(current, attempts) {
            HealingDecision::Accept => {
                debug!(worker, score = current, attempts, "quality threshold met");
                return Ok(Healed { generated, attempts });
            }
            HealingDecision::Exhausted => {
                warn!(
                    worker,
                    score = current,
                    threshold = policy.threshold,
                    attempts,
                    "healing attempts exhausted; keeping best effort"
                );
                return Ok(Healed { generated, attempts });
            }
            HealingDecision::Regenerate => {
                warn!(
                    worker,
                    score = current,
                    threshold = policy.threshold,
                    next_attempt = attempts + 1,
                    "score below threshold; regenerating with feedback"
                );
                request.refinement_feedback = Some(feedback(&generated, &request));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentKind;
    use crate::test_support::ScriptedGenerator;
    use rstest::rstest;

    fn request() -> GenerationRequest {
        GenerationRequest {
            topic: "t".into(),
            keywords: vec![],
            content_type: ContentKind::Blog,
            target_audience: "a".into(),
            language: None,
            regional_context: None,
            refinement_feedback: None,
            enable_geo: false,
        }
    }

    #[rstest]
    #[case::meets_threshold(95, 1, HealingDecision::Accept)]
    #[case::exactly_threshold(90, 2, HealingDecision::Accept)]
    #[case::retry_once(70, 1, HealingDecision::Regenerate)]
    #[case::out_of_attempts(70, 2, HealingDecision::Exhausted)]
    fn seo_policy_decisions(#[case] score: u32, #[case] attempts: u32, #[case] expected: HealingDecision) {
        assert_eq!(HealingPolicy::seo().decide(score, attempts), expected);
    }

    #[tokio::test]
    async fn stops_as_soon_as_threshold_is_met() {
        let generator = ScriptedGenerator::with_seo_scores(&[93, 99]);

        let healed = heal(&generator, request(), HealingPolicy::seo(), "seo", |g| g.seo_score, |_, _| "x".into())
            .await
            .unwrap();

        assert_eq!(healed.attempts, 1);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn never_exceeds_max_attempts() {
        let generator = ScriptedGenerator::with_seo_scores(&[10, 20, 30, 40]);

        let healed = heal(&generator, request(), HealingPolicy::seo(), "seo", |g| g.seo_score, |_, _| "x".into())
            .await
            .unwrap();

        assert_eq!(healed.attempts, 2);
        assert_eq!(healed.generated.seo_score, 20);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn oversized_attempt_budget_is_capped() {
        let generator = ScriptedGenerator::with_seo_scores(&[10, 20, 30, 40, 50]);
        let greedy = HealingPolicy {
            threshold: 90,
            max_attempts: 5,
        };

        let healed = heal(&generator, request(), greedy, "seo", |g| g.seo_score, |_, _| "x".into())
            .await
            .unwrap();

        assert_eq!(healed.attempts, MAX_ATTEMPTS);
        assert_eq!(generator.calls(), 2);
        assert_eq!(HealingPolicy::new(90, 5).max_attempts, MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn feedback_is_passed_to_the_next_attempt() {
        let generator = ScriptedGenerator::with_seo_scores(&[50, 95]);

        heal(
            &generator,
            request(),
            HealingPolicy::seo(),
            "seo",
            |g| g.seo_score,
            |g, _| format!("score was {}", g.seo_score),
        )
        .await
        .unwrap();

        let requests = generator.requests();
        assert_eq!(requests[0].refinement_feedback, None);
        assert_eq!(requests[1].refinement_feedback.as_deref(), Some("score was 50"));
    }

    #[tokio::test]
    async fn generator_error_aborts_the_loop() {
        let generator = ScriptedGenerator::failing("model offline");

        let err = heal(&generator, request(), HealingPolicy::seo(), "seo", |g| g.seo_score, |_, _| "x".into())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("model offline"));
        assert_eq!(generator.calls(), 1);
    }
}
