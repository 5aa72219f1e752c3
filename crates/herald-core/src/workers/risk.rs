//! Risk monitor: spam-velocity, duplicate and hallucination checks.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::info;

use super::{mismatch, Worker};
use crate::domain::output::{RiskFinding, RiskKind, RiskReport, Severity};
use crate::domain::{ContentItem, WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;

/// Posts per week above which a new account looks automated.
pub const VELOCITY_LIMIT: u32 = 15;

const RED_FLAGS: [&str; 5] = [
    "as an ai language model",
    "my knowledge cutoff",
    "in conclusion",
    "it is important to note",
    "delve into",
];

pub struct RiskWorker;

/// 20 per boilerplate phrase, +15 for a short body citing "According to".
pub fn hallucination_score(content: &str) -> u32 {
    let lower = content.to_lowercase();
    let mut score: u32 = RED_FLAGS
        .iter()
        .filter(|flag| lower.contains(*flag))
        .map(|_| 20)
        .sum();

    if content.chars().count() < 300 && content.contains("According to") {
        score += 15;
    }
    score.min(100)
}

pub fn assess(items: &[ContentItem], velocity: u32) -> RiskReport {
    let mut risks = Vec::new();

    if velocity > VELOCITY_LIMIT {
        risks.push(RiskFinding {
            kind: RiskKind::HighVelocity,
            severity: Severity::Medium,
            message: "Publishing velocity above recommended threshold for new accounts".to_string(),
            recommendation: "Reduce to 10-12 posts per week to maintain natural growth pattern"
                .to_string(),
        });
    }

    // first line -> count, in first-seen order
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        let line = item.first_line();
        let count = counts.entry(line).or_insert(0);
        if *count == 0 {
            order.push(line);
        }
        *count += 1;
    }
    for line in order {
        let count = counts.get(line).copied().unwrap_or(0);
        if count > 1 {
            risks.push(RiskFinding {
                kind: RiskKind::DuplicateContent,
                severity: Severity::High,
                message: format!("Detected {count} items with similar content"),
                recommendation: "Increase content diversity to avoid duplicate content penalties"
                    .to_string(),
            });
        }
    }

    for item in items {
        let score = hallucination_score(&item.content);
        if score > 30 {
            risks.push(RiskFinding {
                kind: RiskKind::AiHallucinationRisk,
                severity: if score > 70 { Severity::High } else { Severity::Medium },
                message: format!(
                    "Content for \"{}\" contains patterns associated with AI hallucination",
                    item.title
                ),
                recommendation: "Review technical claims and specific data points for accuracy"
                    .to_string(),
            });
        }
    }

    RiskReport::from_findings(risks)
}

#[async_trait]
impl Worker for RiskWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Risk
    }

    fn name(&self) -> &str {
        "Risk Monitor Worker"
    }

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
        let WorkerPayload::Risk(payload) = payload else {
            return Err(mismatch(self.kind(), payload));
        };

        let report = assess(&payload.content, payload.velocity);
        info!(
            worker = self.name(),
            issues = report.risks.len(),
            risk_score = report.risk_score,
            "risk analysis complete"
        );
        Ok(WorkerOutput::Risk(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::output::RiskStatus;
    use crate::domain::ContentKind;
    use crate::test_support::content_item;
    use rstest::rstest;

    #[rstest]
    #[case::clean("A grounded article about soil chemistry.", 0)]
    #[case::one_flag("In conclusion, soil matters.", 20)]
    #[case::case_insensitive("AS AN AI LANGUAGE MODEL I cannot.", 20)]
    #[case::two_flags_short_attribution(
        "It is important to note that we delve into this. According to experts.",
        55
    )]
    #[case::all_flags(
        "As an AI language model with my knowledge cutoff, it is important to note we delve into it. In conclusion. According to X.",
        100
    )]
    fn hallucination_scoring(#[case] body: &str, #[case] expected: u32) {
        assert_eq!(hallucination_score(body), expected);
    }

    #[test]
    fn attribution_penalty_only_for_short_bodies() {
        let long = format!("According to the survey, {}", "data ".repeat(80));
        assert_eq!(hallucination_score(&long), 0);
    }

    #[test]
    fn velocity_and_duplicates_give_warning() {
        let items = vec![
            content_item(ContentKind::Blog, "Same headline\nbody one"),
            content_item(ContentKind::Blog, "Same headline\nbody two"),
        ];

        let report = assess(&items, 20);

        assert!(report.has(RiskKind::HighVelocity));
        assert!(report.has(RiskKind::DuplicateContent));
        assert_eq!(report.risks.len(), 2);
        assert_eq!(report.risk_score, 30);
        assert_eq!(report.status, RiskStatus::Warning);
        assert_eq!(report.risks[1].message, "Detected 2 items with similar content");
    }

    #[test]
    fn each_duplicated_line_is_one_finding() {
        let items = vec![
            content_item(ContentKind::Blog, "A\n1"),
            content_item(ContentKind::Blog, "A\n2"),
            content_item(ContentKind::Blog, "A\n3"),
            content_item(ContentKind::Blog, "B\n1"),
            content_item(ContentKind::Blog, "B\n2"),
            content_item(ContentKind::Blog, "C\n1"),
        ];

        let report = assess(&items, 0);
        let dupes: Vec<_> = report
            .risks
            .iter()
            .filter(|r| r.kind == RiskKind::DuplicateContent)
            .map(|r| r.message.as_str())
            .collect();

        assert_eq!(
            dupes,
            vec![
                "Detected 3 items with similar content",
                "Detected 2 items with similar content"
            ]
        );
        assert_eq!(report.status, RiskStatus::Warning);
    }

    #[test]
    fn hallucination_severity_scales_with_score() {
        let medium = content_item(
            ContentKind::Blog,
            "In conclusion, we delve into the topic with a lot more words to follow.",
        );
        let high = content_item(
            ContentKind::Blog,
            "As an AI language model, my knowledge cutoff means that, in conclusion, we delve into it.",
        );

        let report = assess(&[medium, high], 0);
        let severities: Vec<_> = report.risks.iter().map(|r| r.severity).collect();
        assert_eq!(severities, vec![Severity::Medium, Severity::High]);
    }

    #[test]
    fn velocity_at_limit_is_fine() {
        let report = assess(&[], VELOCITY_LIMIT);
        assert_eq!(report.status, RiskStatus::Healthy);
        assert_eq!(report.risk_score, 0);
    }
}
