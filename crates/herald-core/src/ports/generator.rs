//! ContentGenerator port - テキスト生成の抽象化
//!
//! 生成そのもの（LLM 呼び出し）はこのクレートの外側にあります。
//! ワーカーは `GenerationRequest` を渡し、スコア付きの `GeneratedContent` を受け取ります。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ContentKind, Metadata};
use crate::error::WorkerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: String,
    pub keywords: Vec<String>,
    pub content_type: ContentKind,
    pub target_audience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regional_context: Option<String>,
    /// Set by the self-healing loop after a sub-threshold attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement_feedback: Option<String>,
    #[serde(default)]
    pub enable_geo: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub title: String,
    pub content: String,
    pub seo_score: u32,
    #[serde(default)]
    pub geo_score: Option<u32>,
    #[serde(default)]
    pub geo_grade: Option<String>,
    #[serde(default)]
    pub geo_breakdown: Option<serde_json::Value>,
    #[serde(default)]
    pub geo_recommendations: Vec<String>,
    #[serde(default)]
    pub geo_strengths: Vec<String>,
    /// Extra generator fields, copied into the content item's metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent, WorkerError>;
}

/// Offline generator that fills a fixed template.
///
/// Scores improve once refinement feedback is present, so the healing loop
/// can be exercised without a model behind it.
#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    fn grade(score: u32) -> &'static str {
        match score {
            90.. => "A",
            80..=89 => "B",
            70..=79 => "C",
            _ => "D",
        }
    }
}

#[async_trait]
impl ContentGenerator for TemplateGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent, WorkerError> {
        let refined = request.refinement_feedback.is_some();
        let keywords = request.keywords.join(", ");
        let region = request
            .regional_context
            .as_deref()
            .map(|r| format!(" Tailored for {r}."))
            .unwrap_or_default();

        let content = format!(
            "{topic}: what {audience} need to know\n\n\
             {topic} keeps changing how teams work.{region} \
             This {kind} covers {keywords} with practical steps you can apply this week.",
            topic = request.topic,
            audience = request.target_audience,
            kind = request.content_type.label(),
        );

        let seo_score = if refined { 94 } else { 82 };
        let mut generated = GeneratedContent {
            title: format!("{}: A Guide for {}", request.topic, request.target_audience),
            content,
            seo_score,
            ..Default::default()
        };
        generated.metadata.insert("keywords", request.keywords.clone());

        if request.enable_geo {
            let geo_score = if refined { 88 } else { 76 };
            generated.geo_score = Some(geo_score);
            generated.geo_grade = Some(Self::grade(geo_score).to_string());
            generated.geo_breakdown = Some(serde_json::json!({
                "directness": geo_score,
                "semanticRichness": geo_score.saturating_sub(4),
            }));
            if !refined {
                generated.geo_recommendations =
                    vec!["Answer the core question in the first sentence".to_string()];
            }
            generated.geo_strengths = vec!["Clear structure".to_string()];
        }

        Ok(generated)
    }
}
