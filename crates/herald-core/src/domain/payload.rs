//! Worker payloads: one variant per worker kind.
//!
//! Serialized as `{"kind": "<worker-kind>", "payload": {...}}`.

use serde::{Deserialize, Serialize};

use super::content::{ContentItem, ContentKind};
use super::roadmap::TopicPillar;
use super::task::WorkerKind;

/// Input of the quality-gated generators (SEO and GEO).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPayload {
    pub topic: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub content_type: ContentKind,
    pub target_audience: String,
    /// ISO 639-1 code; maps to a regional context when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl GenerationPayload {
    pub fn new(
        topic: impl Into<String>,
        keywords: Vec<String>,
        content_type: ContentKind,
        target_audience: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            keywords,
            content_type,
            target_audience: target_audience.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPayload {
    pub source_content: String,
    /// Platform names (`instagram`, `youtube`, `facebook`); others are skipped.
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPayload {
    pub content: Vec<ContentItem>,
    /// Posts per week.
    pub velocity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPayload {
    pub pillars: Vec<TopicPillar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingPayload {
    pub content: String,
    pub target_market: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPayload {
    pub content: String,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyistPayload {
    pub brand_name: String,
    pub partner_niche: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentGateway {
    Stripe,
    Paypal,
    Crypto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancePayload {
    pub budget: f64,
    pub campaign_id: String,
    pub gateway: PaymentGateway,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum WorkerPayload {
    #[serde(rename = "seo-worker")]
    Seo(GenerationPayload),
    #[serde(rename = "geo-worker")]
    Geo(GenerationPayload),
    #[serde(rename = "social-worker")]
    Social(SocialPayload),
    #[serde(rename = "risk-worker")]
    Risk(RiskPayload),
    #[serde(rename = "trend-sentry")]
    TrendSentry(TrendPayload),
    #[serde(rename = "messaging-worker")]
    Messaging(MessagingPayload),
    #[serde(rename = "simulation-worker")]
    Simulation(SimulationPayload),
    #[serde(rename = "lobbyist-worker")]
    Lobbyist(LobbyistPayload),
    #[serde(rename = "finance-worker")]
    Finance(FinancePayload),
}

impl WorkerPayload {
    pub fn kind(&self) -> WorkerKind {
        match self {
            WorkerPayload::Seo(_) => WorkerKind::Seo,
            WorkerPayload::Geo(_) => WorkerKind::Geo,
            WorkerPayload::Social(_) => WorkerKind::Social,
            WorkerPayload::Risk(_) => WorkerKind::Risk,
            WorkerPayload::TrendSentry(_) => WorkerKind::TrendSentry,
            WorkerPayload::Messaging(_) => WorkerKind::Messaging,
            WorkerPayload::Simulation(_) => WorkerKind::Simulation,
            WorkerPayload::Lobbyist(_) => WorkerKind::Lobbyist,
            WorkerPayload::Finance(_) => WorkerKind::Finance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_tag_matches_worker_kind() {
        let payload = WorkerPayload::Seo(
            GenerationPayload::new("Rust", vec!["rust".into()], ContentKind::Blog, "devs")
                .with_language("ja"),
        );

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["kind"], json!(payload.kind().as_str()));
        assert_eq!(value["payload"]["contentType"], json!("blog"));
        assert_eq!(value["payload"]["language"], json!("ja"));
    }

    #[test]
    fn finance_payload_decodes_from_wire_json() {
        let raw = json!({
            "kind": "finance-worker",
            "payload": { "budget": 1200.0, "campaignId": "c-1", "gateway": "paypal" }
        });

        let payload: WorkerPayload = serde_json::from_value(raw).unwrap();
        assert_eq!(payload.kind(), WorkerKind::Finance);
        match payload {
            WorkerPayload::Finance(p) => assert_eq!(p.gateway, PaymentGateway::Paypal),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let raw = json!({ "kind": "agent-debate", "payload": {} });
        assert!(serde_json::from_value::<WorkerPayload>(raw).is_err());
    }
}
