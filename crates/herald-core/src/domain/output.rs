//! Worker outputs: one variant per result shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::ContentItem;
use super::payload::PaymentGateway;

// ========================================
// Social atomizer
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramDraft {
    pub caption: String,
    /// Always `reel`.
    #[serde(rename = "type")]
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoutubeDraft {
    pub title: String,
    pub description: String,
    /// Always `short`.
    #[serde(rename = "type")]
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookDraft {
    pub text: String,
    /// Always `story`.
    #[serde(rename = "type")]
    pub format: String,
}

/// Per-platform excerpts; platforms that were not requested stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomizedContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<InstagramDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<YoutubeDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<FacebookDraft>,
}

impl AtomizedContent {
    pub fn platform_count(&self) -> usize {
        usize::from(self.instagram.is_some())
            + usize::from(self.youtube.is_some())
            + usize::from(self.facebook.is_some())
    }
}

// ========================================
// Risk
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskKind {
    HighVelocity,
    DuplicateContent,
    AiHallucinationRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    #[serde(rename = "type")]
    pub kind: RiskKind,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    Healthy,
    Warning,
    Critical,
}

impl RiskStatus {
    pub fn from_issue_count(n: usize) -> Self {
        match n {
            0 => RiskStatus::Healthy,
            1 | 2 => RiskStatus::Warning,
            _ => RiskStatus::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub risk_score: u32,
    pub risks: Vec<RiskFinding>,
    pub status: RiskStatus,
}

impl RiskReport {
    pub fn from_findings(risks: Vec<RiskFinding>) -> Self {
        let n = u32::try_from(risks.len()).unwrap_or(u32::MAX);
        Self {
            risk_score: n.saturating_mul(15).min(100),
            status: RiskStatus::from_issue_count(risks.len()),
            risks,
        }
    }

    pub fn has(&self, kind: RiskKind) -> bool {
        self.risks.iter().any(|r| r.kind == kind)
    }
}

// ========================================
// Trend sentry
// ========================================

/// A trend signal returned by the trend source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub name: String,
    /// Relative momentum (0-100).
    pub momentum: u32,
}

/// A "trend ↔ pillar" bridge suggested by the trend source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBridge {
    pub trend: String,
    pub pillar: String,
    pub angle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub active_trends: Vec<Trend>,
    pub strategic_bridges: Vec<TrendBridge>,
    pub scan_time: DateTime<Utc>,
}

// ========================================
// Single-shot producers
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastDraft {
    pub platform: String,
    pub channel_id: String,
    pub optimized_text: String,
    pub estimated_reach: u32,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeDistribution {
    pub viral_potential: f64,
    pub steady_growth: f64,
    pub immediate_obsolescence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationForecast {
    pub topic: String,
    pub probabilistic_outcomes: OutcomeDistribution,
    pub time_to_impact: String,
    pub butterfly_effect_radius: String,
    pub predicted_resonance_score: u32,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedDeal {
    pub backlink_exchange: String,
    pub affiliate_commission: String,
    pub mutual_promotion_window: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnershipProposal {
    pub brand_name: String,
    pub partner_niche: String,
    pub negotiation_status: String,
    pub partner_agent_id: String,
    pub proposed_deal: ProposedDeal,
    pub trust_score: u32,
    pub legal_audit_status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendStatus {
    Authorized,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAllocation {
    pub campaign_id: String,
    pub allocated_budget: f64,
    pub allocated_gateway: PaymentGateway,
    pub predicted_roi: f64,
    pub auto_spend_status: SpendStatus,
    pub remaining_vault_balance: f64,
    pub transaction_hash: String,
    pub recommendation: String,
}

// ========================================
// Union
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "kebab-case")]
pub enum WorkerOutput {
    Content(ContentItem),
    Social(AtomizedContent),
    Risk(RiskReport),
    Trends(TrendReport),
    Messaging(BroadcastDraft),
    Simulation(SimulationForecast),
    Lobbyist(PartnershipProposal),
    Finance(BudgetAllocation),
}

impl WorkerOutput {
    pub fn as_content(&self) -> Option<&ContentItem> {
        match self {
            WorkerOutput::Content(item) => Some(item),
            _ => None,
        }
    }

    pub fn into_content(self) -> Option<ContentItem> {
        match self {
            WorkerOutput::Content(item) => Some(item),
            _ => None,
        }
    }
}
