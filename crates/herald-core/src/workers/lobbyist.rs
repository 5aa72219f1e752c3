use async_trait::async_trait;
use tracing::info;

use super::{mismatch, Worker};
use crate::domain::output::{PartnershipProposal, ProposedDeal};
use crate::domain::{WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;

/// Drafts a term-sheet style partnership proposal for a partner niche.
pub struct LobbyistWorker;

#[async_trait]
impl Worker for LobbyistWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Lobbyist
    }

    fn name(&self) -> &str {
        "Autonomous Lobbyist"
    }

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
        let WorkerPayload::Lobbyist(payload) = payload else {
            return Err(mismatch(self.kind(), payload));
        };
        info!(worker = self.name(), niche = %payload.partner_niche, "negotiating partnership");

        Ok(WorkerOutput::Lobbyist(PartnershipProposal {
            brand_name: payload.brand_name.clone(),
            partner_niche: payload.partner_niche.clone(),
            negotiation_status: "Term Sheet Generated".to_string(),
            partner_agent_id: "External_SaaS_Agent_77x".to_string(),
            proposed_deal: ProposedDeal {
                backlink_exchange: "Automated".to_string(),
                affiliate_commission: "25% RevShare".to_string(),
                mutual_promotion_window: "Q3 2026".to_string(),
            },
            trust_score: 89,
            legal_audit_status: "Passed".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::LobbyistPayload;

    #[tokio::test]
    async fn proposal_echoes_the_parties() {
        let payload = WorkerPayload::Lobbyist(LobbyistPayload {
            brand_name: "Acme".into(),
            partner_niche: "fintech".into(),
        });

        let WorkerOutput::Lobbyist(proposal) = LobbyistWorker.execute(&payload).await.unwrap() else {
            panic!("expected a proposal");
        };

        assert_eq!(proposal.brand_name, "Acme");
        assert_eq!(proposal.partner_niche, "fintech");
        assert_eq!(proposal.negotiation_status, "Term Sheet Generated");
    }
}
