//! Autonomous treasurer: budget allocation against the vault balance.

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, warn};

use super::{mismatch, Worker};
use crate::domain::output::{BudgetAllocation, SpendStatus};
use crate::domain::{WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;

pub struct FinanceWorker {
    vault_balance: f64,
}

impl FinanceWorker {
    pub fn new(vault_balance: f64) -> Self {
        Self { vault_balance }
    }
}

fn transaction_hash() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("tx_{suffix}")
}

#[async_trait]
impl Worker for FinanceWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Finance
    }

    fn name(&self) -> &str {
        "Autonomous Treasurer"
    }

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
        let WorkerPayload::Finance(payload) = payload else {
            return Err(mismatch(self.kind(), payload));
        };

        let authorized = payload.budget >= 0.0 && payload.budget <= self.vault_balance;
        let (status, remaining) = if authorized {
            (SpendStatus::Authorized, self.vault_balance - payload.budget)
        } else {
            warn!(
                campaign = %payload.campaign_id,
                budget = payload.budget,
                vault = self.vault_balance,
                "budget exceeds vault balance; spend declined"
            );
            (SpendStatus::Declined, self.vault_balance)
        };

        info!(worker = self.name(), campaign = %payload.campaign_id, ?status, "budget allocated");
        Ok(WorkerOutput::Finance(BudgetAllocation {
            campaign_id: payload.campaign_id.clone(),
            allocated_budget: if authorized { payload.budget } else { 0.0 },
            allocated_gateway: payload.gateway,
            predicted_roi: 4.2,
            auto_spend_status: status,
            remaining_vault_balance: remaining,
            transaction_hash: transaction_hash(),
            recommendation: "Increase spend in high-converting South Asian nodes.".to_string(),
        }))
    }
}
