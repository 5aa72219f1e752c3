use async_trait::async_trait;
use tracing::info;

use super::{mismatch, Worker};
use crate::domain::output::{OutcomeDistribution, SimulationForecast};
use crate::domain::{WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;

/// Outcome forecast for a topic. The distribution is fixed.
pub struct SimulationWorker;

#[async_trait]
impl Worker for SimulationWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Simulation
    }

    fn name(&self) -> &str {
        "Temporal Sentry"
    }

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
        let WorkerPayload::Simulation(payload) = payload else {
            return Err(mismatch(self.kind(), payload));
        };
        info!(worker = self.name(), topic = %payload.topic, "running market simulation");

        Ok(WorkerOutput::Simulation(SimulationForecast {
            topic: payload.topic.clone(),
            probabilistic_outcomes: OutcomeDistribution {
                viral_potential: 78.5,
                steady_growth: 15.2,
                immediate_obsolescence: 6.3,
            },
            time_to_impact: "4.2 hours".to_string(),
            butterfly_effect_radius: "Regional (SE Asia) + Tech Speculative Blogs".to_string(),
            predicted_resonance_score: 92,
            recommendation: "Launch at T-minus 12 mins".to_string(),
        }))
    }
}
