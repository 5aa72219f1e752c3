//! Supervisor: owns the task queue, dispatches tasks to workers by kind and
//! keeps the history of finished tasks.
//!
//! State lives behind a `tokio::sync::Mutex` that is released before any
//! worker is awaited.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::payload::GenerationPayload;
use crate::domain::roadmap::plan_roadmap;
use crate::domain::{
    ContentKind, Priority, RoadmapPlan, RoadmapRamp, Task, TaskId, TaskStatus, TopicPillar,
    WorkerPayload,
};
use crate::error::HeraldError;
use crate::ports::{Clock, IdGenerator};
use crate::workers::WorkerRegistry;

pub mod builder;
pub mod stats;
pub mod war_room;

pub use builder::{BuildError, SupervisorBuilder};
pub use stats::{WorkerState, WorkerStats};
pub use war_room::{DebateRound, WarRoomDebate};

#[derive(Default)]
struct SupervisorState {
    /// Pending and working tasks, in submission order.
    queue: Vec<Task>,
    /// Finished tasks, in completion order.
    history: Vec<Task>,
}

impl SupervisorState {
    fn position(&self, id: TaskId) -> Option<usize> {
        self.queue.iter().position(|t| t.id == id)
    }

    fn find(&self, id: TaskId) -> Option<&Task> {
        self.queue
            .iter()
            .chain(self.history.iter())
            .find(|t| t.id == id)
    }

    /// Moves a terminal task from the queue to the history.
    fn retire(&mut self, index: usize) -> Task {
        let task = self.queue.remove(index);
        self.history.push(task.clone());
        task
    }
}

pub struct Supervisor {
    registry: Arc<WorkerRegistry>,
    state: Mutex<SupervisorState>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    ramp: RoadmapRamp,
    war_room_pacing: Duration,
}

impl Supervisor {
    pub(crate) fn new(
        registry: Arc<WorkerRegistry>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        ramp: RoadmapRamp,
        war_room_pacing: Duration,
    ) -> Self {
        Self {
            registry,
            state: Mutex::new(SupervisorState::default()),
            ids,
            clock,
            ramp,
            war_room_pacing,
        }
    }

    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    /// Builds the week-by-week roadmap for `pillars`. Pure over the configured ramp.
    pub fn generate_roadmap(
        &self,
        pillars: &[TopicPillar],
        target_audience: &str,
        brand_guidelines: Option<&str>,
    ) -> Vec<RoadmapPlan> {
        info!(
            pillars = pillars.len(),
            audience = target_audience,
            guidelines = brand_guidelines.is_some(),
            "generating roadmap"
        );
        let plan = plan_roadmap(pillars, &self.ramp);
        info!(weeks = plan.len(), "roadmap generated");
        plan
    }

    /// Enqueues a pending task without running it.
    pub async fn submit(&self, payload: WorkerPayload, priority: Priority) -> Task {
        let task = Task::new(self.ids.task_id(), payload, priority, self.clock.now());
        info!(task_id = %task.id, kind = %task.kind(), "task submitted");
        self.state.lock().await.queue.push(task.clone());
        task
    }

    /// Enqueues a task and drives it to a terminal state before returning.
    pub async fn delegate(&self, payload: WorkerPayload, priority: Priority) -> Task {
        let submitted = self.submit(payload, priority).await;
        let id = submitted.id;
        self.drive(id).await.unwrap_or(submitted)
    }

    /// Delegates a content piece for one pillar to the SEO worker.
    pub async fn delegate_content_creation(
        &self,
        pillar: &TopicPillar,
        content_type: ContentKind,
        target_audience: &str,
    ) -> Task {
        let payload = WorkerPayload::Seo(GenerationPayload::new(
            pillar.name.clone(),
            pillar.keywords.clone(),
            content_type,
            target_audience,
        ));
        self.delegate(payload, Priority::Medium).await
    }

    /// Runs one task. Worker errors are recorded on the task, never returned.
    ///
    /// Fails only when `id` is unknown. A task that is already running or
    /// finished is returned unchanged.
    pub async fn execute_task(&self, id: TaskId) -> Result<Task, HeraldError> {
        self.drive(id).await.ok_or(HeraldError::TaskNotFound(id))
    }

    /// Executes every pending task in submission order.
    pub async fn run_pending(&self) -> Vec<Task> {
        let pending: Vec<TaskId> = {
            let state = self.state.lock().await;
            state
                .queue
                .iter()
                .filter(|t| t.status() == TaskStatus::Pending)
                .map(|t| t.id)
                .collect()
        };

        let mut done = Vec::with_capacity(pending.len());
        for id in pending {
            if let Some(task) = self.drive(id).await {
                done.push(task);
            }
        }
        done
    }

    async fn drive(&self, id: TaskId) -> Option<Task> {
        // claim: pending -> working (or fail fast) under the lock
        let (worker, payload) = {
            let mut state = self.state.lock().await;
            let Some(index) = state.position(id) else {
                return state.find(id).cloned();
            };
            if state.queue[index].status() != TaskStatus::Pending {
                return Some(state.queue[index].clone());
            }

            let kind = state.queue[index].kind();
            let Some(worker) = self.registry.get(kind).cloned() else {
                let message = format!("worker {kind} not found");
                warn!(task_id = %id, %kind, "no worker registered for kind");
                let now = self.clock.now();
                if let Err(e) = state.queue[index].fail(message, now) {
                    error!(task_id = %id, error = %e, "unexpected task state");
                }
                return Some(state.retire(index));
            };

            let task = &mut state.queue[index];
            if let Err(e) = task.start(worker.name()) {
                error!(task_id = %id, error = %e, "unexpected task state");
                return Some(task.clone());
            }
            info!(task_id = %id, worker = worker.name(), "task assigned");
            (worker, task.payload().clone())
        };

        // lock released while the worker runs
        let outcome = worker.execute(&payload).await;

        let mut state = self.state.lock().await;
        let index = state.position(id)?;
        let now = self.clock.now();
        let task = &mut state.queue[index];
        let transition = match outcome {
            Ok(output) => {
                info!(task_id = %id, worker = worker.name(), "task completed");
                task.complete(output, now)
            }
            Err(err) => {
                error!(task_id = %id, worker = worker.name(), error = %err, "task failed");
                task.fail(err.to_string(), now)
            }
        };
        if let Err(e) = transition {
            error!(task_id = %id, error = %e, "unexpected task state");
        }
        Some(state.retire(index))
    }

    /// Scripted multi-agent critique; each round is paced.
    pub async fn start_war_room_debate(&self, topic: &str, content_type: &str) -> WarRoomDebate {
        info!(topic, "war room opened");

        let rounds = war_room::script(topic, content_type);
        for round in &rounds {
            if !self.war_room_pacing.is_zero() {
                tokio::time::sleep(self.war_room_pacing).await;
            }
            info!(agent = %round.agent, message = %round.message, "war room round");
        }

        WarRoomDebate {
            final_draft: war_room::final_draft(topic, content_type),
            participants: war_room::participants(),
            debate_log: rounds,
            consensus_score: war_room::CONSENSUS_SCORE,
        }
    }

    pub async fn get_task_status(&self, id: TaskId) -> Option<Task> {
        self.state.lock().await.find(id).cloned()
    }

    /// Queue (pending/working) followed by history.
    pub async fn get_all_tasks(&self) -> Vec<Task> {
        let state = self.state.lock().await;
        state.queue.iter().chain(state.history.iter()).cloned().collect()
    }

    pub async fn get_worker_stats(&self) -> Vec<WorkerStats> {
        let state = self.state.lock().await;
        self.registry
            .iter()
            .map(|worker| {
                WorkerStats::collect(
                    worker.kind(),
                    worker.name(),
                    state.queue.iter().chain(state.history.iter()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::config::SupervisorConfig;
    use crate::domain::payload::{MessagingPayload, RiskPayload, SimulationPayload};
    use crate::domain::{WorkerKind, WorkerOutput};
    use crate::error::WorkerError;
    use crate::ports::StaticTrendSource;
    use crate::test_support::{fixed_clock, t0, ScriptedGenerator};
    use crate::workers::{RiskWorker, SimulationWorker, Worker};

    fn supervisor(generator: ScriptedGenerator) -> Supervisor {
        let config = SupervisorConfig {
            war_room_pacing_ms: 0,
            ..SupervisorConfig::default()
        };
        SupervisorBuilder::new()
            .with_clock(fixed_clock())
            .with_default_workers(
                Arc::new(generator),
                Arc::new(StaticTrendSource::default()),
                &config,
            )
            .unwrap()
            .build()
            .unwrap()
    }

    fn risk_payload(velocity: u32) -> WorkerPayload {
        WorkerPayload::Risk(RiskPayload {
            content: vec![],
            velocity,
        })
    }

    #[tokio::test]
    async fn delegate_content_creation_runs_seo_worker_to_completion() {
        let sup = supervisor(ScriptedGenerator::with_seo_scores(&[70, 96]));
        let pillar = TopicPillar::new("Cloud costs", vec!["finops".into()]);

        let task = sup
            .delegate_content_creation(&pillar, ContentKind::Blog, "CFOs")
            .await;

        assert_eq!(task.kind(), WorkerKind::Seo);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.assigned_to(), Some("SEO Content Worker"));
        assert_eq!(task.completed_at(), Some(t0()));
        let item = task.result().and_then(WorkerOutput::as_content).unwrap();
        assert_eq!(item.metadata.healing_attempts(), Some(2));
        assert_eq!(item.metadata.seo_score(), Some(96));
    }

    #[tokio::test]
    async fn worker_error_fails_the_task_without_propagating() {
        let sup = supervisor(ScriptedGenerator::failing("quota exceeded"));
        let pillar = TopicPillar::new("x", vec![]);

        let task = sup
            .delegate_content_creation(&pillar, ContentKind::Blog, "a")
            .await;

        assert_eq!(task.status(), TaskStatus::Failed);
        assert_eq!(task.assigned_to(), Some("SEO Content Worker"));
        assert!(task.error().unwrap().contains("quota exceeded"));
        assert!(task.completed_at().is_some());
    }

    #[tokio::test]
    async fn missing_worker_fails_task_immediately() {
        let sup = SupervisorBuilder::new()
            .register(Arc::new(RiskWorker))
            .unwrap()
            .build()
            .unwrap();

        let task = sup
            .delegate(
                WorkerPayload::Simulation(SimulationPayload {
                    content: "c".into(),
                    topic: "t".into(),
                }),
                Priority::Low,
            )
            .await;

        assert_eq!(task.status(), TaskStatus::Failed);
        assert_eq!(task.error(), Some("worker simulation-worker not found"));
        assert_eq!(task.assigned_to(), None);
        assert!(task.result().is_none());
    }

    #[tokio::test]
    async fn unknown_task_id_is_an_error() {
        let sup = supervisor(ScriptedGenerator::default());
        let stray = TaskId::from(ulid::Ulid::new());

        let err = sup.execute_task(stray).await.unwrap_err();
        assert!(matches!(err, HeraldError::TaskNotFound(id) if id == stray));
    }

    #[tokio::test]
    async fn executing_a_finished_task_is_a_no_op() {
        let sup = supervisor(ScriptedGenerator::default());
        let task = sup.delegate(risk_payload(1), Priority::High).await;

        let again = sup.execute_task(task.id).await.unwrap();
        assert_eq!(again, task);
        assert_eq!(sup.get_all_tasks().await.len(), 1);
    }

    #[tokio::test]
    async fn run_pending_is_fifo_and_tracks_history() {
        let sup = supervisor(ScriptedGenerator::default());
        let a = sup.submit(risk_payload(1), Priority::Low).await;
        let b = sup.submit(risk_payload(20), Priority::High).await;

        let pending = sup.get_task_status(a.id).await.unwrap();
        assert_eq!(pending.status(), TaskStatus::Pending);
        assert_eq!(pending.assigned_to(), None);

        let done = sup.run_pending().await;
        let order: Vec<_> = done.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![a.id, b.id]);
        assert!(done.iter().all(|t| t.status() == TaskStatus::Completed));

        let all = sup.get_all_tasks().await;
        assert_eq!(all.len(), 2);
        assert!(sup.run_pending().await.is_empty());
    }

    #[tokio::test]
    async fn worker_stats_count_completed_and_failed() {
        let sup = supervisor(ScriptedGenerator::failing("down"));
        sup.delegate(risk_payload(1), Priority::Low).await;
        sup.delegate(risk_payload(2), Priority::Low).await;
        sup.delegate_content_creation(&TopicPillar::new("p", vec![]), ContentKind::Blog, "a")
            .await;

        let stats = sup.get_worker_stats().await;
        assert_eq!(stats.len(), 9);

        let risk = stats.iter().find(|s| s.kind == WorkerKind::Risk).unwrap();
        assert_eq!((risk.tasks_completed, risk.tasks_failed), (2, 0));
        assert_eq!(risk.name, "Risk Monitor Worker");

        let seo = stats.iter().find(|s| s.kind == WorkerKind::Seo).unwrap();
        assert_eq!((seo.tasks_completed, seo.tasks_failed), (0, 1));
        assert!(stats.iter().all(|s| s.state == WorkerState::Idle));
    }

    #[tokio::test]
    async fn war_room_returns_six_rounds_and_consensus() {
        let sup = supervisor(ScriptedGenerator::default());

        let debate = sup.start_war_room_debate("Edge AI", "blog").await;

        assert_eq!(debate.debate_log.len(), 6);
        assert_eq!(debate.consensus_score, 98);
        assert_eq!(debate.participants.len(), 5);
        assert!(debate.final_draft.contains("Edge AI"));
    }

    #[tokio::test(start_paused = true)]
    async fn war_room_rounds_are_paced() {
        let sup = SupervisorBuilder::new()
            .with_war_room_pacing(Duration::from_secs(1))
            .build()
            .unwrap();

        let started = tokio::time::Instant::now();
        sup.start_war_room_debate("t", "blog").await;
        assert!(started.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test]
    async fn roadmap_uses_configured_ramp() {
        let sup = SupervisorBuilder::new()
            .with_ramp(RoadmapRamp {
                monthly_targets: vec![4],
                weeks_per_month: 2,
                pillars_per_week: 1,
            })
            .build()
            .unwrap();

        let plan = sup.generate_roadmap(&[TopicPillar::new("a", vec![])], "devs", Some("be kind"));
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].content_target, 2);
    }

    /// Blocks until released so the task can be observed mid-flight.
    struct GatedWorker {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl Worker for GatedWorker {
        fn kind(&self) -> WorkerKind {
            WorkerKind::Messaging
        }

        fn name(&self) -> &str {
            "Gated"
        }

        async fn execute(&self, _payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
            self.gate.notified().await;
            SimulationWorker
                .execute(&WorkerPayload::Simulation(SimulationPayload {
                    content: String::new(),
                    topic: String::new(),
                }))
                .await
        }
    }

    #[tokio::test]
    async fn task_is_observable_while_working_and_lock_is_free() {
        let gate = Arc::new(Notify::new());
        let sup = Arc::new(
            SupervisorBuilder::new()
                .register(Arc::new(GatedWorker { gate: gate.clone() }))
                .unwrap()
                .build()
                .unwrap(),
        );
        let task = sup
            .submit(
                WorkerPayload::Messaging(MessagingPayload {
                    content: "c".into(),
                    target_market: "m".into(),
                }),
                Priority::Medium,
            )
            .await;

        let runner = {
            let sup = Arc::clone(&sup);
            tokio::spawn(async move { sup.execute_task(task.id).await })
        };

        // wait until the worker has claimed the task
        loop {
            let current = sup.get_task_status(task.id).await.unwrap();
            if current.status() == TaskStatus::Working {
                assert_eq!(current.assigned_to(), Some("Gated"));
                break;
            }
            tokio::task::yield_now().await;
        }
        let stats = sup.get_worker_stats().await;
        assert_eq!(stats[0].state, WorkerState::Busy);

        gate.notify_one();
        let done = runner.await.unwrap().unwrap();
        assert_eq!(done.status(), TaskStatus::Completed);
    }
}
