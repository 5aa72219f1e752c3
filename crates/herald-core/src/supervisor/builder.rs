//! SupervisorBuilder - Supervisor の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - expect_workers() で期待される WorkerKind を登録
//! - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
//! - 不足があれば BuildError を返す

use std::sync::Arc;
use std::time::Duration;

use super::Supervisor;
use crate::config::SupervisorConfig;
use crate::domain::{RoadmapRamp, WorkerKind};
use crate::ports::{Clock, ContentGenerator, IdGenerator, SystemClock, TrendSource, UlidGenerator};
use crate::workers::{
    FinanceWorker, GeneratorDeps, GeoWorker, HealingPolicy, LobbyistWorker, MessagingWorker,
    RegistryError, RiskWorker, SeoWorker, SimulationWorker, SocialWorker, TrendSentryWorker,
    Worker, WorkerRegistry,
};

/// BuildError は Supervisor 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing workers: {0:?}. These worker kinds were expected but not registered.")]
    MissingWorkers(Vec<WorkerKind>),
}

/// # 使用例
/// ```ignore
/// let supervisor = SupervisorBuilder::new()
///     .with_default_workers(generator, trends, &config.supervisor)?
///     .expect_workers(&WorkerKind::ALL)
///     .build()?;
/// ```
pub struct SupervisorBuilder {
    registry: WorkerRegistry,
    expected_workers: Option<Vec<WorkerKind>>,
    clock: Arc<dyn Clock>,
    ids: Option<Arc<dyn IdGenerator>>,
    ramp: RoadmapRamp,
    war_room_pacing: Duration,
}

impl SupervisorBuilder {
    pub fn new() -> Self {
        Self {
            registry: WorkerRegistry::new(),
            expected_workers: None,
            clock: Arc::new(SystemClock),
            ids: None,
            ramp: RoadmapRamp::default(),
            war_room_pacing: Duration::from_secs(1),
        }
    }

    /// Set before registering workers that need the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn with_ramp(mut self, ramp: RoadmapRamp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn with_war_room_pacing(mut self, pacing: Duration) -> Self {
        self.war_room_pacing = pacing;
        self
    }

    fn ids(&mut self) -> Arc<dyn IdGenerator> {
        if let Some(ids) = &self.ids {
            return Arc::clone(ids);
        }
        let ids: Arc<dyn IdGenerator> = Arc::new(UlidGenerator::new(Arc::clone(&self.clock)));
        self.ids = Some(Arc::clone(&ids));
        ids
    }

    pub fn register(mut self, worker: Arc<dyn Worker>) -> Result<Self, RegistryError> {
        self.registry.register(worker)?;
        Ok(self)
    }

    /// Registers all nine workers, configured from `config`.
    pub fn with_default_workers(
        mut self,
        generator: Arc<dyn ContentGenerator>,
        trends: Arc<dyn TrendSource>,
        config: &SupervisorConfig,
    ) -> Result<Self, RegistryError> {
        let deps = GeneratorDeps {
            generator,
            ids: self.ids(),
            clock: Arc::clone(&self.clock),
        };
        let seo = HealingPolicy::new(config.seo_threshold, config.max_attempts);
        let geo = HealingPolicy::new(config.geo_threshold, config.max_attempts);
        let clock = Arc::clone(&self.clock);

        self.war_room_pacing = config.war_room_pacing();
        self.register(Arc::new(SeoWorker::new(deps.clone()).with_policy(seo)))?
            .register(Arc::new(SocialWorker))?
            .register(Arc::new(RiskWorker))?
            .register(Arc::new(TrendSentryWorker::new(trends, clock)))?
            .register(Arc::new(GeoWorker::new(deps).with_policy(geo)))?
            .register(Arc::new(MessagingWorker::new(config.messaging.clone())))?
            .register(Arc::new(SimulationWorker))?
            .register(Arc::new(LobbyistWorker))?
            .register(Arc::new(FinanceWorker::new(config.vault_balance)))
    }

    pub fn expect_workers(mut self, kinds: &[WorkerKind]) -> Self {
        self.expected_workers = Some(kinds.to_vec());
        self
    }

    pub fn build(mut self) -> Result<Supervisor, BuildError> {
        if let Some(expected) = &self.expected_workers {
            let missing: Vec<WorkerKind> = expected
                .iter()
                .filter(|kind| !self.registry.contains(**kind))
                .copied()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingWorkers(missing));
            }
        }
        let ids = self.ids();
        Ok(Supervisor::new(
            Arc::new(self.registry),
            ids,
            self.clock,
            self.ramp,
            self.war_room_pacing,
        ))
    }
}

impl Default for SupervisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
