//! PublishingQueue - コンテンツを複数プラットフォームへ配信するキュー
//!
//! # 状態遷移
//! `queued -> processing -> {completed | failed}`
//!
//! - すべてのプラットフォームが必ず試行される
//! - 全結果が success のときのみ completed
//! - 外部呼び出し中は内部ロックを保持しない

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::dispatch::{dispatch_all, AdapterRegistry};
use super::status::{QueueCounts, QueueStatus};
use crate::config::PublishingConfig;
use crate::domain::{ContentItem, Platform, PublishStatus, PublishTask, PublishTaskId};
use crate::error::HeraldError;
use crate::ports::{Clock, IdGenerator};

#[derive(Default)]
struct QueueState {
    queued: VecDeque<PublishTask>,
    processing: Vec<PublishTask>,
    completed: Vec<PublishTask>,
}

impl QueueState {
    fn find(&self, id: PublishTaskId) -> Option<&PublishTask> {
        self.queued
            .iter()
            .chain(self.processing.iter())
            .chain(self.completed.iter())
            .find(|t| t.id == id)
    }
}

pub struct PublishingQueue {
    adapters: AdapterRegistry,
    state: Mutex<QueueState>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    config: PublishingConfig,
}

impl PublishingQueue {
    pub fn new(
        adapters: AdapterRegistry,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        config: PublishingConfig,
    ) -> Self {
        Self {
            adapters,
            state: Mutex::new(QueueState::default()),
            ids,
            clock,
            config,
        }
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    pub async fn add_to_queue(
        &self,
        content_item: ContentItem,
        platforms: Vec<Platform>,
        scheduled_for: Option<DateTime<Utc>>,
    ) -> PublishTask {
        let task = PublishTask::new(
            self.ids.publish_task_id(),
            content_item,
            platforms,
            scheduled_for,
            self.clock.now(),
        );
        info!(
            task_id = %task.id,
            platforms = ?task.platforms,
            scheduled_for = ?task.scheduled_for,
            "publish task queued"
        );
        self.state.lock().await.queued.push_back(task.clone());
        task
    }

    /// Processes every due task in FIFO order and returns them finished.
    pub async fn process_queue(&self) -> Vec<PublishTask> {
        let now = self.clock.now();
        let due: Vec<PublishTaskId> = {
            let state = self.state.lock().await;
            state
                .queued
                .iter()
                .filter(|t| t.is_due(now))
                .map(|t| t.id)
                .collect()
        };

        let mut done = Vec::with_capacity(due.len());
        for id in due {
            // cancelled or taken by another caller in the meantime
            if let Some(task) = self.run(id).await {
                done.push(task);
            }
        }
        done
    }

    /// Processes one task now, ignoring its schedule.
    ///
    /// A task that is already processing or finished is returned unchanged.
    pub async fn process_task(&self, id: PublishTaskId) -> Result<PublishTask, HeraldError> {
        if let Some(task) = self.run(id).await {
            return Ok(task);
        }
        self.get_task(id)
            .await
            .ok_or(HeraldError::PublishTaskNotFound(id))
    }

    /// Runs a queued task to completion; `None` when `id` is not queued.
    async fn run(&self, id: PublishTaskId) -> Option<PublishTask> {
        let (item, platforms) = {
            let mut state = self.state.lock().await;
            let index = state.queued.iter().position(|t| t.id == id)?;
            let mut task = state.queued.remove(index)?;
            task.begin_processing();
            let claimed = (task.content_item.clone(), task.platforms.clone());
            state.processing.push(task);
            claimed
        };
        info!(task_id = %id, "publish task processing");

        let outcomes = dispatch_all(
            &self.adapters,
            &platforms,
            &item,
            self.config.parallel_fanout,
        )
        .await;

        let mut state = self.state.lock().await;
        let index = state.processing.iter().position(|t| t.id == id)?;
        let mut task = state.processing.remove(index);
        for outcome in outcomes {
            task.record(outcome);
        }
        let status = task.finish(self.clock.now());
        match status {
            PublishStatus::Completed => info!(task_id = %id, %status, "publish task finished"),
            _ => warn!(task_id = %id, %status, "publish task finished"),
        }
        state.completed.push(task.clone());
        Some(task)
    }

    pub async fn get_queue_status(&self) -> QueueStatus {
        let state = self.state.lock().await;
        let keep = self.config.completed_history;
        let skip = state.completed.len().saturating_sub(keep);
        QueueStatus {
            counts: QueueCounts {
                queued: state.queued.len(),
                processing: state.processing.len(),
                completed: state.completed.len(),
            },
            queued: state.queued.iter().cloned().collect(),
            processing: state.processing.clone(),
            recent_completed: state.completed[skip..].to_vec(),
        }
    }

    pub async fn get_task(&self, id: PublishTaskId) -> Option<PublishTask> {
        self.state.lock().await.find(id).cloned()
    }

    /// Removes a task that has not started yet. Returns false otherwise.
    pub async fn cancel_task(&self, id: PublishTaskId) -> bool {
        let mut state = self.state.lock().await;
        let Some(index) = state.queued.iter().position(|t| t.id == id) else {
            return false;
        };
        state.queued.remove(index);
        info!(task_id = %id, "publish task cancelled");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentKind;
    use crate::test_support::{content_item, fixed_clock, ids, t0, ScriptedAdapter};
    use chrono::Duration;

    fn queue_with(adapters: AdapterRegistry, config: PublishingConfig) -> (PublishingQueue, Arc<crate::ports::FixedClock>) {
        let clock = fixed_clock();
        let queue = PublishingQueue::new(adapters, ids(Arc::clone(&clock)), clock.clone(), config);
        (queue, clock)
    }

    fn ok_adapters(platforms: &[Platform]) -> AdapterRegistry {
        platforms.iter().fold(AdapterRegistry::new(), |reg, &p| {
            reg.with(Arc::new(ScriptedAdapter::ok(p)))
        })
    }

    #[tokio::test]
    async fn wrong_kind_on_one_platform_fails_the_task_but_tries_all() {
        let platforms = [Platform::Facebook, Platform::Wordpress, Platform::Twitter];
        let (queue, _) = queue_with(ok_adapters(&platforms), PublishingConfig::default());
        let task = queue
            .add_to_queue(content_item(ContentKind::InstagramReel, "reel script"), platforms.to_vec(), None)
            .await;

        let done = queue.process_task(task.id).await.unwrap();

        assert_eq!(done.status(), PublishStatus::Failed);
        assert_eq!(done.results().len(), 3);
        let failures: Vec<_> = done.results().iter().filter(|r| !r.success).collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].platform, Platform::Wordpress);
        assert_eq!(
            failures[0].error.as_deref(),
            Some("Only blog content can be published to WordPress")
        );
        assert_eq!(done.completed_at(), Some(t0()));
    }

    #[tokio::test]
    async fn all_successes_complete_the_task() {
        let (queue, _) = queue_with(ok_adapters(&[Platform::Facebook, Platform::Vk]), PublishingConfig::default());
        queue
            .add_to_queue(content_item(ContentKind::Blog, "b"), vec![Platform::Facebook, Platform::Vk], None)
            .await;

        let done = queue.process_queue().await;

        assert_eq!(done.len(), 1);
        assert_eq!(done[0].status(), PublishStatus::Completed);
        assert_eq!(done[0].results()[0].post_id.as_deref(), Some("facebook-post"));
    }

    #[tokio::test]
    async fn scheduled_tasks_wait_until_due() {
        let (queue, clock) = queue_with(ok_adapters(&[Platform::Facebook]), PublishingConfig::default());
        let later = queue
            .add_to_queue(
                content_item(ContentKind::Blog, "later"),
                vec![Platform::Facebook],
                Some(t0() + Duration::hours(1)),
            )
            .await;
        let now = queue
            .add_to_queue(content_item(ContentKind::Blog, "now"), vec![Platform::Facebook], None)
            .await;

        let first = queue.process_queue().await;
        assert_eq!(first.iter().map(|t| t.id).collect::<Vec<_>>(), vec![now.id]);
        assert_eq!(queue.get_task(later.id).await.unwrap().status(), PublishStatus::Queued);

        clock.advance(Duration::hours(1));
        let second = queue.process_queue().await;
        assert_eq!(second.iter().map(|t| t.id).collect::<Vec<_>>(), vec![later.id]);
    }

    #[tokio::test]
    async fn process_queue_is_fifo() {
        let fb = ScriptedAdapter::ok(Platform::Facebook);
        let (queue, _) = queue_with(
            AdapterRegistry::new().with(Arc::new(fb.clone())),
            PublishingConfig::default(),
        );
        for body in ["one", "two", "three"] {
            let mut item = content_item(ContentKind::Blog, body);
            item.title = body.to_string();
            queue.add_to_queue(item, vec![Platform::Facebook], None).await;
        }

        queue.process_queue().await;
        assert_eq!(fb.calls(), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn cancel_only_affects_queued_tasks() {
        let (queue, _) = queue_with(ok_adapters(&[Platform::Facebook]), PublishingConfig::default());
        let a = queue
            .add_to_queue(content_item(ContentKind::Blog, "a"), vec![Platform::Facebook], None)
            .await;
        let b = queue
            .add_to_queue(content_item(ContentKind::Blog, "b"), vec![Platform::Facebook], None)
            .await;

        queue.process_task(a.id).await.unwrap();

        assert!(!queue.cancel_task(a.id).await);
        assert!(queue.cancel_task(b.id).await);
        assert!(queue.get_task(b.id).await.is_none());
        assert!(queue.process_queue().await.is_empty());
    }

    #[tokio::test]
    async fn processing_twice_is_a_no_op() {
        let fb = ScriptedAdapter::ok(Platform::Facebook);
        let (queue, _) = queue_with(
            AdapterRegistry::new().with(Arc::new(fb.clone())),
            PublishingConfig::default(),
        );
        let task = queue
            .add_to_queue(content_item(ContentKind::Blog, "a"), vec![Platform::Facebook], None)
            .await;

        let first = queue.process_task(task.id).await.unwrap();
        let second = queue.process_task(task.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fb.calls().len(), 1);
    }

    #[tokio::test]
    async fn unknown_task_is_an_error() {
        let (queue, _) = queue_with(AdapterRegistry::new(), PublishingConfig::default());
        let stray = PublishTaskId::from(ulid::Ulid::new());

        let err = queue.process_task(stray).await.unwrap_err();
        assert!(matches!(err, HeraldError::PublishTaskNotFound(id) if id == stray));
    }

    #[tokio::test]
    async fn status_keeps_only_recent_completed() {
        let config = PublishingConfig {
            completed_history: 2,
            ..PublishingConfig::default()
        };
        let (queue, _) = queue_with(AdapterRegistry::new(), config);
        let mut ids = Vec::new();
        for body in ["a", "b", "c"] {
            let t = queue
                .add_to_queue(content_item(ContentKind::Blog, body), vec![Platform::Vk], None)
                .await;
            ids.push(t.id);
        }
        queue.process_queue().await;
        let pending = queue
            .add_to_queue(content_item(ContentKind::Blog, "d"), vec![Platform::Vk], Some(t0() + Duration::days(1)))
            .await;

        let status = queue.get_queue_status().await;

        assert_eq!(status.counts, QueueCounts { queued: 1, processing: 0, completed: 3 });
        assert_eq!(status.queued[0].id, pending.id);
        let recent: Vec<_> = status.recent_completed.iter().map(|t| t.id).collect();
        assert_eq!(recent, ids[1..].to_vec());
        assert!(status.recent_completed.iter().all(|t| t.status() == PublishStatus::Failed));
    }
}
