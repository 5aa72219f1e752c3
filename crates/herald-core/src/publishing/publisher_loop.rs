//! PublisherLoop - 予約投稿を定期的に処理するバックグラウンドタスク
//!
//! - `request_shutdown()` で新しい tick の処理を止める
//! - 処理中の `process_queue()` は中断しない

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::queue::PublishingQueue;

pub struct PublisherLoop {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl PublisherLoop {
    /// Spawns the loop. The first pass runs immediately.
    pub fn spawn(queue: Arc<PublishingQueue>, every: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            run(queue, every, shutdown_rx).await;
        });
        Self { shutdown_tx, join }
    }

    pub fn request_shutdown(&self) {
        // the loop may already have exited
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

async fn run(queue: Arc<PublishingQueue>, every: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval_ms = every.as_millis() as u64, "publisher loop started");

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let processed = queue.process_queue().await;
        if !processed.is_empty() {
            info!(count = processed.len(), "publisher loop processed tasks");
        } else {
            debug!("publisher loop idle");
        }
    }

    info!("publisher loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PublishingConfig;
    use crate::domain::{ContentKind, Platform, PublishStatus};
    use crate::publishing::AdapterRegistry;
    use crate::test_support::{content_item, fixed_clock, ids, t0, ScriptedAdapter};

    #[tokio::test(start_paused = true)]
    async fn scheduled_post_is_published_once_due() {
        let clock = fixed_clock();
        let queue = Arc::new(PublishingQueue::new(
            AdapterRegistry::new().with(Arc::new(ScriptedAdapter::ok(Platform::Facebook))),
            ids(Arc::clone(&clock)),
            clock.clone(),
            PublishingConfig::default(),
        ));
        let task = queue
            .add_to_queue(
                content_item(ContentKind::Blog, "b"),
                vec![Platform::Facebook],
                Some(t0() + chrono::Duration::minutes(1)),
            )
            .await;

        let publisher = PublisherLoop::spawn(Arc::clone(&queue), Duration::from_secs(30));
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(queue.get_task(task.id).await.unwrap().status(), PublishStatus::Queued);

        clock.advance(chrono::Duration::minutes(1));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(queue.get_task(task.id).await.unwrap().status(), PublishStatus::Completed);

        publisher.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_loop() {
        let clock = fixed_clock();
        let queue = Arc::new(PublishingQueue::new(
            AdapterRegistry::new(),
            ids(Arc::clone(&clock)),
            clock,
            PublishingConfig::default(),
        ));
        let publisher = PublisherLoop::spawn(queue, Duration::from_secs(1));

        tokio::time::timeout(Duration::from_secs(5), publisher.shutdown_and_join())
            .await
            .unwrap();
    }
}
