//! Scripted fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::output::{Trend, TrendBridge};
use crate::domain::{ContentId, ContentItem, ContentKind, Platform};
use crate::error::{PlatformError, WorkerError};
use crate::ports::{
    ContentGenerator, FixedClock, GeneratedContent, GenerationRequest, PlatformAdapter,
    PublishReceipt, TrendSource, UlidGenerator,
};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(t0()))
}

pub fn ids(clock: Arc<FixedClock>) -> Arc<UlidGenerator<Arc<FixedClock>>> {
    Arc::new(UlidGenerator::new(clock))
}

pub fn content_item(kind: ContentKind, body: &str) -> ContentItem {
    ContentItem::new(
        ContentId::from(ulid::Ulid::new()),
        format!("{kind} item"),
        kind,
        body,
        t0(),
    )
}

// ========================================
// ContentGenerator
// ========================================

#[derive(Default)]
struct GeneratorState {
    outputs: VecDeque<GeneratedContent>,
    last: Option<GeneratedContent>,
    requests: Vec<GenerationRequest>,
    error: Option<String>,
}

/// Returns queued outputs in order, repeating the last one when exhausted.
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    state: Arc<Mutex<GeneratorState>>,
}

impl ScriptedGenerator {
    pub fn with_outputs(outputs: Vec<GeneratedContent>) -> Self {
        let generator = Self::default();
        generator.state.lock().unwrap().outputs = outputs.into();
        generator
    }

    pub fn with_seo_scores(scores: &[u32]) -> Self {
        Self::with_outputs(
            scores
                .iter()
                .enumerate()
                .map(|(i, &seo_score)| GeneratedContent {
                    title: format!("draft {}", i + 1),
                    content: format!("body of draft {}", i + 1),
                    seo_score,
                    ..Default::default()
                })
                .collect(),
        )
    }

    pub fn failing(message: &str) -> Self {
        let generator = Self::default();
        generator.state.lock().unwrap().error = Some(message.to_string());
        generator
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedContent, WorkerError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if let Some(message) = &state.error {
            return Err(WorkerError::Generation(message.clone()));
        }
        let next = match state.outputs.pop_front() {
            Some(next) => next,
            None => state.last.clone().unwrap_or_default(),
        };
        state.last = Some(next.clone());
        Ok(next)
    }
}

// ========================================
// TrendSource
// ========================================

#[derive(Clone, Default)]
pub struct ScriptedTrendSource {
    trends: Vec<Trend>,
    bridged: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedTrendSource {
    pub fn new(names: &[&str]) -> Self {
        Self {
            trends: names
                .iter()
                .map(|n| Trend {
                    name: n.to_string(),
                    momentum: 50,
                })
                .collect(),
            bridged: Arc::default(),
        }
    }

    pub fn bridged(&self) -> Vec<(String, String)> {
        self.bridged.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrendSource for ScriptedTrendSource {
    async fn fetch_current_trends(&self) -> Result<Vec<Trend>, WorkerError> {
        Ok(self.trends.clone())
    }

    async fn bridge(&self, trend: &Trend, pillar: &str) -> Result<TrendBridge, WorkerError> {
        self.bridged
            .lock()
            .unwrap()
            .push((trend.name.clone(), pillar.to_string()));
        Ok(TrendBridge {
            trend: trend.name.clone(),
            pillar: pillar.to_string(),
            angle: format!("{} x {}", trend.name, pillar),
        })
    }
}

// ========================================
// PlatformAdapter
// ========================================

#[derive(Clone)]
enum Script {
    Succeed,
    Fail(String),
}

/// Adapter that records calls and succeeds (or fails) as scripted.
#[derive(Clone)]
pub struct ScriptedAdapter {
    platform: Platform,
    script: Script,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedAdapter {
    pub fn ok(platform: Platform) -> Self {
        Self {
            platform,
            script: Script::Succeed,
            delay: Duration::ZERO,
            calls: Arc::default(),
        }
    }

    pub fn failing(platform: Platform, error: &str) -> Self {
        Self {
            script: Script::Fail(error.to_string()),
            ..Self::ok(platform)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Titles of the items this adapter was asked to publish.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformAdapter for ScriptedAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn publish(&self, item: &ContentItem) -> Result<PublishReceipt, PlatformError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.calls.lock().unwrap().push(item.title.clone());
        match &self.script {
            Script::Succeed => Ok(PublishReceipt::new(format!("{}-post", self.platform))
                .with_url(format!("https://{}.example/{}", self.platform, item.id))),
            Script::Fail(error) => Err(PlatformError::api(None, error.clone())),
        }
    }
}
