//! TrendSource port - トレンド取得の抽象化

use async_trait::async_trait;

use crate::domain::output::{Trend, TrendBridge};
use crate::error::WorkerError;

#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Current trends, strongest first.
    async fn fetch_current_trends(&self) -> Result<Vec<Trend>, WorkerError>;

    /// Suggests an angle that connects `trend` to a topic pillar.
    async fn bridge(&self, trend: &Trend, pillar: &str) -> Result<TrendBridge, WorkerError>;
}

/// Fixed trend list for offline runs.
#[derive(Debug, Clone)]
pub struct StaticTrendSource {
    trends: Vec<Trend>,
}

impl StaticTrendSource {
    pub fn new(trends: Vec<Trend>) -> Self {
        Self { trends }
    }
}

impl Default for StaticTrendSource {
    fn default() -> Self {
        Self::new(vec![
            Trend {
                name: "AI agents".to_string(),
                momentum: 92,
            },
            Trend {
                name: "Short-form video search".to_string(),
                momentum: 81,
            },
            Trend {
                name: "Creator-led commerce".to_string(),
                momentum: 67,
            },
        ])
    }
}

#[async_trait]
impl TrendSource for StaticTrendSource {
    async fn fetch_current_trends(&self) -> Result<Vec<Trend>, WorkerError> {
        Ok(self.trends.clone())
    }

    async fn bridge(&self, trend: &Trend, pillar: &str) -> Result<TrendBridge, WorkerError> {
        Ok(TrendBridge {
            trend: trend.name.clone(),
            pillar: pillar.to_string(),
            angle: format!("How {} is reshaping {}", trend.name, pillar),
        })
    }
}
