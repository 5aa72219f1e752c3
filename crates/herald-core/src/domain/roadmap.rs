//! Content roadmap: a ramped weekly plan over topic pillars.

use serde::{Deserialize, Serialize};

use super::content::ContentKind;

/// A topic pillar: a named theme with its keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPillar {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl TopicPillar {
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            name: name.into(),
            keywords,
        }
    }
}

/// One planned week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPlan {
    /// 1-based month.
    pub month: u32,
    /// Global 1-based week number across the whole roadmap.
    pub week: u32,
    pub content_target: u32,
    pub topics: Vec<String>,
    pub content_types: Vec<ContentKind>,
}

/// Publishing velocity ramp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapRamp {
    /// Pieces of content per month; its length is the number of months.
    pub monthly_targets: Vec<u32>,
    pub weeks_per_month: u32,
    /// Size of the rotating pillar window per week.
    pub pillars_per_week: usize,
}

impl Default for RoadmapRamp {
    /// 90 days: 10 → 20 → 40 pieces per month, 4 weeks each.
    fn default() -> Self {
        Self {
            monthly_targets: vec![10, 20, 40],
            weeks_per_month: 4,
            pillars_per_week: 2,
        }
    }
}

impl RoadmapRamp {
    pub fn weekly_target(&self, monthly: u32) -> u32 {
        if self.weeks_per_month == 0 {
            return 0;
        }
        monthly.div_ceil(self.weeks_per_month)
    }
}

/// Builds the week-by-week plan. Pure.
///
/// - weekly target = ceil(monthly target / weeks per month)
/// - week `i` (0-based, global) covers pillars `i mod len ..` wrapping around
/// - content types cycle through [`ContentKind::ROTATION`] from the start each week
pub fn plan_roadmap(pillars: &[TopicPillar], ramp: &RoadmapRamp) -> Vec<RoadmapPlan> {
    let mut plan = Vec::new();
    let mut week_index: u32 = 0;

    for (m, &monthly) in ramp.monthly_targets.iter().enumerate() {
        let month = u32::try_from(m).unwrap_or(u32::MAX).saturating_add(1);
        let weekly = ramp.weekly_target(monthly);

        for _ in 0..ramp.weeks_per_month {
            plan.push(RoadmapPlan {
                month,
                week: week_index + 1,
                content_target: weekly,
                topics: pillar_window(pillars, week_index as usize, ramp.pillars_per_week),
                content_types: distribute_content_types(weekly),
            });
            week_index += 1;
        }
    }

    plan
}

fn pillar_window(pillars: &[TopicPillar], week_index: usize, size: usize) -> Vec<String> {
    if pillars.is_empty() {
        return Vec::new();
    }
    let start = week_index % pillars.len();
    pillars
        .iter()
        .cycle()
        .skip(start)
        .take(size.min(pillars.len()))
        .map(|p| p.name.clone())
        .collect()
}

fn distribute_content_types(target: u32) -> Vec<ContentKind> {
    ContentKind::ROTATION
        .iter()
        .copied()
        .cycle()
        .take(target as usize)
        .collect()
}
