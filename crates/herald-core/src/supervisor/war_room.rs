//! War Room: a scripted multi-agent critique pass.

use serde::{Deserialize, Serialize};

pub const CONSENSUS_SCORE: u32 = 98;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateRound {
    pub agent: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarRoomDebate {
    pub final_draft: String,
    pub participants: Vec<String>,
    pub debate_log: Vec<DebateRound>,
    pub consensus_score: u32,
}

pub fn participants() -> Vec<String> {
    ["Strategist", "Copywriter", "Critic", "SEO", "Risk"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// The fixed round sequence, filled in for one topic.
pub fn script(topic: &str, content_type: &str) -> Vec<DebateRound> {
    let round = |agent: &str, message: String| DebateRound {
        agent: agent.to_string(),
        message,
    };
    vec![
        round(
            "Strategist",
            format!("Goal: Establish {topic} as a category-defining subject."),
        ),
        round(
            "Copywriter",
            format!("Drafting a high-intent {content_type} emphasizing unique value."),
        ),
        round(
            "Critic",
            "The hook is too generic. We need more tension in the first 2 paragraphs.".to_string(),
        ),
        round(
            "SEO Worker",
            "Ensuring we maintain keyword density while addressing the Critic's point.".to_string(),
        ),
        round(
            "Risk Worker",
            "Compliance check: Tone is safe, no duplicate content signals.".to_string(),
        ),
        round(
            "Copywriter",
            "Refined draft based on feedback. Tone is now \"Provocative authority\".".to_string(),
        ),
    ]
}

pub fn final_draft(topic: &str, content_type: &str) -> String {
    format!("Enhanced collaborative {content_type} on {topic}: provocative authority tone, tightened hook.")
}
