//! Social atomizer: cuts one source text into per-platform drafts.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{mismatch, Worker};
use crate::domain::content::excerpt;
use crate::domain::output::{AtomizedContent, FacebookDraft, InstagramDraft, YoutubeDraft};
use crate::domain::{WorkerKind, WorkerOutput, WorkerPayload};
use crate::error::WorkerError;

const INSTAGRAM_EXCERPT: usize = 200;
const INSTAGRAM_HASHTAGS: &str = "#DigitalMarketing #ContentCreation #AI";
const YOUTUBE_TITLE: usize = 100;
const YOUTUBE_DESCRIPTION: usize = 500;
const FACEBOOK_TEXT: usize = 300;

pub struct SocialWorker;

pub fn instagram_draft(source: &str) -> InstagramDraft {
    InstagramDraft {
        caption: format!(
            "{}...\n\n{}",
            excerpt(source, INSTAGRAM_EXCERPT),
            INSTAGRAM_HASHTAGS
        ),
        format: "reel".to_string(),
    }
}

pub fn youtube_draft(source: &str) -> YoutubeDraft {
    let first_line = source.split('\n').next().unwrap_or_default();
    YoutubeDraft {
        title: excerpt(first_line, YOUTUBE_TITLE).to_string(),
        description: excerpt(source, YOUTUBE_DESCRIPTION).to_string(),
        format: "short".to_string(),
    }
}

pub fn facebook_draft(source: &str) -> FacebookDraft {
    FacebookDraft {
        text: excerpt(source, FACEBOOK_TEXT).to_string(),
        format: "story".to_string(),
    }
}

#[async_trait]
impl Worker for SocialWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Social
    }

    fn name(&self) -> &str {
        "Social Media Worker"
    }

    async fn execute(&self, payload: &WorkerPayload) -> Result<WorkerOutput, WorkerError> {
        let WorkerPayload::Social(payload) = payload else {
            return Err(mismatch(self.kind(), payload));
        };

        let source = payload.source_content.as_str();
        let mut out = AtomizedContent::default();
        for platform in &payload.platforms {
            match platform.to_ascii_lowercase().as_str() {
                "instagram" => out.instagram = Some(instagram_draft(source)),
                "youtube" => out.youtube = Some(youtube_draft(source)),
                "facebook" => out.facebook = Some(facebook_draft(source)),
                other => debug!(platform = other, "no atomizer for platform; skipped"),
            }
        }

        info!(
            worker = self.name(),
            requested = payload.platforms.len(),
            produced = out.platform_count(),
            "content atomized"
        );
        Ok(WorkerOutput::Social(out))
    }
}
