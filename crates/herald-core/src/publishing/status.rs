use serde::{Deserialize, Serialize};

use crate::domain::PublishTask;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCounts {
    pub queued: usize,
    pub processing: usize,
    /// Finished tasks, successful or not.
    pub completed: usize,
}

/// Snapshot of the publishing queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub counts: QueueCounts,
    pub queued: Vec<PublishTask>,
    pub processing: Vec<PublishTask>,
    /// Most recently finished tasks, oldest first.
    pub recent_completed: Vec<PublishTask>,
}
