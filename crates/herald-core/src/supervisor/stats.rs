use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskStatus, WorkerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Idle,
    Busy,
}

/// Read-only per-worker projection over the supervisor's tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStats {
    #[serde(rename = "type")]
    pub kind: WorkerKind,
    pub name: String,
    pub tasks_completed: usize,
    pub tasks_failed: usize,
    pub state: WorkerState,
}

impl WorkerStats {
    pub fn collect<'a>(
        kind: WorkerKind,
        name: &str,
        tasks: impl Iterator<Item = &'a Task>,
    ) -> Self {
        let mut stats = WorkerStats {
            kind,
            name: name.to_string(),
            tasks_completed: 0,
            tasks_failed: 0,
            state: WorkerState::Idle,
        };
        for task in tasks.filter(|t| t.kind() == kind && t.assigned_to() == Some(name)) {
            match task.status() {
                TaskStatus::Completed => stats.tasks_completed += 1,
                TaskStatus::Failed => stats.tasks_failed += 1,
                TaskStatus::Working => stats.state = WorkerState::Busy,
                TaskStatus::Pending => {}
            }
        }
        stats
    }
}
