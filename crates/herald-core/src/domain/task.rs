//! Supervisor task: one unit of work dispatched to exactly one worker.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::TaskId;
use super::output::WorkerOutput;
use super::payload::WorkerPayload;

/// Worker kinds known to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkerKind {
    #[serde(rename = "seo-worker")]
    Seo,
    #[serde(rename = "social-worker")]
    Social,
    #[serde(rename = "risk-worker")]
    Risk,
    #[serde(rename = "trend-sentry")]
    TrendSentry,
    #[serde(rename = "geo-worker")]
    Geo,
    #[serde(rename = "messaging-worker")]
    Messaging,
    #[serde(rename = "simulation-worker")]
    Simulation,
    #[serde(rename = "lobbyist-worker")]
    Lobbyist,
    #[serde(rename = "finance-worker")]
    Finance,
}

impl WorkerKind {
    pub const ALL: [WorkerKind; 9] = [
        WorkerKind::Seo,
        WorkerKind::Social,
        WorkerKind::Risk,
        WorkerKind::TrendSentry,
        WorkerKind::Geo,
        WorkerKind::Messaging,
        WorkerKind::Simulation,
        WorkerKind::Lobbyist,
        WorkerKind::Finance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkerKind::Seo => "seo-worker",
            WorkerKind::Social => "social-worker",
            WorkerKind::Risk => "risk-worker",
            WorkerKind::TrendSentry => "trend-sentry",
            WorkerKind::Geo => "geo-worker",
            WorkerKind::Messaging => "messaging-worker",
            WorkerKind::Simulation => "simulation-worker",
            WorkerKind::Lobbyist => "lobbyist-worker",
            WorkerKind::Finance => "finance-worker",
        }
    }
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Task state.
///
/// State transitions:
/// - Pending -> Working -> Completed
/// - Pending -> Working -> Failed
/// - Pending -> Failed (no worker registered for the kind)
///
/// The last path is the one exception to "assigned iff started": a task that
/// never reached a worker fails with no assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Working,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::Working => 1,
            TaskStatus::Completed | TaskStatus::Failed => 2,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Working => "working",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid task transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// A supervisor task.
///
/// - `kind` is derived from the payload and never changes
/// - all state transitions go through the methods below and never regress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(rename = "type")]
    kind: WorkerKind,
    pub priority: Priority,
    payload: WorkerPayload,
    status: TaskStatus,
    /// Set on entering `Working`. Stays `None` for a task failed because its
    /// worker kind is unregistered.
    assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    result: Option<WorkerOutput>,
    error: Option<String>,
}

impl Task {
    pub fn new(
        id: TaskId,
        payload: WorkerPayload,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind: payload.kind(),
            priority,
            payload,
            status: TaskStatus::Pending,
            assigned_to: None,
            created_at,
            completed_at: None,
            result: None,
            error: None,
        }
    }

    pub fn kind(&self) -> WorkerKind {
        self.kind
    }

    pub fn payload(&self) -> &WorkerPayload {
        &self.payload
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn result(&self) -> Option<&WorkerOutput> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn transition(&mut self, to: TaskStatus) -> Result<(), InvalidTransition> {
        let from = self.status;
        let allowed = !from.is_terminal() && to.rank() > from.rank();
        if !allowed {
            return Err(InvalidTransition { from, to });
        }
        self.status = to;
        Ok(())
    }

    /// Pending -> Working, recording the worker's display name.
    pub fn start(&mut self, worker_name: impl Into<String>) -> Result<(), InvalidTransition> {
        self.transition(TaskStatus::Working)?;
        self.assigned_to = Some(worker_name.into());
        Ok(())
    }

    /// Working -> Completed.
    pub fn complete(
        &mut self,
        output: WorkerOutput,
        at: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        if self.status != TaskStatus::Working {
            return Err(InvalidTransition {
                from: self.status,
                to: TaskStatus::Completed,
            });
        }
        self.transition(TaskStatus::Completed)?;
        self.result = Some(output);
        self.completed_at = Some(at);
        Ok(())
    }

    /// Pending|Working -> Failed.
    pub fn fail(&mut self, error: impl Into<String>, at: DateTime<Utc>) -> Result<(), InvalidTransition> {
        self.transition(TaskStatus::Failed)?;
        self.error = Some(error.into());
        self.completed_at = Some(at);
        Ok(())
    }
}
