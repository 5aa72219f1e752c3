use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::{PublishTaskId, TaskId, WorkerKind};
use crate::platforms::oauth::OAuthError;
use crate::ports::PublishReceipt;
use crate::supervisor::BuildError;
use crate::workers::RegistryError;

/// Crate-level error for operations that can fail outright.
///
/// Task and publish failures are recorded on the task itself; this type only
/// covers lookups, wiring and configuration.
#[derive(Debug, Error)]
pub enum HeraldError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("publish task not found: {0}")]
    PublishTaskNotFound(PublishTaskId),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error raised by a worker's `execute`. Becomes the task's `error` string.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("content generation failed: {0}")]
    Generation(String),

    #[error("trend source failed: {0}")]
    TrendSource(String),

    #[error("{worker} cannot handle a {got} payload")]
    PayloadMismatch { worker: WorkerKind, got: WorkerKind },
}

/// Error raised by a platform adapter. Normalized into a failed `PublishOutcome`.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Precondition not met; the external service was not contacted.
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Auth(String),

    /// Error reported by the platform API.
    #[error("{message}")]
    Api { code: Option<i64>, message: String },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    OAuth(#[from] OAuthError),

    /// Part of a multi-post publish went out before `error` stopped it.
    #[error("{error}")]
    Partial {
        posted: PublishReceipt,
        #[source]
        error: Box<PlatformError>,
    },
}

impl PlatformError {
    pub fn api(code: Option<i64>, message: impl Into<String>) -> Self {
        PlatformError::Api {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_errors_render_bare_messages() {
        let err = PlatformError::api(Some(15), "Access denied");
        assert_eq!(err.to_string(), "Access denied");

        let err = PlatformError::Rejected("TikTok requires a videoUrl".into());
        assert_eq!(err.to_string(), "TikTok requires a videoUrl");
    }

    #[test]
    fn partial_error_shows_the_stopping_error() {
        let err = PlatformError::Partial {
            posted: PublishReceipt::new("1"),
            error: Box::new(PlatformError::api(Some(429), "Too Many Requests")),
        };
        assert_eq!(err.to_string(), "Too Many Requests");
    }

    #[test]
    fn payload_mismatch_names_both_kinds() {
        let err = WorkerError::PayloadMismatch {
            worker: WorkerKind::Seo,
            got: WorkerKind::Risk,
        };
        assert_eq!(err.to_string(), "seo-worker cannot handle a risk-worker payload");
    }
}
