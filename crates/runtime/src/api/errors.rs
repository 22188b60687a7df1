//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content and the combat core so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use combat_content::ContentError;
use combat_core::CastError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("frame step must be a positive number of seconds, got {0}")]
    InvalidStep(f32),

    #[error("runtime requires content to be configured before building")]
    MissingContent,

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Cast(#[from] CastError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("unknown class `{0}`")]
    UnknownClass(String),

    #[error("scenario `{scenario}`: {reason}")]
    Scenario { scenario: String, reason: String },
}

impl RuntimeError {
    pub(crate) fn scenario(scenario: &str, reason: impl Into<String>) -> Self {
        Self::Scenario {
            scenario: scenario.to_string(),
            reason: reason.into(),
        }
    }
}
