//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the session and the wire schema
//! so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use janggi_core::{ErrorSeverity, GameError, SessionError, WireError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("worker command channel closed")]
    CommandChannelClosed,

    #[error("worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("online mode requires an api host to be configured")]
    MissingApiHost,
}

impl RuntimeError {
    /// Failures caused by the payload rather than the runtime itself.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Session(error) => error.severity(),
            Self::Wire(error) => error.severity(),
            Self::MissingApiHost => ErrorSeverity::Validation,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
        }
    }

    /// True once the worker behind a handle is gone.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_)
        )
    }
}
