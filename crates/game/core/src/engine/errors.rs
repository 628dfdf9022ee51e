//! Error types for the commit pipeline.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{BoardError, DropError, Origin, Square};

use super::MoveCommand;

/// Errors surfaced while applying a [`MoveCommand`] to a table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Drop(#[from] DropError),

    #[error("no piece at origin {square}")]
    EmptyOrigin { square: Square },

    #[error("selected piece at {origin} has changed since it was picked")]
    StaleOrigin { origin: Origin },

    #[error("origin and destination are both {square}")]
    Stationary { square: Square },

    #[error("move {command} rejected by validator")]
    Rejected { command: MoveCommand },
}

impl GameError for ApplyError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Board(e) => e.severity(),
            Self::Drop(e) => e.severity(),
            // A selection that pointed at a piece which has since been
            // overwritten by a snapshot.
            Self::EmptyOrigin { .. } | Self::StaleOrigin { .. } => ErrorSeverity::Recoverable,
            Self::Stationary { .. } | Self::Rejected { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Board(e) => e.error_code(),
            Self::Drop(e) => e.error_code(),
            Self::EmptyOrigin { .. } => "APPLY_EMPTY_ORIGIN",
            Self::StaleOrigin { .. } => "APPLY_STALE_ORIGIN",
            Self::Stationary { .. } => "APPLY_STATIONARY",
            Self::Rejected { .. } => "APPLY_REJECTED",
        }
    }
}
