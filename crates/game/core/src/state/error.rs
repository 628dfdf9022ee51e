//! Structural errors raised by the board and drop-pool accessors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Side, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardError {
    #[error("square {square} is outside the {rows}x{cols} board")]
    OutOfBounds {
        square: Square,
        rows: usize,
        cols: usize,
    },
}

impl GameError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfBounds { .. } => "BOARD_OUT_OF_BOUNDS",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropError {
    /// The index no longer exists, typically because the pool was compacted or
    /// overwritten since the caller read it.
    #[error("drop index {index} out of range for {side} pool of {len}")]
    IndexOutOfRange { side: Side, index: usize, len: usize },
}

impl GameError for DropError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "DROP_INDEX_OUT_OF_RANGE",
        }
    }
}
