//! Deterministic table state for linked drop-janggi play.
//!
//! `janggi-core` defines the data model (board, drop pools, selection, table),
//! the commit pipeline ([`engine::MoveEngine`]), pick interpretation
//! ([`selection::SelectionMachine`]) and multi-table routing
//! ([`session::Session`]). Everything here is synchronous and free of I/O;
//! the runtime crate feeds picks and remote snapshots through these APIs.
//!
//! No movement rules are enforced. Turn order, capture-to-drop conversion
//! and selection semantics are the only rules; legality can be layered on
//! through [`selection::MoveValidator`].
pub mod config;
pub mod engine;
pub mod error;
pub mod selection;
pub mod session;
pub mod state;
#[cfg(feature = "serde")]
pub mod wire;

pub use config::GameConfig;
pub use engine::{ApplyError, Capture, CaptureRoute, MoveCommand, MoveEngine, Transition};
pub use error::{ErrorSeverity, GameError};
pub use selection::{
    Commit, IgnoreReason, MoveValidator, PickEffect, PickOutcome, SelectionMachine, Unrestricted,
};
pub use session::{Session, SessionBuilder, SessionError, TableId};
pub use state::{
    Board, BoardError, Cell, DropError, DropPool, DropSlot, LastMoved, Origin, Piece, PieceKind,
    Selection, Side, SnapshotPolicy, Square, TableSnapshot, TableState,
};
#[cfg(feature = "serde")]
pub use wire::{MoveIntent, SnapshotBatch, SnapshotMessage, WireError, WireOrigin, WireSquare};
