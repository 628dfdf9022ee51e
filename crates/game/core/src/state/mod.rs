//! Table state representation.
//!
//! This module owns the data structures that describe a table: the board,
//! the per-side drop pools, the pending selection and the last-move
//! highlight. Every structure is a value; the engine and snapshot handling
//! produce new versions instead of mutating shared ones.
mod board;
mod drops;
mod error;
mod selection;
mod snapshot;
mod table;
pub mod types;

pub use board::{Board, Cell};
pub use drops::DropPool;
pub use error::{BoardError, DropError};
pub use selection::{Origin, Selection};
pub use snapshot::{SnapshotPolicy, TableSnapshot};
pub use table::{LastMoved, TableState};
pub use types::{DropSlot, Piece, PieceKind, Side, Square};
