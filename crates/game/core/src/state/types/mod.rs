pub mod common;
pub mod piece;

pub use common::{DropSlot, Square};
pub use piece::{Piece, PieceKind, Side};
