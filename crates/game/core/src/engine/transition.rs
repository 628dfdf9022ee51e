//! The two placement shapes a commit can take.
//!
//! Both return the table with the piece written to its destination; capture
//! routing and turn handling are done by the caller.

use crate::state::{DropSlot, LastMoved, Square, TableState};

use super::ApplyError;

pub(super) fn move_on_board(
    table: &TableState,
    origin: Square,
    destination: Square,
) -> Result<TableState, ApplyError> {
    let piece = table
        .board
        .get(origin)?
        .ok_or(ApplyError::EmptyOrigin { square: origin })?;
    if origin == destination {
        return Err(ApplyError::Stationary { square: origin });
    }

    let mut next = table.clone();
    next.board = table
        .board
        .with(destination, Some(piece))?
        .with(origin, None)?;
    next.last_moved = LastMoved::from_iter([destination, origin]);
    Ok(next)
}

pub(super) fn drop_from_pool(
    table: &TableState,
    slot: DropSlot,
    destination: Square,
) -> Result<TableState, ApplyError> {
    let (drops, piece) = table.drops.removed(slot.side, slot.index)?;

    let mut next = table.clone();
    next.board = table.board.with(destination, Some(piece))?;
    next.drops = drops;
    next.last_moved = LastMoved::from_iter([destination]);
    Ok(next)
}
