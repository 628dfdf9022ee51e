//! Commit pipeline.
//!
//! [`MoveEngine`] is the only way a local commit changes a [`TableState`].
//! It reads the table, never mutates it, and returns the next version along
//! with any capture the move produced. The engine is rule-agnostic: any
//! destination is accepted and whatever stood there is captured. Legality,
//! if wanted, is layered on top by the selection machine's validator.

mod command;
mod errors;
mod transition;

pub use command::{Capture, CaptureRoute, MoveCommand};
pub use errors::ApplyError;

use crate::state::{Origin, Selection, TableState};

/// Result of applying a command: the next table version and the capture, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub table: TableState,
    pub capture: Option<Capture>,
}

/// Applies commits to a borrowed table.
pub struct MoveEngine<'a> {
    table: &'a TableState,
}

impl<'a> MoveEngine<'a> {
    pub fn new(table: &'a TableState) -> Self {
        Self { table }
    }

    /// Applies `command` and flips the turn.
    ///
    /// On success the returned table has no selection, `last_moved` set to
    /// the touched squares, and (for [`CaptureRoute::Local`]) the converted
    /// capture appended to the capturing side's pool. On failure the borrowed
    /// table is untouched and no partial version escapes.
    pub fn apply(
        &self,
        command: &MoveCommand,
        route: CaptureRoute,
    ) -> Result<Transition, ApplyError> {
        let destination = command.destination;
        let occupant = self.table.board.get(destination)?;

        let placed = match command.origin {
            Origin::OnBoard(origin) => transition::move_on_board(self.table, origin, destination)?,
            Origin::FromDrops(slot) => transition::drop_from_pool(self.table, slot, destination)?,
        };

        let mut next = placed;
        let capture = occupant.map(|taken| Capture::new(taken, route));
        if let Some(capture) = &capture
            && capture.route == CaptureRoute::Local
        {
            next.drops = next
                .drops
                .appended(capture.converted.side, capture.converted);
        }

        next.turn = self.table.turn.opponent();
        next.selection = Selection::None;
        next.armed_piece = None;

        Ok(Transition {
            table: next,
            capture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Board, DropSlot, Piece, PieceKind, Side, Square};

    fn soldier(side: Side) -> Piece {
        Piece::new(side, PieceKind::Soldier)
    }

    #[test]
    fn board_move_relocates_piece_and_flips_turn() {
        let table = TableState::default();
        let command = MoveCommand::new(Origin::OnBoard(Square::new(6, 0)), Square::new(5, 0));

        let Transition { table: next, capture } = MoveEngine::new(&table)
            .apply(&command, CaptureRoute::Local)
            .unwrap();

        assert_eq!(capture, None);
        assert_eq!(next.board.get(Square::new(6, 0)).unwrap(), None);
        assert_eq!(next.board.get(Square::new(5, 0)).unwrap(), Some(soldier(Side::First)));
        assert_eq!(next.turn, Side::Second);
        assert_eq!(next.last_moved.as_slice(), &[Square::new(5, 0), Square::new(6, 0)]);
    }

    #[test]
    fn local_capture_lands_in_capturing_side_pool() {
        let board = Board::empty()
            .with(Square::new(5, 0), Some(soldier(Side::First)))
            .unwrap()
            .with(Square::new(4, 0), Some(soldier(Side::Second)))
            .unwrap();
        let table = TableState {
            board,
            ..TableState::default()
        };
        let command = MoveCommand::new(Origin::OnBoard(Square::new(5, 0)), Square::new(4, 0));

        let transition = MoveEngine::new(&table)
            .apply(&command, CaptureRoute::Local)
            .unwrap();

        let capture = transition.capture.unwrap();
        assert_eq!(capture.taken, soldier(Side::Second));
        assert_eq!(capture.converted, soldier(Side::First));
        assert_eq!(transition.table.drops.pieces(Side::First), &[soldier(Side::First)]);
        assert!(transition.table.drops.pieces(Side::Second).is_empty());
        assert_eq!(transition.table.piece_count(), table.piece_count());
    }

    #[test]
    fn forwarded_capture_leaves_pools_alone() {
        let table = TableState::default();
        let command = MoveCommand::new(Origin::OnBoard(Square::new(9, 0)), Square::new(0, 0));

        let transition = MoveEngine::new(&table)
            .apply(&command, CaptureRoute::Forward)
            .unwrap();

        assert_eq!(
            transition.capture.map(|c| c.route),
            Some(CaptureRoute::Forward)
        );
        assert!(transition.table.drops.is_empty());
        assert_eq!(transition.table.piece_count(), table.piece_count() - 1);
    }

    #[test]
    fn drop_placement_removes_entry_and_marks_destination_only() {
        let table = TableState::default()
            .receive_drop(Piece::new(Side::First, PieceKind::Horse))
            .receive_drop(soldier(Side::First));
        let command = MoveCommand::new(
            Origin::FromDrops(DropSlot::new(Side::First, 0)),
            Square::new(4, 4),
        );

        let next = MoveEngine::new(&table)
            .apply(&command, CaptureRoute::Local)
            .unwrap()
            .table;

        assert_eq!(
            next.board.get(Square::new(4, 4)).unwrap(),
            Some(Piece::new(Side::First, PieceKind::Horse))
        );
        assert_eq!(next.drops.pieces(Side::First), &[soldier(Side::First)]);
        assert_eq!(next.last_moved.as_slice(), &[Square::new(4, 4)]);
        assert_eq!(next.turn, Side::Second);
    }

    #[test]
    fn stale_drop_index_fails_without_partial_state() {
        let table = TableState::default();
        let command = MoveCommand::new(
            Origin::FromDrops(DropSlot::new(Side::First, 0)),
            Square::new(4, 4),
        );

        let err = MoveEngine::new(&table)
            .apply(&command, CaptureRoute::Local)
            .unwrap_err();
        assert!(matches!(err, ApplyError::Drop(_)));
    }

    #[test]
    fn empty_origin_and_out_of_bounds_destination_fail() {
        let table = TableState::default();
        let empty = MoveCommand::new(Origin::OnBoard(Square::new(4, 4)), Square::new(5, 5));
        assert_eq!(
            MoveEngine::new(&table).apply(&empty, CaptureRoute::Local),
            Err(ApplyError::EmptyOrigin {
                square: Square::new(4, 4)
            })
        );

        let outside = MoveCommand::new(Origin::OnBoard(Square::new(6, 0)), Square::new(12, 0));
        assert!(matches!(
            MoveEngine::new(&table).apply(&outside, CaptureRoute::Local),
            Err(ApplyError::Board(_))
        ));
    }
}
