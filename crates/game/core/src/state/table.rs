use arrayvec::ArrayVec;

use crate::config::GameConfig;

use super::{
    Board, DropPool, Origin, Piece, Selection, Side, SnapshotPolicy, Square, TableSnapshot,
};

/// Squares touched by the most recent commit: `[destination, origin]` for a
/// board move, `[destination]` for a drop, empty before the first move.
pub type LastMoved = ArrayVec<Square, { GameConfig::MAX_LAST_MOVED }>;

/// Everything one table knows about its game.
///
/// Versions are replaced wholesale; nothing here is shared between versions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableState {
    pub board: Board,
    pub drops: DropPool,
    pub turn: Side,
    pub selection: Selection,
    /// The piece under `selection` at the moment it was armed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub armed_piece: Option<Piece>,
    pub last_moved: LastMoved,
    /// Display rotation only. Never consulted by selection or the engine.
    pub orientation: Side,
}

impl TableState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            board: Board::starting(),
            drops: DropPool::new(),
            turn: config.starting_turn,
            selection: Selection::None,
            armed_piece: None,
            last_moved: LastMoved::new(),
            orientation: Side::First,
        }
    }

    pub fn with_orientation(mut self, orientation: Side) -> Self {
        self.orientation = orientation;
        self
    }

    /// Pieces on the board plus pieces waiting in either drop pool.
    pub fn piece_count(&self) -> usize {
        self.board.piece_count() + self.drops.len()
    }

    /// Returns this table with `selection` armed, recording the piece it
    /// currently points at.
    pub fn with_selection(&self, selection: Selection) -> TableState {
        let mut next = self.clone();
        next.selection = selection;
        next.armed_piece = selection.origin().and_then(|origin| self.piece_at(origin));
        next
    }

    /// The piece an origin currently points at, if any.
    pub fn piece_at(&self, origin: Origin) -> Option<Piece> {
        match origin {
            Origin::OnBoard(square) => self.board.get(square).ok().flatten(),
            Origin::FromDrops(slot) => self.drops.get(slot.side, slot.index),
        }
    }

    /// True while the selection still points at the piece it was armed
    /// with and that piece's side is on turn.
    pub fn selection_is_current(&self) -> bool {
        match self.selection.origin().and_then(|origin| self.piece_at(origin)) {
            Some(piece) => self.armed_piece == Some(piece) && piece.side == self.turn,
            None => false,
        }
    }

    /// Returns this table with `piece` appended to the pool of its own side.
    pub fn receive_drop(&self, piece: Piece) -> TableState {
        let mut next = self.clone();
        next.drops = self.drops.appended(piece.side, piece);
        next
    }

    /// Overwrites board and turn (and drops / last move when present) with
    /// the snapshot's values. No merge is attempted.
    pub fn overwritten(&self, snapshot: &TableSnapshot, policy: SnapshotPolicy) -> TableState {
        let mut next = self.clone();
        next.board = snapshot.board;
        next.turn = snapshot.turn;
        for side in Side::ALL {
            if let Some(pieces) = snapshot.drops(side) {
                next.drops = next.drops.with_side(side, pieces.to_vec());
            }
        }
        if let Some(last_moved) = &snapshot.last_moved {
            next.last_moved = last_moved.clone();
        }
        if policy == SnapshotPolicy::Clear {
            next.selection = Selection::None;
            next.armed_piece = None;
        }
        next
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PieceKind;

    fn snapshot() -> TableSnapshot {
        let board = Board::empty()
            .with(Square::new(4, 4), Some(Piece::new(Side::Second, PieceKind::Horse)))
            .unwrap();
        TableSnapshot::new(board, Side::Second)
    }

    #[test]
    fn snapshot_replaces_board_and_turn_but_keeps_absent_fields() {
        let table = TableState::default()
            .receive_drop(Piece::new(Side::First, PieceKind::Soldier))
            .with_selection(Selection::OnBoard(Square::new(6, 0)));

        let next = table.overwritten(&snapshot(), SnapshotPolicy::Retain);

        assert_eq!(next.board, snapshot().board);
        assert_eq!(next.turn, Side::Second);
        assert_eq!(next.drops, table.drops);
        assert_eq!(next.selection, Selection::OnBoard(Square::new(6, 0)));
    }

    #[test]
    fn clear_policy_drops_pending_selection() {
        let table = TableState::default().with_selection(Selection::OnBoard(Square::new(6, 0)));
        let next = table.overwritten(&snapshot(), SnapshotPolicy::Clear);
        assert_eq!(next.selection, Selection::None);
    }

    #[test]
    fn snapshot_drop_lists_replace_each_side() {
        let table = TableState::default().receive_drop(Piece::new(Side::First, PieceKind::Soldier));
        let snap = snapshot().with_drops(
            vec![],
            vec![Piece::new(Side::Second, PieceKind::Chariot)],
        );

        let next = table.overwritten(&snap, SnapshotPolicy::Retain);
        assert!(next.drops.pieces(Side::First).is_empty());
        assert_eq!(
            next.drops.pieces(Side::Second),
            &[Piece::new(Side::Second, PieceKind::Chariot)]
        );
    }
}
