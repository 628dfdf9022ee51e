use super::{Board, LastMoved, Piece, Side};

/// What to do with a pending local selection when an authoritative snapshot
/// replaces the table underneath it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SnapshotPolicy {
    /// Leave the selection as it was. A selection that went stale is caught
    /// by the engine on the next commit attempt.
    #[default]
    Retain,
    /// Drop any pending selection whenever a snapshot lands.
    Clear,
}

/// Authoritative replacement for one table, already decoded.
///
/// `board` and `turn` are always replaced. Drop lists and the last-move
/// highlight are replaced only when the remote source sent them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSnapshot {
    pub board: Board,
    pub turn: Side,
    pub first_drops: Option<Vec<Piece>>,
    pub second_drops: Option<Vec<Piece>>,
    pub last_moved: Option<LastMoved>,
}

impl TableSnapshot {
    pub fn new(board: Board, turn: Side) -> Self {
        Self {
            board,
            turn,
            first_drops: None,
            second_drops: None,
            last_moved: None,
        }
    }

    pub fn with_drops(mut self, first: Vec<Piece>, second: Vec<Piece>) -> Self {
        self.first_drops = Some(first);
        self.second_drops = Some(second);
        self
    }

    pub fn with_last_moved(mut self, last_moved: LastMoved) -> Self {
        self.last_moved = Some(last_moved);
        self
    }

    pub fn drops(&self, side: Side) -> Option<&[Piece]> {
        match side {
            Side::First => self.first_drops.as_deref(),
            Side::Second => self.second_drops.as_deref(),
        }
    }
}
