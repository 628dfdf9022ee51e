use crate::state::{PieceKind, Side};

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Side that moves first on a freshly constructed table.
    pub starting_turn: Side,
}

impl GameConfig {
    // ===== board geometry =====
    pub const ROWS: usize = 10;
    pub const COLS: usize = 9;

    /// Squares touched by a single commit: destination, then origin for board moves.
    pub const MAX_LAST_MOVED: usize = 2;

    // ===== starting layout =====
    /// Back rank, left to right, as seen from row 0.
    pub const BACK_RANK: [PieceKind; Self::COLS] = [
        PieceKind::Chariot,
        PieceKind::Horse,
        PieceKind::Elephant,
        PieceKind::Advisor,
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
    ];
    pub const CANNON_COLS: [usize; 2] = [1, 7];
    pub const SOLDIER_COLS: [usize; 5] = [0, 2, 4, 6, 8];

    /// Second side occupies the top of the board (rows 0..=3).
    pub const SECOND_BACK_ROW: usize = 0;
    pub const SECOND_CANNON_ROW: usize = 2;
    pub const SECOND_SOLDIER_ROW: usize = 3;
    /// First side occupies the bottom of the board (rows 6..=9).
    pub const FIRST_SOLDIER_ROW: usize = 6;
    pub const FIRST_CANNON_ROW: usize = 7;
    pub const FIRST_BACK_ROW: usize = 9;

    pub const DEFAULT_STARTING_TURN: Side = Side::First;

    pub fn new() -> Self {
        Self {
            starting_turn: Self::DEFAULT_STARTING_TURN,
        }
    }

    pub fn with_starting_turn(starting_turn: Side) -> Self {
        Self { starting_turn }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
