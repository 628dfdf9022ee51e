use crate::config::GameConfig;

use super::{BoardError, Piece, Side, Square};

/// Contents of a single square.
pub type Cell = Option<Piece>;

type Grid = [[Cell; GameConfig::COLS]; GameConfig::ROWS];

/// Fixed-size grid of cells.
///
/// The board is a plain value: every mutation returns a new board, so a
/// snapshot held by one observer never changes under it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    cells: Grid,
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            cells: [[None; GameConfig::COLS]; GameConfig::ROWS],
        }
    }

    pub const fn from_rows(cells: Grid) -> Self {
        Self { cells }
    }

    /// Standard opening: second side on rows 0..=3, first side mirrored on rows 6..=9.
    pub fn starting() -> Self {
        let mut cells = [[None; GameConfig::COLS]; GameConfig::ROWS];
        let layout = [
            (
                Side::Second,
                GameConfig::SECOND_BACK_ROW,
                GameConfig::SECOND_CANNON_ROW,
                GameConfig::SECOND_SOLDIER_ROW,
            ),
            (
                Side::First,
                GameConfig::FIRST_BACK_ROW,
                GameConfig::FIRST_CANNON_ROW,
                GameConfig::FIRST_SOLDIER_ROW,
            ),
        ];

        for (side, back, cannons, soldiers) in layout {
            for (col, kind) in GameConfig::BACK_RANK.into_iter().enumerate() {
                cells[back][col] = Some(Piece::new(side, kind));
            }
            for col in GameConfig::CANNON_COLS {
                cells[cannons][col] = Some(Piece::new(side, super::PieceKind::Cannon));
            }
            for col in GameConfig::SOLDIER_COLS {
                cells[soldiers][col] = Some(Piece::new(side, super::PieceKind::Soldier));
            }
        }

        Self { cells }
    }

    pub const fn contains(square: Square) -> bool {
        square.row < GameConfig::ROWS && square.col < GameConfig::COLS
    }

    pub fn get(&self, square: Square) -> Result<Cell, BoardError> {
        Self::check(square)?;
        Ok(self.cells[square.row][square.col])
    }

    /// Returns a new board with `square` set to `cell`.
    pub fn with(&self, square: Square, cell: Cell) -> Result<Board, BoardError> {
        Self::check(square)?;
        let mut next = *self;
        next.cells[square.row][square.col] = cell;
        Ok(next)
    }

    pub fn rows(&self) -> &Grid {
        &self.cells
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|piece| (Square::new(row, col), piece)))
        })
    }

    pub fn piece_count(&self) -> usize {
        self.occupied().count()
    }

    fn check(square: Square) -> Result<(), BoardError> {
        if Self::contains(square) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds {
                square,
                rows: GameConfig::ROWS,
                cols: GameConfig::COLS,
            })
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}
