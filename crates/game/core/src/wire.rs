//! JSON schema exchanged with the remote source.
//!
//! Inbound snapshots carry the board as a 10×9 grid of piece codes
//! (`""` for an empty square, otherwise `<side><kind>` such as `rP`). A batch
//! is either one snapshot or an array with one entry per table. Outbound move
//! intents name the origin by location (`0` board, `1` drop pool) and two
//! coordinates whose meaning depends on it.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::MoveCommand;
use crate::error::{ErrorSeverity, GameError};
use crate::session::{Session, TableId};
use crate::state::{
    Board, Cell, DropSlot, LastMoved, Origin, Piece, Side, Square, TableSnapshot, TableState,
};

pub const LOCATION_BOARD: u8 = 0;
pub const LOCATION_DROPS: u8 = 1;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("malformed json: {0}")]
    Json(String),

    #[error("expected a {rows}x{cols} position, got {found_rows} rows (row widths {widths:?})")]
    Dimensions {
        rows: usize,
        cols: usize,
        found_rows: usize,
        widths: Vec<usize>,
    },

    #[error("unknown piece code {0:?}")]
    PieceCode(String),

    #[error("unknown side code {0:?}")]
    SideCode(String),

    #[error("{field} piece {code:?} does not belong to that side")]
    DropSide { field: &'static str, code: String },

    #[error("square ({row}, {col}) is off the board")]
    Square { row: usize, col: usize },

    #[error("previous lists {found} squares, at most {max} allowed")]
    Previous { found: usize, max: usize },

    #[error("unknown origin location {0}")]
    Location(u8),

    #[error("unknown side index {0}")]
    SideIndex(usize),
}

impl GameError for WireError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "WIRE_JSON",
            Self::Dimensions { .. } => "WIRE_DIMENSIONS",
            Self::PieceCode(_) => "WIRE_PIECE_CODE",
            Self::SideCode(_) => "WIRE_SIDE_CODE",
            Self::DropSide { .. } => "WIRE_DROP_SIDE",
            Self::Square { .. } => "WIRE_SQUARE",
            Self::Previous { .. } => "WIRE_PREVIOUS",
            Self::Location(_) => "WIRE_LOCATION",
            Self::SideIndex(_) => "WIRE_SIDE_INDEX",
        }
    }
}

impl From<serde_json::Error> for WireError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

/// One table's snapshot as it travels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMessage {
    pub position: Vec<Vec<String>>,
    pub turn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_drops: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black_drops: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Vec<[usize; 2]>>,
}

impl SnapshotMessage {
    /// Full snapshot of a table, including drops and the last-move highlight.
    pub fn encode(table: &TableState) -> Self {
        let position = table
            .board
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| encode_cell(*cell)).collect())
            .collect();
        let drops = |side: Side| -> Vec<String> {
            table.drops.pieces(side).iter().map(|piece| piece.code()).collect()
        };

        Self {
            position,
            turn: Side::code(table.turn).to_string(),
            red_drops: Some(drops(Side::First)),
            black_drops: Some(drops(Side::Second)),
            previous: Some(
                table
                    .last_moved
                    .iter()
                    .map(|square| [square.row, square.col])
                    .collect(),
            ),
        }
    }

    pub fn decode(&self) -> Result<TableSnapshot, WireError> {
        let board = decode_position(&self.position)?;
        let turn = decode_side(&self.turn)?;

        let mut snapshot = TableSnapshot::new(board, turn);
        snapshot.first_drops = self
            .red_drops
            .as_deref()
            .map(|codes| decode_drops("red_drops", Side::First, codes))
            .transpose()?;
        snapshot.second_drops = self
            .black_drops
            .as_deref()
            .map(|codes| decode_drops("black_drops", Side::Second, codes))
            .transpose()?;
        snapshot.last_moved = self.previous.as_deref().map(decode_previous).transpose()?;
        Ok(snapshot)
    }
}

/// A single snapshot or one snapshot per table, in table order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotBatch {
    One(SnapshotMessage),
    Many(Vec<SnapshotMessage>),
}

impl SnapshotBatch {
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encodes every table of a session as an array batch.
    pub fn encode(session: &Session) -> Self {
        Self::Many(
            session
                .tables()
                .map(|(_, table)| SnapshotMessage::encode(table))
                .collect(),
        )
    }

    /// Decodes every entry, pairing it with the table it targets.
    ///
    /// Decoding is all-or-nothing: one malformed entry rejects the batch.
    pub fn decode(&self) -> Result<Vec<(TableId, TableSnapshot)>, WireError> {
        match self {
            Self::One(message) => Ok(vec![(TableId(0), message.decode()?)]),
            Self::Many(messages) => messages
                .iter()
                .enumerate()
                .map(|(index, message)| Ok((TableId(index), message.decode()?)))
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireOrigin {
    pub location: u8,
    /// Row for board origins, side index for drop origins.
    pub x: usize,
    /// Column for board origins, pool index for drop origins.
    pub y: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSquare {
    pub x: usize,
    pub y: usize,
}

/// Outbound record of a committed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<usize>,
    pub from: WireOrigin,
    pub to: WireSquare,
}

impl MoveIntent {
    pub fn new(table: Option<TableId>, command: &MoveCommand) -> Self {
        let from = match command.origin {
            Origin::OnBoard(square) => WireOrigin {
                location: LOCATION_BOARD,
                x: square.row,
                y: square.col,
            },
            Origin::FromDrops(slot) => WireOrigin {
                location: LOCATION_DROPS,
                x: slot.side.index(),
                y: slot.index,
            },
        };
        Self {
            table: table.map(|id| id.0),
            from,
            to: WireSquare {
                x: command.destination.row,
                y: command.destination.col,
            },
        }
    }

    /// Target table; absent means the first table.
    pub fn table_id(&self) -> TableId {
        TableId(self.table.unwrap_or(0))
    }

    pub fn command(&self) -> Result<MoveCommand, WireError> {
        let origin = match self.from.location {
            LOCATION_BOARD => Origin::OnBoard(decode_square(self.from.x, self.from.y)?),
            LOCATION_DROPS => {
                let side =
                    Side::from_index(self.from.x).ok_or(WireError::SideIndex(self.from.x))?;
                Origin::FromDrops(DropSlot::new(side, self.from.y))
            }
            other => return Err(WireError::Location(other)),
        };
        Ok(MoveCommand::new(origin, decode_square(self.to.x, self.to.y)?))
    }

    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn encode_cell(cell: Cell) -> String {
    cell.map(Piece::code).unwrap_or_default()
}

fn decode_side(code: &str) -> Result<Side, WireError> {
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Side::from_code(c).ok_or_else(|| WireError::SideCode(code.to_string())),
        _ => Err(WireError::SideCode(code.to_string())),
    }
}

fn decode_piece(code: &str) -> Result<Piece, WireError> {
    Piece::from_code(code).ok_or_else(|| WireError::PieceCode(code.to_string()))
}

fn decode_square(row: usize, col: usize) -> Result<Square, WireError> {
    let square = Square::new(row, col);
    if Board::contains(square) {
        Ok(square)
    } else {
        Err(WireError::Square { row, col })
    }
}

fn decode_position(position: &[Vec<String>]) -> Result<Board, WireError> {
    let well_formed = position.len() == GameConfig::ROWS
        && position.iter().all(|row| row.len() == GameConfig::COLS);
    if !well_formed {
        return Err(WireError::Dimensions {
            rows: GameConfig::ROWS,
            cols: GameConfig::COLS,
            found_rows: position.len(),
            widths: position.iter().map(Vec::len).collect(),
        });
    }

    let mut cells = [[None; GameConfig::COLS]; GameConfig::ROWS];
    for (row, codes) in position.iter().enumerate() {
        for (col, code) in codes.iter().enumerate() {
            if !code.is_empty() {
                cells[row][col] = Some(decode_piece(code)?);
            }
        }
    }
    Ok(Board::from_rows(cells))
}

fn decode_drops(field: &'static str, side: Side, codes: &[String]) -> Result<Vec<Piece>, WireError> {
    codes
        .iter()
        .map(|code| {
            let piece = decode_piece(code)?;
            if piece.side != side {
                return Err(WireError::DropSide {
                    field,
                    code: code.clone(),
                });
            }
            Ok(piece)
        })
        .collect()
}

fn decode_previous(previous: &[[usize; 2]]) -> Result<LastMoved, WireError> {
    let mut last_moved = LastMoved::new();
    if previous.len() > last_moved.capacity() {
        return Err(WireError::Previous {
            found: previous.len(),
            max: last_moved.capacity(),
        });
    }
    for &[row, col] in previous {
        last_moved.push(decode_square(row, col)?);
    }
    Ok(last_moved)
}
