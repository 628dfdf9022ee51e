//! Pick interpretation.
//!
//! [`SelectionMachine`] turns raw picks into selection changes or commits.
//! A table is either idle (no selection) or armed (an origin is selected):
//!
//! - picking the selected origin again disarms it;
//! - while armed, a board pick commits the selected piece to that square;
//! - while armed, picking another slot of the mover's own drop pool re-arms
//!   on that slot;
//! - while idle, only the mover's own pieces and own pool can be picked.
//!
//! Everything else is ignored without touching the table.

use crate::engine::{ApplyError, Capture, CaptureRoute, MoveCommand, MoveEngine};
use crate::state::{DropSlot, Origin, Selection, Side, Square, TableState};

/// Legality hook consulted before a commit reaches the engine.
pub trait MoveValidator {
    fn is_legal(&self, table: &TableState, command: &MoveCommand) -> bool;
}

/// Accepts every command. The engine itself enforces no movement rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unrestricted;

impl MoveValidator for Unrestricted {
    fn is_legal(&self, _table: &TableState, _command: &MoveCommand) -> bool {
        true
    }
}

impl<F> MoveValidator for F
where
    F: Fn(&TableState, &MoveCommand) -> bool,
{
    fn is_legal(&self, table: &TableState, command: &MoveCommand) -> bool {
        self(table, command)
    }
}

/// Why a pick left the table unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IgnoreReason {
    OutOfBounds,
    EmptySquare,
    /// Piece belongs to the side that is not on turn.
    NotOnTurn { owner: Side },
    /// Drop pool belongs to the side that is not on turn.
    PoolNotOnTurn { owner: Side },
    NoSuchDrop,
    /// The validator refused the command; the selection stays armed.
    Rejected,
}

/// A commit produced by a pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Commit {
    pub command: MoveCommand,
    pub capture: Option<Capture>,
}

/// What a pick did to the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickEffect {
    Ignored(IgnoreReason),
    Selected(Origin),
    Cleared,
    Committed(Commit),
    /// The selection no longer matches the table (a snapshot replaced the
    /// armed piece or the turn) or the engine refused the commit. The
    /// selection is dropped; board, pools and turn are unchanged.
    Aborted(ApplyError),
}

impl PickEffect {
    pub fn commit(&self) -> Option<&Commit> {
        match self {
            PickEffect::Committed(commit) => Some(commit),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickOutcome {
    pub table: TableState,
    pub effect: PickEffect,
}

impl PickOutcome {
    fn unchanged(table: &TableState, reason: IgnoreReason) -> Self {
        Self {
            table: table.clone(),
            effect: PickEffect::Ignored(reason),
        }
    }
}

/// Interprets picks against a table, consulting `V` before every commit.
#[derive(Clone, Debug, Default)]
pub struct SelectionMachine<V = Unrestricted> {
    validator: V,
}

impl SelectionMachine<Unrestricted> {
    pub fn new() -> Self {
        Self {
            validator: Unrestricted,
        }
    }
}

impl<V: MoveValidator> SelectionMachine<V> {
    pub fn with_validator(validator: V) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Handles one pick. `route` decides where a capture from a resulting
    /// commit goes; see [`CaptureRoute`].
    pub fn handle_pick(&self, table: &TableState, pick: Origin, route: CaptureRoute) -> PickOutcome {
        if table.selection.is(pick) {
            tracing::debug!(%pick, "selection cleared");
            return PickOutcome {
                table: table.with_selection(Selection::None),
                effect: PickEffect::Cleared,
            };
        }

        match (table.selection.origin(), pick) {
            (Some(origin), Origin::OnBoard(destination)) => {
                self.commit(table, MoveCommand::new(origin, destination), route)
            }
            (_, Origin::OnBoard(square)) => Self::arm_on_board(table, square),
            (_, Origin::FromDrops(slot)) => Self::arm_from_drops(table, slot),
        }
    }

    fn commit(&self, table: &TableState, command: MoveCommand, route: CaptureRoute) -> PickOutcome {
        if !table.selection_is_current() {
            return Self::abort(table, &command, ApplyError::StaleOrigin { origin: command.origin });
        }
        if !self.validator.is_legal(table, &command) {
            tracing::debug!(%command, "command rejected by validator");
            return PickOutcome::unchanged(table, IgnoreReason::Rejected);
        }

        match MoveEngine::new(table).apply(&command, route) {
            Ok(transition) => PickOutcome {
                table: transition.table,
                effect: PickEffect::Committed(Commit {
                    command,
                    capture: transition.capture,
                }),
            },
            Err(error) => Self::abort(table, &command, error),
        }
    }

    fn abort(table: &TableState, command: &MoveCommand, error: ApplyError) -> PickOutcome {
        tracing::warn!(%command, %error, "commit aborted; clearing stale selection");
        PickOutcome {
            table: table.with_selection(Selection::None),
            effect: PickEffect::Aborted(error),
        }
    }

    fn arm_on_board(table: &TableState, square: Square) -> PickOutcome {
        let piece = match table.board.get(square) {
            Ok(Some(piece)) => piece,
            Ok(None) => return PickOutcome::unchanged(table, IgnoreReason::EmptySquare),
            Err(_) => return PickOutcome::unchanged(table, IgnoreReason::OutOfBounds),
        };
        if piece.side != table.turn {
            return PickOutcome::unchanged(table, IgnoreReason::NotOnTurn { owner: piece.side });
        }

        let origin = Origin::OnBoard(square);
        PickOutcome {
            table: table.with_selection(origin.into()),
            effect: PickEffect::Selected(origin),
        }
    }

    fn arm_from_drops(table: &TableState, slot: DropSlot) -> PickOutcome {
        if slot.side != table.turn {
            return PickOutcome::unchanged(table, IgnoreReason::PoolNotOnTurn { owner: slot.side });
        }
        if table.drops.get(slot.side, slot.index).is_none() {
            return PickOutcome::unchanged(table, IgnoreReason::NoSuchDrop);
        }

        let origin = Origin::FromDrops(slot);
        PickOutcome {
            table: table.with_selection(origin.into()),
            effect: PickEffect::Selected(origin),
        }
    }
}
