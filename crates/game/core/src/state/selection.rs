use super::{DropSlot, Square};

/// A place a piece can be picked up from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Origin {
    OnBoard(Square),
    FromDrops(DropSlot),
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::OnBoard(square) => write!(f, "board {square}"),
            Origin::FromDrops(slot) => write!(f, "drops {slot}"),
        }
    }
}

/// The table's pending pick, if any. At most one per table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    #[default]
    None,
    OnBoard(Square),
    FromDrops(DropSlot),
}

impl Selection {
    pub const fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub const fn origin(&self) -> Option<Origin> {
        match *self {
            Selection::None => None,
            Selection::OnBoard(square) => Some(Origin::OnBoard(square)),
            Selection::FromDrops(slot) => Some(Origin::FromDrops(slot)),
        }
    }

    /// True when `origin` is exactly the selected origin (same kind and coordinate).
    pub fn is(&self, origin: Origin) -> bool {
        self.origin() == Some(origin)
    }
}

impl From<Origin> for Selection {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::OnBoard(square) => Selection::OnBoard(square),
            Origin::FromDrops(slot) => Selection::FromDrops(slot),
        }
    }
}
