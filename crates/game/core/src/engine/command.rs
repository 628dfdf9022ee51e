use crate::state::{Origin, Piece, Square};

/// A committed intent: move whatever sits at `origin` onto `destination`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCommand {
    pub origin: Origin,
    pub destination: Square,
}

impl MoveCommand {
    pub const fn new(origin: Origin, destination: Square) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

impl std::fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.origin, self.destination)
    }
}

/// Where a converted capture goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaptureRoute {
    /// Append to the capturing table's own pool.
    #[default]
    Local,
    /// Leave the table's pools alone; the caller delivers the piece to a linked table.
    Forward,
}

/// A piece removed from the board by a commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capture {
    /// The piece as it stood on the destination square.
    pub taken: Piece,
    /// The same piece relabelled to the capturing side.
    pub converted: Piece,
    pub route: CaptureRoute,
}

impl Capture {
    pub const fn new(taken: Piece, route: CaptureRoute) -> Self {
        Self {
            taken,
            converted: taken.converted(),
            route,
        }
    }
}
