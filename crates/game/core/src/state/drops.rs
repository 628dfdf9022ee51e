use super::{DropError, Piece, Side};

/// Captured pieces available for placement, per side.
///
/// Insertion order is capture order. Removing an entry compacts the pool, so
/// every index after it shifts down by one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropPool {
    pools: [Vec<Piece>; 2],
}

impl DropPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sides(first: Vec<Piece>, second: Vec<Piece>) -> Self {
        Self {
            pools: [first, second],
        }
    }

    pub fn pieces(&self, side: Side) -> &[Piece] {
        &self.pools[side.index()]
    }

    pub fn get(&self, side: Side, index: usize) -> Option<Piece> {
        self.pools[side.index()].get(index).copied()
    }

    /// Total number of pieces across both sides.
    pub fn len(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(Vec::is_empty)
    }

    pub fn appended(&self, side: Side, piece: Piece) -> DropPool {
        let mut next = self.clone();
        next.pools[side.index()].push(piece);
        next
    }

    /// Returns the pool without the entry at `index`, together with that entry.
    pub fn removed(&self, side: Side, index: usize) -> Result<(DropPool, Piece), DropError> {
        let pool = &self.pools[side.index()];
        if index >= pool.len() {
            return Err(DropError::IndexOutOfRange {
                side,
                index,
                len: pool.len(),
            });
        }

        let mut next = self.clone();
        let piece = next.pools[side.index()].remove(index);
        Ok((next, piece))
    }

    /// Returns the pool with one side's entries replaced wholesale.
    pub fn with_side(&self, side: Side, pieces: Vec<Piece>) -> DropPool {
        let mut next = self.clone();
        next.pools[side.index()] = pieces;
        next
    }
}
