//! Sides and piece identities.
//!
//! Pieces are small `Copy` values. The two-character wire code
//! (`<side><kind>`, e.g. `rP`) is the only textual form they have.

/// One of the two players.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    /// Moves first; `r` on the wire.
    #[default]
    First,
    /// `b` on the wire.
    Second,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::First, Side::Second];

    pub const fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Stable index used for per-side storage and for the wire `x` field of
    /// drop-pool origins.
    pub const fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub const fn from_index(index: usize) -> Option<Side> {
        match index {
            0 => Some(Side::First),
            1 => Some(Side::Second),
            _ => None,
        }
    }

    pub const fn code(self) -> char {
        match self {
            Side::First => 'r',
            Side::Second => 'b',
        }
    }

    pub const fn from_code(code: char) -> Option<Side> {
        match code {
            'r' => Some(Side::First),
            'b' => Some(Side::Second),
            _ => None,
        }
    }
}

/// Piece types of the janggi alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

impl PieceKind {
    pub const fn code(self) -> char {
        match self {
            PieceKind::General => 'G',
            PieceKind::Advisor => 'A',
            PieceKind::Elephant => 'E',
            PieceKind::Horse => 'H',
            PieceKind::Chariot => 'R',
            PieceKind::Cannon => 'C',
            PieceKind::Soldier => 'P',
        }
    }

    pub const fn from_code(code: char) -> Option<PieceKind> {
        match code {
            'G' => Some(PieceKind::General),
            'A' => Some(PieceKind::Advisor),
            'E' => Some(PieceKind::Elephant),
            'H' => Some(PieceKind::Horse),
            'R' => Some(PieceKind::Chariot),
            'C' => Some(PieceKind::Cannon),
            'P' => Some(PieceKind::Soldier),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// The same piece handed over to the other side, as happens on capture.
    pub const fn converted(self) -> Piece {
        Piece::new(self.side.opponent(), self.kind)
    }

    pub fn code(self) -> String {
        let mut code = String::with_capacity(2);
        code.push(self.side.code());
        code.push(self.kind.code());
        code
    }

    /// Parses a two-character code such as `rP`. Returns `None` for anything else.
    pub fn from_code(code: &str) -> Option<Piece> {
        let mut chars = code.chars();
        let side = Side::from_code(chars.next()?)?;
        let kind = PieceKind::from_code(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Piece::new(side, kind))
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.side.code(), self.kind.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn piece_codes_parse_back() {
        for side in Side::iter() {
            for kind in PieceKind::iter() {
                let piece = Piece::new(side, kind);
                assert_eq!(Piece::from_code(&piece.code()), Some(piece));
            }
        }
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert_eq!(Piece::from_code(""), None);
        assert_eq!(Piece::from_code("r"), None);
        assert_eq!(Piece::from_code("xP"), None);
        assert_eq!(Piece::from_code("rZ"), None);
        assert_eq!(Piece::from_code("rPP"), None);
    }

    #[test]
    fn conversion_flips_side_and_keeps_kind() {
        let piece = Piece::new(Side::Second, PieceKind::Horse);
        assert_eq!(piece.converted(), Piece::new(Side::First, PieceKind::Horse));
        assert_eq!(piece.converted().converted(), piece);
    }

    #[test]
    fn side_parses_from_config_strings() {
        assert_eq!("first".parse::<Side>(), Ok(Side::First));
        assert_eq!("SECOND".parse::<Side>(), Ok(Side::Second));
    }
}
