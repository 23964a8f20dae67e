//! Castling rights.

use crate::{Color, Square};
use std::fmt;

/// The wing a king castles towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// SAN text for a castle to this side.
    pub const fn san(self) -> &'static str {
        match self {
            CastleSide::Kingside => "O-O",
            CastleSide::Queenside => "O-O-O",
        }
    }
}

/// One of the four castling rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastleRight {
    WhiteKingside = 0b0001,
    WhiteQueenside = 0b0010,
    BlackKingside = 0b0100,
    BlackQueenside = 0b1000,
}

impl CastleRight {
    /// All rights in FEN order (`KQkq`).
    pub const ALL: [CastleRight; 4] = [
        CastleRight::WhiteKingside,
        CastleRight::WhiteQueenside,
        CastleRight::BlackKingside,
        CastleRight::BlackQueenside,
    ];

    /// The right for the given color and side.
    pub const fn new(color: Color, side: CastleSide) -> Self {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => CastleRight::WhiteKingside,
            (Color::White, CastleSide::Queenside) => CastleRight::WhiteQueenside,
            (Color::Black, CastleSide::Kingside) => CastleRight::BlackKingside,
            (Color::Black, CastleSide::Queenside) => CastleRight::BlackQueenside,
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        self as u8
    }

    pub const fn color(self) -> Color {
        match self {
            CastleRight::WhiteKingside | CastleRight::WhiteQueenside => Color::White,
            CastleRight::BlackKingside | CastleRight::BlackQueenside => Color::Black,
        }
    }

    pub const fn side(self) -> CastleSide {
        match self {
            CastleRight::WhiteKingside | CastleRight::BlackKingside => CastleSide::Kingside,
            CastleRight::WhiteQueenside | CastleRight::BlackQueenside => CastleSide::Queenside,
        }
    }

    /// FEN letter for this right.
    pub const fn fen_char(self) -> char {
        match self {
            CastleRight::WhiteKingside => 'K',
            CastleRight::WhiteQueenside => 'Q',
            CastleRight::BlackKingside => 'k',
            CastleRight::BlackQueenside => 'q',
        }
    }

    /// Parses a FEN castling letter.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        match c {
            'K' => Some(CastleRight::WhiteKingside),
            'Q' => Some(CastleRight::WhiteQueenside),
            'k' => Some(CastleRight::BlackKingside),
            'q' => Some(CastleRight::BlackQueenside),
            _ => None,
        }
    }

    pub const fn king_origin(self) -> Square {
        match self.color() {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        }
    }

    pub const fn king_destination(self) -> Square {
        match self {
            CastleRight::WhiteKingside => Square::G1,
            CastleRight::WhiteQueenside => Square::C1,
            CastleRight::BlackKingside => Square::G8,
            CastleRight::BlackQueenside => Square::C8,
        }
    }

    /// The rook's home square, which this right depends on.
    pub const fn rook_origin(self) -> Square {
        match self {
            CastleRight::WhiteKingside => Square::H1,
            CastleRight::WhiteQueenside => Square::A1,
            CastleRight::BlackKingside => Square::H8,
            CastleRight::BlackQueenside => Square::A8,
        }
    }

    /// Where the rook lands; also the square the king passes over.
    pub const fn rook_destination(self) -> Square {
        match self {
            CastleRight::WhiteKingside => Square::F1,
            CastleRight::WhiteQueenside => Square::D1,
            CastleRight::BlackKingside => Square::F8,
            CastleRight::BlackQueenside => Square::D8,
        }
    }

    /// The b-file square the rook crosses on a queenside castle.
    pub const fn fly_over(self) -> Option<Square> {
        match self {
            CastleRight::WhiteQueenside => Some(Square::B1),
            CastleRight::BlackQueenside => Some(Square::B8),
            _ => None,
        }
    }

    /// The right that is lost when a rook leaves or is captured on `sq`.
    pub fn for_rook_home(sq: Square) -> Option<Self> {
        Self::ALL.into_iter().find(|right| right.rook_origin() == sq)
    }
}

/// Set of held castling rights.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Returns true if the right is held.
    #[inline]
    pub const fn contains(self, right: CastleRight) -> bool {
        self.0 & right.bit() != 0
    }

    /// Returns the set with `right` added.
    #[inline]
    pub const fn with(self, right: CastleRight) -> Self {
        CastlingRights(self.0 | right.bit())
    }

    /// Returns the set with `right` removed.
    #[inline]
    pub const fn without(self, right: CastleRight) -> Self {
        CastlingRights(self.0 & !right.bit())
    }

    /// Returns the set with both rights of `color` removed.
    pub const fn without_color(self, color: Color) -> Self {
        self.without(CastleRight::new(color, CastleSide::Kingside))
            .without(CastleRight::new(color, CastleSide::Queenside))
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Held rights in FEN order.
    pub fn iter(self) -> impl Iterator<Item = CastleRight> {
        CastleRight::ALL
            .into_iter()
            .filter(move |right| self.contains(*right))
    }

    /// Held rights of one color, kingside first.
    pub fn for_color(self, color: Color) -> impl Iterator<Item = CastleRight> {
        self.iter().filter(move |right| right.color() == color)
    }
}

impl FromIterator<CastleRight> for CastlingRights {
    fn from_iter<I: IntoIterator<Item = CastleRight>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CastlingRights::NONE, |rights, right| rights.with(right))
    }
}

impl fmt::Display for CastlingRights {
    /// FEN castling field: `-` or the held letters in `KQkq` order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for right in self.iter() {
            write!(f, "{}", right.fen_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastlingRights({})", self)
    }
}
