//! Chess piece representation.

use crate::Color;
use thiserror::Error;

/// Error returned for a character that is not a FEN piece letter.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid FEN piece letter '{0}'")]
pub struct PieceError(pub char);

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// Kinds a pawn may promote to, in generation order.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Returns the index of this kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Uppercase letter used in SAN and for White in FEN.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parses an uppercase SAN piece letter.
    pub const fn from_letter(c: char) -> Option<Self> {
        match c {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// The content of a square: either empty or a piece of one kind and color.
///
/// A kind without a color (or the reverse) cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(Option<(PieceKind, Color)>);

/// FEN letters for every piece value, empty square included.
const FEN_TABLE: [(Piece, char); 13] = [
    (Piece::EMPTY, ' '),
    (Piece::WHITE_PAWN, 'P'),
    (Piece::WHITE_KNIGHT, 'N'),
    (Piece::WHITE_BISHOP, 'B'),
    (Piece::WHITE_ROOK, 'R'),
    (Piece::WHITE_QUEEN, 'Q'),
    (Piece::WHITE_KING, 'K'),
    (Piece::BLACK_PAWN, 'p'),
    (Piece::BLACK_KNIGHT, 'n'),
    (Piece::BLACK_BISHOP, 'b'),
    (Piece::BLACK_ROOK, 'r'),
    (Piece::BLACK_QUEEN, 'q'),
    (Piece::BLACK_KING, 'k'),
];

impl Piece {
    pub const EMPTY: Piece = Piece(None);
    pub const WHITE_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::White);
    pub const WHITE_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::White);
    pub const WHITE_BISHOP: Piece = Piece::new(PieceKind::Bishop, Color::White);
    pub const WHITE_ROOK: Piece = Piece::new(PieceKind::Rook, Color::White);
    pub const WHITE_QUEEN: Piece = Piece::new(PieceKind::Queen, Color::White);
    pub const WHITE_KING: Piece = Piece::new(PieceKind::King, Color::White);
    pub const BLACK_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::Black);
    pub const BLACK_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::Black);
    pub const BLACK_BISHOP: Piece = Piece::new(PieceKind::Bishop, Color::Black);
    pub const BLACK_ROOK: Piece = Piece::new(PieceKind::Rook, Color::Black);
    pub const BLACK_QUEEN: Piece = Piece::new(PieceKind::Queen, Color::Black);
    pub const BLACK_KING: Piece = Piece::new(PieceKind::King, Color::Black);

    /// Creates an occupied piece value.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece(Some((kind, color)))
    }

    /// Returns true for the empty value.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0.is_none()
    }

    /// Returns the kind, or `None` for an empty square.
    #[inline]
    pub const fn kind(self) -> Option<PieceKind> {
        match self.0 {
            Some((kind, _)) => Some(kind),
            None => None,
        }
    }

    /// Returns the color, or `None` for an empty square.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self.0 {
            Some((_, color)) => Some(color),
            None => None,
        }
    }

    /// Returns true if this is a piece of the given color.
    #[inline]
    pub fn is_color(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    /// Returns true if this is the given kind, of any color.
    #[inline]
    pub fn is_kind(self, kind: PieceKind) -> bool {
        self.kind() == Some(kind)
    }

    /// Dense index over the twelve occupied values (White 0-5, Black 6-11).
    #[inline]
    pub const fn index(self) -> Option<usize> {
        match self.0 {
            Some((kind, color)) => Some(color.index() * 6 + kind.index()),
            None => None,
        }
    }

    /// Returns the FEN letter; a space for the empty value.
    pub fn to_fen_char(self) -> char {
        FEN_TABLE
            .iter()
            .find(|(piece, _)| *piece == self)
            .map(|(_, c)| *c)
            .unwrap_or(' ')
    }

    /// Parses a FEN letter; a space yields the empty value.
    pub fn from_fen_char(c: char) -> Result<Self, PieceError> {
        FEN_TABLE
            .iter()
            .find(|(_, letter)| *letter == c)
            .map(|(piece, _)| *piece)
            .ok_or(PieceError(c))
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some((kind, color)) => write!(f, "{} {}", color, kind),
            None => write!(f, "Empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_to_fen() {
        assert_eq!(Piece::WHITE_PAWN.to_fen_char(), 'P');
        assert_eq!(Piece::BLACK_PAWN.to_fen_char(), 'p');
        assert_eq!(Piece::WHITE_KING.to_fen_char(), 'K');
        assert_eq!(Piece::BLACK_KNIGHT.to_fen_char(), 'n');
        assert_eq!(Piece::EMPTY.to_fen_char(), ' ');
    }

    #[test]
    fn piece_from_fen() {
        assert_eq!(Piece::from_fen_char('P'), Ok(Piece::WHITE_PAWN));
        assert_eq!(Piece::from_fen_char('p'), Ok(Piece::BLACK_PAWN));
        assert_eq!(Piece::from_fen_char('K'), Ok(Piece::WHITE_KING));
        assert_eq!(Piece::from_fen_char(' '), Ok(Piece::EMPTY));
        assert_eq!(Piece::from_fen_char('x'), Err(PieceError('x')));
    }

    #[test]
    fn fen_table_is_a_bijection() {
        for (piece, letter) in FEN_TABLE {
            assert_eq!(piece.to_fen_char(), letter);
            assert_eq!(Piece::from_fen_char(letter), Ok(piece));
        }
        let mut letters: Vec<char> = FEN_TABLE.iter().map(|(_, c)| *c).collect();
        letters.sort_unstable();
        letters.dedup();
        assert_eq!(letters.len(), 13);
    }

    #[test]
    fn empty_has_neither_kind_nor_color() {
        assert!(Piece::EMPTY.is_empty());
        assert_eq!(Piece::EMPTY.kind(), None);
        assert_eq!(Piece::EMPTY.color(), None);
        assert_eq!(Piece::EMPTY.index(), None);
        assert_eq!(Piece::default(), Piece::EMPTY);
    }

    #[test]
    fn piece_index_is_dense() {
        let mut seen = [false; 12];
        for color in [Color::White, Color::Black] {
            for kind in [
                PieceKind::Pawn,
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Rook,
                PieceKind::Queen,
                PieceKind::King,
            ] {
                let idx = Piece::new(kind, color).index().unwrap();
                assert!(!seen[idx]);
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn san_letters() {
        assert_eq!(PieceKind::Knight.letter(), 'N');
        assert_eq!(PieceKind::from_letter('Q'), Some(PieceKind::Queen));
        assert_eq!(PieceKind::from_letter('q'), None);
    }
}
