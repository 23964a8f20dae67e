//! Board representation.

use crate::SquareSet;
use chess_core::{Color, Fen, Piece, PieceKind, Square};
use std::fmt;

/// The 64 squares of a position together with a piece index.
///
/// The index maps every occupied piece value to the set of squares holding
/// it. It is derived from the squares and rebuilt whenever a board is
/// constructed; boards are never edited in place.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Piece; 64],
    index: [SquareSet; 12],
}

impl Board {
    /// Builds a board from square contents in index order (a8 first).
    pub fn new(squares: [Piece; 64]) -> Self {
        let mut index = [SquareSet::EMPTY; 12];
        for (sq, piece) in Square::all().zip(squares.iter()) {
            if let Some(idx) = piece.index() {
                index[idx].insert(sq);
            }
        }
        Board { squares, index }
    }

    /// Returns the content of a square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.squares[sq.index()]
    }

    /// Squares currently holding `piece`. Empty for [`Piece::EMPTY`].
    #[inline]
    pub fn squares_of(&self, piece: Piece) -> SquareSet {
        piece
            .index()
            .map(|idx| self.index[idx])
            .unwrap_or(SquareSet::EMPTY)
    }

    /// The square of the king of `color`, if there is one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.squares_of(Piece::new(PieceKind::King, color)).first()
    }

    /// Iterates over every (square, content) pair in index order.
    pub fn squares(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().zip(self.squares.iter().copied())
    }

    /// Copy of the raw square array, for building the next board.
    #[inline]
    pub fn to_array(&self) -> [Piece; 64] {
        self.squares
    }
}

impl fmt::Display for Board {
    /// FEN piece placement field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Fen::placement_string(&self.squares))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board({})", self)?;
        for (row, rank) in self.squares.chunks(8).enumerate() {
            write!(f, "{} ", 8 - row)?;
            for piece in rank {
                let c = if piece.is_empty() { '.' } else { piece.to_fen_char() };
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn startpos_board() -> Board {
        Board::new(Fen::default().placement)
    }

    #[test]
    fn index_matches_squares() {
        let board = startpos_board();
        for (sq, piece) in board.squares() {
            if piece.is_empty() {
                continue;
            }
            assert!(board.squares_of(piece).contains(sq));
        }
        assert_eq!(board.squares_of(Piece::WHITE_PAWN).count(), 8);
        assert_eq!(board.squares_of(Piece::BLACK_KNIGHT).count(), 2);
        assert!(board.squares_of(Piece::EMPTY).is_empty());
    }

    #[test]
    fn one_entry_per_index() {
        let board = startpos_board();
        let indices: Vec<usize> = board.squares().map(|(sq, _)| sq.index()).collect();
        assert_eq!(indices, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn king_squares() {
        let board = startpos_board();
        assert_eq!(board.king_square(Color::White), Some(Square::E1));
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(Board::new([Piece::EMPTY; 64]).king_square(Color::White), None);
    }

    #[test]
    fn display_is_fen_placement() {
        assert_eq!(
            startpos_board().to_string(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
        assert_eq!(Board::new([Piece::EMPTY; 64]).to_string(), "8/8/8/8/8/8/8/8");
    }
}
