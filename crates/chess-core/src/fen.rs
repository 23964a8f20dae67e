//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{CastleRight, CastlingRights, Color, Piece, Rank, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid piece placement: zero-length empty run in rank {0}")]
    ZeroEmptyRun(u8),

    #[error("invalid piece placement: adjacent empty-run digits in rank {0}")]
    AdjacentEmptyRuns(u8),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Parsed FEN record.
///
/// Every field is validated and typed; the rules crate turns this into a
/// position with move generation on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Square contents in board index order (a8 first).
    pub placement: [Piece; 64],
    /// The side to move.
    pub side_to_move: Color,
    /// Castling availability.
    pub castling: CastlingRights,
    /// En passant target square.
    pub en_passant: Option<Square>,
    /// Plies since the last pawn move or capture.
    pub halfmove_clock: u32,
    /// Fullmove number.
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Largest accepted halfmove clock; play stops once it is reached.
    pub const MAX_HALFMOVE_CLOCK: u32 = 50;

    /// Parses a FEN string. Fields are separated by single spaces.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split(' ').collect();

        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_piece_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
        if halfmove_clock > Self::MAX_HALFMOVE_CLOCK {
            return Err(FenError::InvalidHalfmoveClock(format!(
                "{} exceeds {}",
                halfmove_clock,
                Self::MAX_HALFMOVE_CLOCK
            )));
        }

        let fullmove_number = parts[5]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_piece_placement(placement: &str) -> Result<[Piece; 64], FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut squares = Vec::with_capacity(64);
        for (i, rank) in ranks.iter().enumerate() {
            let rank_start = squares.len();
            let rank_number = 8 - i as u8;
            let mut after_digit = false;
            for c in rank.chars() {
                if let Some(blanks) = c.to_digit(10) {
                    if blanks == 0 {
                        return Err(FenError::ZeroEmptyRun(rank_number));
                    }
                    if after_digit {
                        return Err(FenError::AdjacentEmptyRuns(rank_number));
                    }
                    after_digit = true;
                    squares.extend(std::iter::repeat(Piece::EMPTY).take(blanks as usize));
                } else {
                    after_digit = false;
                    match Piece::from_fen_char(c) {
                        Ok(piece) if !piece.is_empty() => squares.push(piece),
                        _ => {
                            return Err(FenError::InvalidPiecePlacement(format!(
                                "invalid character '{}' in rank {}",
                                c,
                                8 - i
                            )))
                        }
                    }
                }
            }
            let width = squares.len() - rank_start;
            if width != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - i,
                    width
                )));
            }
        }

        let mut board = [Piece::EMPTY; 64];
        board.copy_from_slice(&squares);
        Ok(board)
    }

    fn parse_castling(castling: &str) -> Result<CastlingRights, FenError> {
        if castling == "-" {
            return Ok(CastlingRights::NONE);
        }
        if castling.is_empty() {
            return Err(FenError::InvalidCastlingRights("empty field".to_string()));
        }

        let mut rights = CastlingRights::NONE;
        for c in castling.chars() {
            let right = CastleRight::from_fen_char(c).ok_or_else(|| {
                FenError::InvalidCastlingRights(format!("invalid character '{}'", c))
            })?;
            if rights.contains(right) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "duplicate character '{}'",
                    c
                )));
            }
            rights = rights.with(right);
        }

        Ok(rights)
    }

    fn parse_en_passant(ep: &str) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        let square = Square::from_algebraic(ep)
            .map_err(|_| FenError::InvalidEnPassantSquare(ep.to_string()))?;
        if square.rank() != Rank::R3 && square.rank() != Rank::R6 {
            return Err(FenError::InvalidEnPassantSquare(ep.to_string()));
        }

        Ok(Some(square))
    }

    /// Piece placement field for the given squares.
    pub fn placement_string(placement: &[Piece; 64]) -> String {
        let mut fen = String::new();
        for (row, rank) in placement.chunks(8).enumerate() {
            let mut empty_count = 0;
            for piece in rank {
                if piece.is_empty() {
                    empty_count += 1;
                } else {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_fen_char());
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            Self::placement_string(&self.placement),
            self.side_to_move.fen_char(),
            self.castling,
            self.en_passant
                .map(|sq| sq.to_algebraic())
                .unwrap_or_else(|| "-".to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for Fen {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::File;

    #[test]
    fn parse_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, CastlingRights::ALL);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.placement[Square::A8.index()], Piece::BLACK_ROOK);
        assert_eq!(fen.placement[Square::E1.index()], Piece::WHITE_KING);
    }

    #[test]
    fn parse_custom_position() {
        let fen =
            Fen::parse("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3").unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.halfmove_clock, 2);
        assert_eq!(fen.fullmove_number, 3);
        let f3 = Square::new(File::F, Rank::R3);
        assert_eq!(fen.placement[f3.index()], Piece::WHITE_KNIGHT);
    }

    #[test]
    fn roundtrip() {
        let text = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = Fen::parse(text).unwrap();
        assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn invalid_part_count() {
        assert_eq!(Fen::parse("invalid"), Err(FenError::InvalidPartCount(1)));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0"),
            Err(FenError::InvalidPartCount(5))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 1 extra"),
            Err(FenError::InvalidPartCount(7))
        ));
    }

    #[test]
    fn invalid_active_color() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_piece_placement_rank_count() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8 w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_piece_placement_invalid_char() {
        assert!(matches!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_piece_placement_wrong_squares() {
        assert!(matches!(
            Fen::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("9/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn zero_empty_run_is_rejected() {
        assert_eq!(
            Fen::parse("4k3/08/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::ZeroEmptyRun(7))
        );
        assert_eq!(
            Fen::parse("4k3/8/8/8/8/8/8/4K2R0 w - - 0 1"),
            Err(FenError::ZeroEmptyRun(1))
        );
    }

    #[test]
    fn adjacent_empty_runs_are_rejected() {
        assert_eq!(
            Fen::parse("4k3/44/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::AdjacentEmptyRuns(7))
        );
        assert_eq!(
            Fen::parse("4k3/8/8/8/8/8/8/4K12 w - - 0 1"),
            Err(FenError::AdjacentEmptyRuns(1))
        );
        assert!(Fen::parse("4k3/1p1p1p1p/8/8/8/8/8/4K3 w - - 0 1").is_ok());
    }

    #[test]
    fn invalid_castling_rights() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
    }

    #[test]
    fn duplicate_castling_rights() {
        let err = Fen::parse("8/8/8/8/8/8/8/8 w KKq - 0 1").unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn invalid_en_passant() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - abc 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - x3 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn invalid_halfmove_clock() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - -1 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 51 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(Fen::parse("8/8/8/8/8/8/8/8 w - - 50 1").is_ok());
    }

    #[test]
    fn invalid_fullmove_number() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 xyz"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
        assert!(Fen::parse("8/8/8/8/8/8/8/8 w - - 0 0").is_ok());
    }

    #[test]
    fn fen_default() {
        let fen = Fen::default();
        assert_eq!(fen.to_string(), Fen::STARTPOS);
    }

    #[test]
    fn fen_en_passant_rank_6() {
        let fen = Fen::parse("8/8/8/8/8/8/8/8 b - d6 0 1").unwrap();
        assert_eq!(fen.en_passant, Some(Square::new(File::D, Rank::R6)));
    }

    #[test]
    fn fen_partial_castling() {
        let fen = Fen::parse("8/8/8/8/8/8/8/8 w Kq - 0 1").unwrap();
        assert_eq!(fen.castling.to_string(), "Kq");
    }

    #[test]
    fn fen_error_display() {
        let err = FenError::InvalidPartCount(3);
        assert!(format!("{}", err).contains("3"));

        let err = FenError::InvalidActiveColor("x".to_string());
        assert!(format!("{}", err).contains("x"));

        let err = FenError::InvalidHalfmoveClock("abc".to_string());
        assert!(format!("{}", err).contains("abc"));
    }
}
