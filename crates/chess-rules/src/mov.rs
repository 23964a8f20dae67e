//! Moves as state transitions.
//!
//! A [`Move`] owns both the state it was played from and the state it
//! produces. Check and mate flags and the SAN disambiguation are derived
//! lazily and cached.

use crate::movegen::{Candidate, MoveFlag};
use crate::{Board, GameState, Variation};
use chess_core::{CastleRight, CastleSide, Color, File, Piece, PieceKind, Rank, Square};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors produced when a move request cannot be matched to a legal move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("illegal move {0}")]
    Illegal(String),

    #[error("ambiguous move {request}: {candidates} legal moves match")]
    Ambiguous { request: String, candidates: usize },
}

#[derive(Debug, Clone, Copy)]
struct CheckFlags {
    check: bool,
    mate: bool,
}

#[derive(Debug, Clone, Copy)]
struct Disambiguation {
    file: bool,
    rank: bool,
}

/// A move together with the states before and after it.
#[derive(Clone)]
pub struct Move {
    origin: Square,
    destination: Square,
    piece: Piece,
    promotion: Option<PieceKind>,
    castle: Option<CastleRight>,
    is_capture: bool,
    is_en_passant: bool,
    state_before: GameState,
    state_after: GameState,
    nags: Vec<u8>,
    comment: Option<String>,
    variations: Vec<Variation>,
    check_flags: OnceLock<CheckFlags>,
    disambiguation: OnceLock<Disambiguation>,
}

impl Move {
    /// Builds the move described by a generated candidate.
    pub(crate) fn from_candidate(state: &GameState, candidate: Candidate) -> Move {
        match candidate.flag {
            MoveFlag::Castle(right) => Move::castling(state, right),
            MoveFlag::Promotion(kind) => {
                Move::normal(state, candidate.from, candidate.to, Some(kind))
            }
            MoveFlag::Normal => Move::normal(state, candidate.from, candidate.to, None),
        }
    }

    /// Applies a relocation of the piece on `from` to `to`.
    fn normal(
        state: &GameState,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Move {
        let us = state.side_to_move();
        let piece = state.piece_at(from);
        let is_pawn = piece.is_kind(PieceKind::Pawn);
        let is_en_passant =
            is_pawn && state.en_passant() == Some(to) && from.file() != to.file();
        let is_capture = is_en_passant || !state.piece_at(to).is_empty();

        let mut squares = state.board().to_array();
        squares[from.index()] = Piece::EMPTY;
        squares[to.index()] = promotion.map_or(piece, |kind| Piece::new(kind, us));
        if is_en_passant {
            if let Some(passed) = to.offset(-us.pawn_direction(), 0) {
                squares[passed.index()] = Piece::EMPTY;
            }
        }

        let mut castling = state.castling();
        if piece.is_kind(PieceKind::King) {
            castling = castling.without_color(us);
        }
        for sq in [from, to] {
            if let Some(right) = CastleRight::for_rook_home(sq) {
                castling = castling.without(right);
            }
        }

        let en_passant = if is_pawn && from.rank_number().abs_diff(to.rank_number()) == 2 {
            from.offset(us.pawn_direction(), 0)
        } else {
            None
        };

        let halfmove_clock = if is_pawn || is_capture {
            0
        } else {
            state.halfmove_clock() + 1
        };

        let state_after = GameState::new(
            Board::new(squares),
            us.opposite(),
            castling,
            en_passant,
            halfmove_clock,
            next_fullmove(state),
        );

        Move::assemble(
            state,
            state_after,
            from,
            to,
            piece,
            promotion,
            None,
            is_capture,
            is_en_passant,
        )
    }

    /// Applies a castle: king and rook both relocate.
    fn castling(state: &GameState, right: CastleRight) -> Move {
        let us = state.side_to_move();
        let king = Piece::new(PieceKind::King, us);

        let mut squares = state.board().to_array();
        squares[right.king_origin().index()] = Piece::EMPTY;
        squares[right.rook_origin().index()] = Piece::EMPTY;
        squares[right.king_destination().index()] = king;
        squares[right.rook_destination().index()] = Piece::new(PieceKind::Rook, us);

        let state_after = GameState::new(
            Board::new(squares),
            us.opposite(),
            state.castling().without_color(us),
            None,
            state.halfmove_clock() + 1,
            next_fullmove(state),
        );

        Move::assemble(
            state,
            state_after,
            right.king_origin(),
            right.king_destination(),
            king,
            None,
            Some(right),
            false,
            false,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        state_before: &GameState,
        state_after: GameState,
        origin: Square,
        destination: Square,
        piece: Piece,
        promotion: Option<PieceKind>,
        castle: Option<CastleRight>,
        is_capture: bool,
        is_en_passant: bool,
    ) -> Move {
        Move {
            origin,
            destination,
            piece,
            promotion,
            castle,
            is_capture,
            is_en_passant,
            state_before: state_before.clone(),
            state_after,
            nags: Vec::new(),
            comment: None,
            variations: Vec::new(),
            check_flags: OnceLock::new(),
            disambiguation: OnceLock::new(),
        }
    }

    /// Resolves a partial description to the unique legal move it denotes.
    ///
    /// The candidates are the legal moves of `state` whose moving piece is
    /// `kind`, which land on `destination`, which carry `promotion`, and
    /// whose origin agrees with the file and rank hints when given.
    pub fn resolve(
        state: &GameState,
        kind: PieceKind,
        origin_file: Option<File>,
        origin_rank: Option<Rank>,
        destination: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, MoveError> {
        let matches: Vec<Move> = state
            .legal_moves()
            .into_iter()
            .filter(|m| {
                m.piece.is_kind(kind)
                    && m.castle.is_none()
                    && m.destination == destination
                    && m.promotion == promotion
                    && origin_file.map_or(true, |f| m.origin.file() == f)
                    && origin_rank.map_or(true, |r| m.origin.rank() == r)
            })
            .collect();

        let describe = || {
            let mut request = String::new();
            if kind != PieceKind::Pawn {
                request.push(kind.letter());
            }
            if let Some(file) = origin_file {
                request.push(file.to_char());
            }
            if let Some(rank) = origin_rank {
                request.push(rank.to_char());
            }
            request.push_str(&destination.to_algebraic());
            if let Some(promo) = promotion {
                request.push('=');
                request.push(promo.letter());
            }
            request
        };

        tracing::trace!(
            request = %describe(),
            candidates = matches.len(),
            "resolving move"
        );

        let mut matches = matches.into_iter();
        match (matches.next(), matches.len()) {
            (Some(m), 0) => Ok(m),
            (None, _) => Err(MoveError::Illegal(describe())),
            (Some(_), rest) => Err(MoveError::Ambiguous {
                request: describe(),
                candidates: rest + 1,
            }),
        }
    }

    /// Resolves a castle to the given side for the side to move.
    pub fn castle(state: &GameState, side: CastleSide) -> Result<Move, MoveError> {
        let right = CastleRight::new(state.side_to_move(), side);
        state
            .legal_moves()
            .into_iter()
            .find(|m| m.castle == Some(right))
            .ok_or_else(|| MoveError::Illegal(side.san().to_string()))
    }

    /// Resolves a move given by its origin and destination squares.
    ///
    /// A king moving two files from its home square is taken as a castle.
    pub fn from_squares(
        state: &GameState,
        origin: Square,
        destination: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, MoveError> {
        state
            .legal_moves()
            .into_iter()
            .find(|m| {
                m.origin == origin && m.destination == destination && m.promotion == promotion
            })
            .ok_or_else(|| {
                MoveError::Illegal(format!(
                    "{}{}",
                    origin.to_algebraic(),
                    destination.to_algebraic()
                ))
            })
    }

    #[inline]
    pub fn origin(&self) -> Square {
        self.origin
    }

    #[inline]
    pub fn destination(&self) -> Square {
        self.destination
    }

    /// The piece that moves (the king, for a castle).
    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// The color of the side making the move.
    #[inline]
    pub fn color(&self) -> Color {
        self.state_before.side_to_move()
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// The castling right exercised, if this is a castle.
    #[inline]
    pub fn castle_right(&self) -> Option<CastleRight> {
        self.castle
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.castle.is_some()
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.is_capture
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.is_en_passant
    }

    #[inline]
    pub fn state_before(&self) -> &GameState {
        &self.state_before
    }

    #[inline]
    pub fn state_after(&self) -> &GameState {
        &self.state_after
    }

    /// The full move number this move is played in.
    #[inline]
    pub fn move_number(&self) -> u32 {
        self.state_before.fullmove_number()
    }

    fn check_flags(&self) -> CheckFlags {
        *self.check_flags.get_or_init(|| {
            let check = self.state_after.is_check();
            CheckFlags {
                check,
                mate: check && self.state_after.is_mate(),
            }
        })
    }

    /// Returns true if the move gives check.
    pub fn is_check(&self) -> bool {
        self.check_flags().check
    }

    /// Returns true if the move gives checkmate.
    pub fn is_mate(&self) -> bool {
        self.check_flags().mate
    }

    fn disambiguation(&self) -> Disambiguation {
        *self.disambiguation.get_or_init(|| {
            let rivals: Vec<Square> = self
                .state_before
                .legal_moves()
                .iter()
                .filter(|m| {
                    m.castle.is_none()
                        && m.piece == self.piece
                        && m.destination == self.destination
                        && m.promotion == self.promotion
                })
                .map(|m| m.origin)
                .collect();

            if rivals.len() <= 1 {
                return Disambiguation {
                    file: false,
                    rank: false,
                };
            }
            let same_file = rivals
                .iter()
                .filter(|sq| sq.file() == self.origin.file())
                .count();
            Disambiguation {
                file: same_file < rivals.len(),
                rank: same_file > 1,
            }
        })
    }

    /// Standard algebraic notation, including `+` or `#`.
    pub fn san(&self) -> String {
        let mut san = String::new();

        if let Some(right) = self.castle {
            san.push_str(right.side().san());
        } else {
            let kind = self.piece.kind().unwrap_or(PieceKind::Pawn);
            let disambiguation = self.disambiguation();
            if kind != PieceKind::Pawn {
                san.push(kind.letter());
            }
            if disambiguation.file || (kind == PieceKind::Pawn && self.is_capture) {
                san.push(self.origin.file().to_char());
            }
            if disambiguation.rank {
                san.push(self.origin.rank().to_char());
            }
            if self.is_capture {
                san.push('x');
            }
            san.push_str(&self.destination.to_algebraic());
            if let Some(promo) = self.promotion {
                san.push('=');
                san.push(promo.letter());
            }
        }

        if self.is_mate() {
            san.push('#');
        } else if self.is_check() {
            san.push('+');
        }
        san
    }

    /// Long algebraic notation (e.g. "e2e4", "e7e8q").
    pub fn to_uci(&self) -> String {
        let mut uci = format!(
            "{}{}",
            self.origin.to_algebraic(),
            self.destination.to_algebraic()
        );
        if let Some(promo) = self.promotion {
            uci.push(promo.letter().to_ascii_lowercase());
        }
        uci
    }

    /// Numeric annotation glyphs attached to this move, in order.
    #[inline]
    pub fn nags(&self) -> &[u8] {
        &self.nags
    }

    #[inline]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    #[inline]
    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// Returns the move with a NAG appended.
    pub fn with_nag(mut self, nag: u8) -> Self {
        self.nags.push(nag);
        self
    }

    /// Returns the move with a comment attached. A second comment is
    /// appended to the first, separated by a space.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = Some(match self.comment.take() {
            Some(existing) => format!("{} {}", existing, comment),
            None => comment,
        });
        self
    }

    /// Returns the move with an alternative line attached.
    ///
    /// The variation replaces this move: its first move is played from this
    /// move's [`Move::state_before`].
    pub fn with_variation(mut self, variation: Variation) -> Self {
        self.variations.push(variation);
        self
    }
}

fn next_fullmove(state: &GameState) -> u32 {
    match state.side_to_move() {
        Color::White => state.fullmove_number(),
        Color::Black => state.fullmove_number() + 1,
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
            && self.destination == other.destination
            && self.piece == other.piece
            && self.promotion == other.promotion
            && self.castle == other.castle
            && self.state_before == other.state_before
            && self.nags == other.nags
            && self.comment == other.comment
            && self.variations == other.variations
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    /// Numbered SAN: "12. Nf3" for White, "12... Nf6" for Black.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color() {
            Color::White => write!(f, "{}. {}", self.move_number(), self.san()),
            Color::Black => write!(f, "{}... {}", self.move_number(), self.san()),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Move")
            .field("uci", &self.to_uci())
            .field("piece", &self.piece)
            .field("before", &self.state_before.to_fen())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn state(fen: &str) -> GameState {
        GameState::from_fen(fen).unwrap()
    }

    fn play(state: &GameState, from: &str, to: &str) -> Move {
        Move::from_squares(state, sq(from), sq(to), None).unwrap()
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let m = play(&GameState::initial(), "e2", "e4");
        assert_eq!(
            m.state_after().to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(m.san(), "e4");
        assert_eq!(m.to_string(), "1. e4");
    }

    #[test]
    fn en_passant_capture_removes_pawn() {
        let s = state("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let m = play(&s, "e5", "d6");
        assert!(m.is_en_passant());
        assert!(m.is_capture());
        assert_eq!(m.state_after().piece_at(sq("d5")), Piece::EMPTY);
        assert_eq!(m.state_after().piece_at(sq("d6")), Piece::WHITE_PAWN);
        assert_eq!(m.state_after().en_passant(), None);
        assert_eq!(m.san(), "exd6");
    }

    #[test]
    fn halfmove_clock_bookkeeping() {
        let s = state("4k3/8/8/8/8/8/4P3/R3K3 w Q - 7 10");
        let rook = play(&s, "a1", "a5");
        assert_eq!(rook.state_after().halfmove_clock(), 8);
        assert_eq!(rook.state_after().fullmove_number(), 10);
        assert!(rook.state_after().castling().is_empty());

        let pawn = play(&s, "e2", "e3");
        assert_eq!(pawn.state_after().halfmove_clock(), 0);
    }

    #[test]
    fn fullmove_increments_after_black() {
        let s = state("4k3/8/8/8/8/8/8/4K3 b - - 0 5");
        let m = play(&s, "e8", "e7");
        assert_eq!(m.state_after().fullmove_number(), 6);
        assert_eq!(m.to_string(), "5... Ke7");
    }

    #[test]
    fn capturing_home_rook_clears_right() {
        let s = state("r3k3/8/8/8/8/8/8/R3K3 w Qq - 0 1");
        let m = play(&s, "a1", "a8");
        assert!(m.is_capture());
        assert!(m.state_after().castling().is_empty());
        assert_eq!(m.san(), "Rxa8+");
    }

    #[test]
    fn kingside_castle() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 1");
        let m = Move::castle(&s, CastleSide::Kingside).unwrap();
        let after = m.state_after();
        assert_eq!(after.piece_at(Square::G1), Piece::WHITE_KING);
        assert_eq!(after.piece_at(Square::F1), Piece::WHITE_ROOK);
        assert_eq!(after.piece_at(Square::H1), Piece::EMPTY);
        assert_eq!(after.castling().to_string(), "kq");
        assert_eq!(after.halfmove_clock(), 4);
        assert_eq!(m.san(), "O-O");
        assert!(m.is_castle());
    }

    #[test]
    fn queenside_castle_by_squares() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        let m = play(&s, "e8", "c8");
        assert_eq!(m.castle_right(), Some(CastleRight::BlackQueenside));
        assert_eq!(m.state_after().piece_at(Square::D8), Piece::BLACK_ROOK);
        assert_eq!(m.to_string(), "1... O-O-O");
    }

    #[test]
    fn castle_unavailable_is_illegal() {
        let s = state("4k3/8/8/8/8/8/8/4K2R w - - 0 1");
        assert_eq!(
            Move::castle(&s, CastleSide::Kingside),
            Err(MoveError::Illegal("O-O".to_string()))
        );
    }

    #[test]
    fn promotion() {
        let s = state("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let m = Move::resolve(&s, PieceKind::Pawn, None, None, sq("a8"), Some(PieceKind::Queen))
            .unwrap();
        assert_eq!(m.state_after().piece_at(sq("a8")), Piece::WHITE_QUEEN);
        assert_eq!(m.san(), "a8=Q+");
        assert_eq!(m.to_uci(), "a7a8q");
    }

    #[test]
    fn promotion_kind_is_required_to_match() {
        let s = state("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert!(matches!(
            Move::resolve(&s, PieceKind::Pawn, None, None, sq("a8"), None),
            Err(MoveError::Illegal(_))
        ));
    }

    #[test]
    fn resolve_reports_ambiguity() {
        let s = state("4k3/8/8/8/R6R/8/8/4K3 w - - 0 1");
        let err = Move::resolve(&s, PieceKind::Rook, None, None, sq("d4"), None).unwrap_err();
        assert_eq!(
            err,
            MoveError::Ambiguous {
                request: "Rd4".to_string(),
                candidates: 2,
            }
        );
    }

    #[test]
    fn rook_file_disambiguation() {
        let s = state("4k3/8/8/8/8/8/8/R4RK1 w - - 0 1");
        let m = Move::resolve(&s, PieceKind::Rook, Some(File::A), None, sq("d1"), None).unwrap();
        assert_eq!(m.san(), "Rad1");
    }

    #[test]
    fn knight_rank_disambiguation() {
        let s = state("4k3/8/8/1N6/8/1N6/8/4K3 w - - 0 1");
        let m = Move::resolve(&s, PieceKind::Knight, None, Some(Rank::R5), sq("d4"), None)
            .unwrap();
        assert_eq!(m.san(), "N5d4");
    }

    #[test]
    fn full_square_disambiguation() {
        // Queens on a1, a3 and c1 all reach b2.
        let s = state("4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1");
        let m = Move::resolve(
            &s,
            PieceKind::Queen,
            Some(File::A),
            Some(Rank::R1),
            sq("b2"),
            None,
        )
        .unwrap();
        assert_eq!(m.san(), "Qa1b2");
    }

    #[test]
    fn pinned_piece_needs_no_disambiguation() {
        // The c3 knight is pinned by the a5 bishop, so only g1 can reach e2.
        let s = state("4k3/8/8/b7/8/2N5/8/4K1N1 w - - 0 1");
        let m = Move::resolve(&s, PieceKind::Knight, None, None, sq("e2"), None).unwrap();
        assert_eq!(m.origin(), Square::G1);
        assert_eq!(m.san(), "Ne2");
    }

    #[test]
    fn pawn_capture_names_origin_file() {
        let s = state("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        let m = play(&s, "e4", "d5");
        assert_eq!(m.san(), "exd5");
    }

    #[test]
    fn annotations_accumulate() {
        let m = play(&GameState::initial(), "e2", "e4")
            .with_comment("best by test")
            .with_comment("again")
            .with_nag(1)
            .with_nag(14);
        assert_eq!(m.comment(), Some("best by test again"));
        assert_eq!(m.nags(), &[1, 14]);
        assert!(m.variations().is_empty());
    }

    #[test]
    fn equality_ignores_cached_flags() {
        let a = play(&GameState::initial(), "g1", "f3");
        let b = play(&GameState::initial(), "g1", "f3");
        let _ = a.san();
        assert_eq!(a, b);
        assert_ne!(a, play(&GameState::initial(), "b1", "c3"));
    }

    #[test]
    fn illegal_square_move() {
        assert!(Move::from_squares(&GameState::initial(), sq("e2"), sq("e5"), None).is_err());
    }
}
