//! Chess position state.

use crate::movegen::{self, Candidate};
use crate::{Board, Move, SquareSet};
use chess_core::{CastlingRights, Color, Fen, FenError, Piece, Square};
use std::fmt;
use std::str::FromStr;

/// Complete, immutable chess position.
///
/// Every transition produces a new value; see [`Move`]. All move generation
/// and legality checks live here.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl GameState {
    /// Assembles a state from its parts.
    pub fn new(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        GameState {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        }
    }

    /// The standard starting position.
    pub fn initial() -> Self {
        Self::from_fen(Fen::STARTPOS).expect("STARTPOS is valid")
    }

    /// Parses a position from FEN.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = Fen::parse(fen)?;
        Ok(GameState {
            board: Board::new(parsed.placement),
            side_to_move: parsed.side_to_move,
            castling: parsed.castling,
            en_passant: parsed.en_passant,
            halfmove_clock: parsed.halfmove_clock,
            fullmove_number: parsed.fullmove_number,
        })
    }

    /// Serializes the position to FEN.
    pub fn to_fen(&self) -> String {
        Fen {
            placement: self.board.to_array(),
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the content of a square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.board.piece_at(sq)
    }

    /// Squares holding the given piece.
    #[inline]
    pub fn pieces(&self, piece: Piece) -> SquareSet {
        self.board.squares_of(piece)
    }

    /// Generates moves for the side to move.
    ///
    /// With `disregard_checks` the pseudo-legal set is returned: moves that
    /// leave the mover's king capturable are kept. Otherwise only legal moves
    /// are returned, and none at all once the halfmove clock has reached
    /// its limit.
    pub fn generate_moves(&self, disregard_checks: bool) -> Vec<Move> {
        if disregard_checks {
            return self.build_moves(movegen::pseudo_moves(self, true));
        }
        if self.halfmove_clock >= Fen::MAX_HALFMOVE_CLOCK {
            return Vec::new();
        }
        self.unclocked_legal_moves()
    }

    /// All legal moves for the side to move.
    #[inline]
    pub fn legal_moves(&self) -> Vec<Move> {
        self.generate_moves(false)
    }

    fn unclocked_legal_moves(&self) -> Vec<Move> {
        self.build_moves(movegen::pseudo_moves(self, true))
            .into_iter()
            .filter(|m| !m.state_after().can_king_be_captured())
            .collect()
    }

    fn build_moves(&self, candidates: Vec<Candidate>) -> Vec<Move> {
        candidates
            .into_iter()
            .map(|c| Move::from_candidate(self, c))
            .collect()
    }

    /// Returns true if the side to move could capture the opponent's king.
    ///
    /// Evaluated on the state after a move, this is true exactly when that
    /// move left its own king en prise.
    pub fn can_king_be_captured(&self) -> bool {
        match self.board.king_square(self.side_to_move.opposite()) {
            Some(king) => self.can_square_be_captured(king),
            None => false,
        }
    }

    /// Returns true if any pseudo-legal move of the side to move lands on `sq`.
    pub fn can_square_be_captured(&self, sq: Square) -> bool {
        movegen::pseudo_moves(self, false)
            .iter()
            .any(|c| c.to == sq)
    }

    /// The same position with the other side to move.
    fn with_side_flipped(&self) -> GameState {
        GameState {
            side_to_move: self.side_to_move.opposite(),
            ..self.clone()
        }
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.with_side_flipped().can_king_be_captured()
    }

    /// Returns true if the side to move is checkmated.
    pub fn is_mate(&self) -> bool {
        self.is_check() && self.unclocked_legal_moves().is_empty()
    }

    /// Returns true if the side to move has no legal move but is not in check.
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.unclocked_legal_moves().is_empty()
    }

    /// Returns true if the halfmove clock has run out and the side to move
    /// is not mated. No further moves are generated in that case.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= Fen::MAX_HALFMOVE_CLOCK && !self.is_mate()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

impl FromStr for GameState {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameState({})", self.to_fen())
    }
}
