//! Building games from PGN movetext.
//!
//! The factory folds tokenized entries ply by ply: each move is resolved
//! against the current state, annotations amend the move before them, and a
//! variation is folded from the state its owning move was played from.

use crate::{FactoryConfig, Game, GameState, Move, MoveError, Variation};
use chess_core::{Color, FenError};
use chess_pgn::{MovetextEntry, PgnError, SanMove, Tokenizer};
use thiserror::Error;

/// Errors produced while building a game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    #[error("PGN error: {0}")]
    Pgn(#[from] PgnError),

    #[error("invalid starting position: {0}")]
    Fen(#[from] FenError),

    #[error("move {number} ({color}) {san}: {source}")]
    Move {
        number: u32,
        color: Color,
        san: String,
        #[source]
        source: MoveError,
    },

    #[error("{0} has no preceding move to annotate")]
    DanglingAnnotation(&'static str),

    #[error("variations nested deeper than {0}")]
    VariationTooDeep(usize),
}

/// Folds movetext entries into [`Game`] values.
#[derive(Debug, Clone, Default)]
pub struct GameFactory {
    config: FactoryConfig,
}

impl GameFactory {
    pub fn new(config: FactoryConfig) -> Self {
        GameFactory { config }
    }

    #[inline]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// The configured starting position, or the standard one.
    pub fn initial_state(&self) -> Result<GameState, FactoryError> {
        match &self.config.initial_fen {
            Some(fen) => Ok(GameState::from_fen(fen)?),
            None => Ok(GameState::initial()),
        }
    }

    /// Folds `entries` into a game starting at `initial`.
    pub fn fold(
        &self,
        initial: &GameState,
        entries: &[MovetextEntry],
    ) -> Result<Game, FactoryError> {
        let moves = self.fold_line(initial, entries, 0)?;
        tracing::debug!(plies = moves.len(), "folded game");
        Ok(Game::new(initial.clone(), moves))
    }

    /// Tokenizes and folds the first game in `text`.
    ///
    /// A `FEN` tag overrides the configured starting position. Tag pairs and
    /// the result are carried over to the game.
    pub fn game_from_pgn(&self, text: &str) -> Result<Game, FactoryError> {
        let pgn = Tokenizer::new(self.config.tokenizer_config()).parse(text)?;
        let initial = match pgn.tag("FEN") {
            Some(fen) => GameState::from_fen(fen)?,
            None => self.initial_state()?,
        };
        let game = self.fold(&initial, &pgn.movetext)?;
        Ok(game.with_tags(pgn.tags).with_result(pgn.result))
    }

    fn fold_line(
        &self,
        start: &GameState,
        entries: &[MovetextEntry],
        depth: usize,
    ) -> Result<Vec<Move>, FactoryError> {
        let mut moves: Vec<Move> = Vec::with_capacity(entries.len() * 2);
        let mut state = start.clone();

        for entry in entries {
            tracing::debug!(depth, ?entry, "folding entry");
            match entry {
                MovetextEntry::MovePair { white, black } => {
                    for san in [white, black] {
                        let m = play(&state, san)?;
                        state = m.state_after().clone();
                        moves.push(m);
                    }
                }
                MovetextEntry::Move(san) => {
                    let m = play(&state, san)?;
                    state = m.state_after().clone();
                    moves.push(m);
                }
                MovetextEntry::Comment(text) => {
                    let last = pop_annotated(&mut moves, "comment")?;
                    moves.push(last.with_comment(text.clone()));
                }
                MovetextEntry::Nag(nag) => {
                    let last = pop_annotated(&mut moves, "NAG")?;
                    moves.push(last.with_nag(*nag));
                }
                MovetextEntry::Variation(inner) => {
                    let max = self.config.max_variation_depth;
                    if depth + 1 > max {
                        tracing::warn!(max, "variation nesting limit exceeded");
                        return Err(FactoryError::VariationTooDeep(max));
                    }
                    let last = pop_annotated(&mut moves, "variation")?;
                    let line = self.fold_line(last.state_before(), inner, depth + 1)?;
                    tracing::debug!(depth = depth + 1, plies = line.len(), "folded variation");
                    moves.push(last.with_variation(Variation::new(line)));
                }
            }
        }

        Ok(moves)
    }
}

/// Removes the last move so an annotation can be attached to it.
fn pop_annotated(moves: &mut Vec<Move>, what: &'static str) -> Result<Move, FactoryError> {
    moves.pop().ok_or_else(|| {
        tracing::warn!(annotation = what, "annotation without a preceding move");
        FactoryError::DanglingAnnotation(what)
    })
}

/// Resolves one SAN token against `state`, attaching its inline glyph.
fn play(state: &GameState, san: &SanMove) -> Result<Move, FactoryError> {
    let resolved = match *san {
        SanMove::Castle { side, .. } => Move::castle(state, side),
        SanMove::Normal {
            piece,
            origin_file,
            origin_rank,
            target,
            promotion,
            ..
        } => Move::resolve(state, piece, origin_file, origin_rank, target, promotion),
    };

    let m = resolved.map_err(|source| {
        tracing::warn!(
            fen = %state,
            san = %san,
            error = %source,
            "cannot resolve move"
        );
        FactoryError::Move {
            number: state.fullmove_number(),
            color: state.side_to_move(),
            san: san.to_string(),
            source,
        }
    })?;

    Ok(match san.nag() {
        Some(nag) => m.with_nag(nag),
        None => m,
    })
}
