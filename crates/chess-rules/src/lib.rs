//! Chess rules engine.
//!
//! This crate implements the legal evolution of a chess position:
//! - [`GameState`]: immutable positions with FEN parsing and serialization
//! - Legal move generation, including castling, en passant, promotion and
//!   the halfmove clock limit
//! - [`Move`]: a transition between two states, rendered in SAN
//! - [`Game`] and [`Variation`]: move sequences rendered as PGN movetext
//! - [`GameFactory`]: builds games from tokenized PGN
//!
//! # Example
//!
//! ```
//! use chess_rules::{GameFactory, GameState};
//!
//! let state = GameState::initial();
//! assert_eq!(state.legal_moves().len(), 20);
//!
//! let game = GameFactory::default()
//!     .game_from_pgn("1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7 1-0")
//!     .unwrap();
//! assert!(game.final_state().is_mate());
//! assert_eq!(game.to_string(), "1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7#");
//! ```

mod board;
mod config;
mod factory;
mod game;
mod mov;
mod movegen;
mod square_set;
mod state;

pub use board::Board;
pub use config::{ConfigError, FactoryConfig};
pub use factory::{FactoryError, GameFactory};
pub use game::{Game, Variation};
pub use mov::{Move, MoveError};
pub use square_set::{SquareSet, SquareSetIter};
pub use state::GameState;
