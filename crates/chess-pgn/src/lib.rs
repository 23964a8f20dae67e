//! PGN tokenizer.
//!
//! Turns PGN text into tag pairs, a result and a tree of
//! [`MovetextEntry`] values. Moves are kept as written ([`SanMove`]); nothing
//! here knows the rules of chess.
//!
//! ```
//! use chess_pgn::{parse_game, MovetextEntry};
//!
//! let game = parse_game("[Event \"Casual\"]\n\n1. e4 e5 {solid} 2. Nf3 *").unwrap();
//! assert_eq!(game.tag("Event"), Some("Casual"));
//! assert!(matches!(game.movetext[0], MovetextEntry::MovePair { .. }));
//! ```

mod error;
mod lexer;
mod parser;
mod san;

pub use error::PgnError;
pub use parser::{parse_game, GameResult, MovetextEntry, PgnGame, Tokenizer, TokenizerConfig};
pub use san::SanMove;
