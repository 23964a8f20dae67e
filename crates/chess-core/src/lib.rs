//! Core types for chess.
//!
//! This crate provides the leaf value types shared by the rules engine and
//! the PGN tokenizer:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`CastlingRights`] and [`CastleRight`] for castling availability
//! - FEN parsing and serialization via [`Fen`]

mod castling;
mod color;
mod fen;
mod piece;
mod square;

pub use castling::{CastleRight, CastleSide, CastlingRights};
pub use color::Color;
pub use fen::{Fen, FenError};
pub use piece::{Piece, PieceError, PieceKind};
pub use square::{File, Rank, Square, SquareError};
