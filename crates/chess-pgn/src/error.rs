use thiserror::Error;

/// Errors produced while tokenizing PGN text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PgnError {
    #[error("invalid tag pair: {0}")]
    InvalidTag(String),

    #[error("unterminated comment starting at offset {0}")]
    UnterminatedComment(usize),

    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("unterminated variation")]
    UnterminatedVariation,

    #[error("invalid SAN move '{0}'")]
    InvalidSan(String),

    #[error("invalid NAG '{0}'")]
    InvalidNag(String),

    #[error("variations nested deeper than {0}")]
    NestingTooDeep(usize),

    #[error("unexpected {0}")]
    UnexpectedToken(String),

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
}
