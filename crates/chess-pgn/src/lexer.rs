//! PGN lexer.

use crate::{GameResult, PgnError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    TagOpen,
    TagClose,
    String(String),
    Symbol(String),
    MoveNumber { number: u32, black: bool },
    Comment(String),
    Nag(u8),
    VariationOpen,
    VariationClose,
    Result(GameResult),
}

impl Token {
    /// Short description used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::TagOpen => "'['".to_string(),
            Token::TagClose => "']'".to_string(),
            Token::String(s) => format!("string \"{}\"", s),
            Token::Symbol(s) => format!("'{}'", s),
            Token::MoveNumber { number, black } => {
                format!("move number {}{}", number, if *black { "..." } else { "." })
            }
            Token::Comment(_) => "comment".to_string(),
            Token::Nag(n) => format!("${}", n),
            Token::VariationOpen => "'('".to_string(),
            Token::VariationClose => "')'".to_string(),
            Token::Result(r) => format!("result {}", r),
        }
    }
}

#[inline]
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '#' | '=' | ':' | '-' | '/' | '!' | '?')
}

/// Splits PGN text into tokens.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, PgnError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut line_start = true;

    while let Some((offset, c)) = chars.next() {
        match c {
            '\n' => {
                line_start = true;
                continue;
            }
            c if c.is_whitespace() => {
                line_start = false;
                continue;
            }
            // Escape line, only recognised in the first column
            '%' if line_start => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            '[' => tokens.push(Token::TagOpen),
            ']' => tokens.push(Token::TagClose),
            '(' => tokens.push(Token::VariationOpen),
            ')' => tokens.push(Token::VariationClose),
            '*' => tokens.push(Token::Result(GameResult::Ongoing)),
            '"' => {
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        c => value.push(c),
                    }
                }
                if !closed {
                    return Err(PgnError::UnterminatedString(offset));
                }
                tokens.push(Token::String(value));
            }
            '{' => {
                let mut comment = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    comment.push(c);
                }
                if !closed {
                    return Err(PgnError::UnterminatedComment(offset));
                }
                tokens.push(Token::Comment(comment.trim().to_string()));
            }
            ';' => {
                let mut comment = String::new();
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        line_start = true;
                        break;
                    }
                    comment.push(c);
                }
                tokens.push(Token::Comment(comment.trim().to_string()));
                continue;
            }
            // Dots detached from their move number, as in "1. ... e5"
            '.' => {
                let mut dots = 1;
                while let Some(&(_, '.')) = chars.peek() {
                    dots += 1;
                    chars.next();
                }
                match tokens.last_mut() {
                    Some(Token::MoveNumber { black, .. }) if !*black => *black = dots >= 3,
                    _ => return Err(PgnError::UnexpectedChar { ch: '.', offset }),
                }
            }
            '$' => {
                let mut digits = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let nag = digits
                    .parse::<u8>()
                    .map_err(|_| PgnError::InvalidNag(format!("${}", digits)))?;
                tokens.push(Token::Nag(nag));
            }
            c if is_symbol_char(c) => {
                let mut symbol = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if !is_symbol_char(next) {
                        break;
                    }
                    symbol.push(next);
                    chars.next();
                }
                tokens.push(classify_symbol(symbol, &mut chars));
            }
            ch => return Err(PgnError::UnexpectedChar { ch, offset }),
        }
        line_start = false;
    }

    Ok(tokens)
}

/// Turns a raw symbol into a result, a move number or a move symbol.
fn classify_symbol(
    symbol: String,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Token {
    if let Some(result) = GameResult::from_token(&symbol) {
        return Token::Result(result);
    }
    if symbol.bytes().all(|b| b.is_ascii_digit()) {
        let mut dots = 0;
        while let Some(&(_, '.')) = chars.peek() {
            dots += 1;
            chars.next();
        }
        if let Ok(number) = symbol.parse::<u32>() {
            return Token::MoveNumber {
                number,
                black: dots >= 3,
            };
        }
    }
    Token::Symbol(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_pair() {
        assert_eq!(
            tokenize(r#"[Event "Test \"Match\""]"#).unwrap(),
            vec![
                Token::TagOpen,
                Token::Symbol("Event".to_string()),
                Token::String("Test \"Match\"".to_string()),
                Token::TagClose,
            ]
        );
    }

    #[test]
    fn move_numbers_and_moves() {
        assert_eq!(
            tokenize("1. e4 e5 2.Nf3 2... Nc6").unwrap(),
            vec![
                Token::MoveNumber {
                    number: 1,
                    black: false
                },
                Token::Symbol("e4".to_string()),
                Token::Symbol("e5".to_string()),
                Token::MoveNumber {
                    number: 2,
                    black: false
                },
                Token::Symbol("Nf3".to_string()),
                Token::MoveNumber {
                    number: 2,
                    black: true
                },
                Token::Symbol("Nc6".to_string()),
            ]
        );
    }

    #[test]
    fn comments_nags_and_variations() {
        assert_eq!(
            tokenize("e4 { best by test } $1 (d4) ; rest of line\n*").unwrap(),
            vec![
                Token::Symbol("e4".to_string()),
                Token::Comment("best by test".to_string()),
                Token::Nag(1),
                Token::VariationOpen,
                Token::Symbol("d4".to_string()),
                Token::VariationClose,
                Token::Comment("rest of line".to_string()),
                Token::Result(GameResult::Ongoing),
            ]
        );
    }

    #[test]
    fn results() {
        assert_eq!(
            tokenize("1-0 0-1 1/2-1/2").unwrap(),
            vec![
                Token::Result(GameResult::WhiteWins),
                Token::Result(GameResult::BlackWins),
                Token::Result(GameResult::Draw),
            ]
        );
    }

    #[test]
    fn escape_lines_are_skipped() {
        assert_eq!(
            tokenize("% generated\ne4").unwrap(),
            vec![Token::Symbol("e4".to_string())]
        );
    }

    #[test]
    fn escape_needs_first_column() {
        assert_eq!(
            tokenize("e4\n % not an escape"),
            Err(PgnError::UnexpectedChar { ch: '%', offset: 4 })
        );
    }

    #[test]
    fn detached_black_move_number() {
        assert_eq!(
            tokenize("1. ... e5").unwrap(),
            vec![
                Token::MoveNumber {
                    number: 1,
                    black: true
                },
                Token::Symbol("e5".to_string()),
            ]
        );
        assert_eq!(
            tokenize("e4 . e5"),
            Err(PgnError::UnexpectedChar { ch: '.', offset: 3 })
        );
    }

    #[test]
    fn errors() {
        assert_eq!(
            tokenize("e4 {never closed"),
            Err(PgnError::UnterminatedComment(3))
        );
        assert_eq!(tokenize("[Event \"x"), Err(PgnError::UnterminatedString(7)));
        assert_eq!(tokenize("$300"), Err(PgnError::InvalidNag("$300".to_string())));
        assert_eq!(tokenize("$"), Err(PgnError::InvalidNag("$".to_string())));
        assert_eq!(
            tokenize("e4 & e5"),
            Err(PgnError::UnexpectedChar { ch: '&', offset: 3 })
        );
    }
}
