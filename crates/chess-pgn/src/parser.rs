//! Recursive-descent parser from tokens to movetext entries.

use crate::lexer::{self, Token};
use crate::{PgnError, SanMove};
use std::fmt;
use std::iter::Peekable;
use std::vec::IntoIter;

/// Game termination marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// Game in progress, abandoned, or result unknown (`*`).
    Ongoing,
}

impl GameResult {
    /// Parses a PGN result token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            "*" => Some(GameResult::Ongoing),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Ongoing => "*",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One element of PGN movetext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovetextEntry {
    /// A White move directly followed by Black's reply.
    MovePair { white: SanMove, black: SanMove },
    /// A move standing alone: after an interruption, or the last of a line.
    Move(SanMove),
    Comment(String),
    Nag(u8),
    /// An alternative line for the preceding move.
    Variation(Vec<MovetextEntry>),
}

/// A tokenized PGN game.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PgnGame {
    /// Tag pairs in the order they appear.
    pub tags: Vec<(String, String)>,
    pub movetext: Vec<MovetextEntry>,
    pub result: Option<GameResult>,
}

impl PgnGame {
    /// Looks up a tag value by name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Tokenizer limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Deepest allowed nesting of variations.
    pub max_depth: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig { max_depth: 32 }
    }
}

/// Parses the first game in `text` with default limits.
pub fn parse_game(text: &str) -> Result<PgnGame, PgnError> {
    Tokenizer::new(TokenizerConfig::default()).parse(text)
}

/// PGN tokenizer producing tag pairs and structured movetext.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Tokenizer { config }
    }

    /// Parses the first game in `text`. Anything after its result is ignored.
    pub fn parse(&self, text: &str) -> Result<PgnGame, PgnError> {
        let tokens = lexer::tokenize(text)?;
        tracing::trace!(tokens = tokens.len(), "tokenized PGN text");

        let mut parser = Parser {
            tokens: tokens.into_iter().peekable(),
            max_depth: self.config.max_depth,
            result: None,
        };
        let tags = parser.tags()?;
        let movetext = parser.sequence(0)?;

        Ok(PgnGame {
            tags,
            movetext,
            result: parser.result,
        })
    }
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    max_depth: usize,
    result: Option<GameResult>,
}

impl Parser {
    fn tags(&mut self) -> Result<Vec<(String, String)>, PgnError> {
        let mut tags = Vec::new();
        while self.tokens.peek() == Some(&Token::TagOpen) {
            self.tokens.next();
            let name = match self.tokens.next() {
                Some(Token::Symbol(name)) => name,
                other => return Err(PgnError::InvalidTag(describe(other.as_ref()))),
            };
            let value = match self.tokens.next() {
                Some(Token::String(value)) => value,
                other => {
                    return Err(PgnError::InvalidTag(format!(
                        "{} followed by {}",
                        name,
                        describe(other.as_ref())
                    )))
                }
            };
            match self.tokens.next() {
                Some(Token::TagClose) => tags.push((name, value)),
                other => {
                    return Err(PgnError::InvalidTag(format!(
                        "{} not closed, found {}",
                        name,
                        describe(other.as_ref())
                    )))
                }
            }
        }
        Ok(tags)
    }

    /// Parses entries until the end of the current line.
    ///
    /// At depth 0 the line ends at a result token or the end of input; in a
    /// variation it ends at the closing parenthesis.
    fn sequence(&mut self, depth: usize) -> Result<Vec<MovetextEntry>, PgnError> {
        let mut entries = Vec::new();
        let mut pending_white: Option<SanMove> = None;
        let mut expect_white = false;

        let flush = |entries: &mut Vec<MovetextEntry>, pending: &mut Option<SanMove>| {
            if let Some(white) = pending.take() {
                entries.push(MovetextEntry::Move(white));
            }
        };

        loop {
            let Some(token) = self.tokens.next() else {
                if depth > 0 {
                    return Err(PgnError::UnterminatedVariation);
                }
                break;
            };

            match token {
                Token::MoveNumber { black, .. } => {
                    flush(&mut entries, &mut pending_white);
                    expect_white = !black;
                }
                Token::Symbol(symbol) => {
                    let san = SanMove::parse(&symbol)?;
                    if let Some(white) = pending_white.take() {
                        entries.push(MovetextEntry::MovePair { white, black: san });
                    } else if expect_white {
                        pending_white = Some(san);
                    } else {
                        entries.push(MovetextEntry::Move(san));
                    }
                    expect_white = false;
                }
                Token::Comment(text) => {
                    flush(&mut entries, &mut pending_white);
                    entries.push(MovetextEntry::Comment(text));
                }
                Token::Nag(nag) => {
                    flush(&mut entries, &mut pending_white);
                    entries.push(MovetextEntry::Nag(nag));
                }
                Token::VariationOpen => {
                    flush(&mut entries, &mut pending_white);
                    if depth + 1 > self.max_depth {
                        return Err(PgnError::NestingTooDeep(self.max_depth));
                    }
                    let inner = self.sequence(depth + 1)?;
                    entries.push(MovetextEntry::Variation(inner));
                }
                Token::VariationClose if depth > 0 => break,
                Token::Result(result) if depth == 0 => {
                    self.result = Some(result);
                    break;
                }
                other => return Err(PgnError::UnexpectedToken(other.describe())),
            }
        }

        flush(&mut entries, &mut pending_white);
        Ok(entries)
    }
}

fn describe(token: Option<&Token>) -> String {
    token.map_or_else(|| "end of input".to_string(), Token::describe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn san(s: &str) -> SanMove {
        SanMove::parse(s).unwrap()
    }

    #[test]
    fn pairs_and_singles() {
        let game = parse_game("1. e4 e5 2. Nf3 {develops} 2... Nc6 3. Bb5 *").unwrap();
        assert_eq!(
            game.movetext,
            vec![
                MovetextEntry::MovePair {
                    white: san("e4"),
                    black: san("e5")
                },
                MovetextEntry::Move(san("Nf3")),
                MovetextEntry::Comment("develops".to_string()),
                MovetextEntry::Move(san("Nc6")),
                MovetextEntry::Move(san("Bb5")),
            ]
        );
        assert_eq!(game.result, Some(GameResult::Ongoing));
    }

    #[test]
    fn continuation_without_number_is_single() {
        let game = parse_game("1. e4 $1 e5 2. d4").unwrap();
        assert_eq!(
            game.movetext,
            vec![
                MovetextEntry::Move(san("e4")),
                MovetextEntry::Nag(1),
                MovetextEntry::Move(san("e5")),
                MovetextEntry::Move(san("d4")),
            ]
        );
        assert_eq!(game.result, None);
    }

    #[test]
    fn nested_variations() {
        let game = parse_game("1. e4 (1. d4 d5 (1... Nf6)) 1... e5").unwrap();
        assert_eq!(
            game.movetext,
            vec![
                MovetextEntry::Move(san("e4")),
                MovetextEntry::Variation(vec![
                    MovetextEntry::MovePair {
                        white: san("d4"),
                        black: san("d5")
                    },
                    MovetextEntry::Variation(vec![MovetextEntry::Move(san("Nf6"))]),
                ]),
                MovetextEntry::Move(san("e5")),
            ]
        );
    }

    #[test]
    fn tags_are_kept_in_order() {
        let game = parse_game("[Event \"Casual\"]\n[FEN \"8/8/8/8/8/8/8/8 w - - 0 1\"]\n\n*")
            .unwrap();
        assert_eq!(game.tags.len(), 2);
        assert_eq!(game.tags[0].0, "Event");
        assert_eq!(game.tag("FEN"), Some("8/8/8/8/8/8/8/8 w - - 0 1"));
        assert_eq!(game.tag("Site"), None);
        assert!(game.movetext.is_empty());
    }

    #[test]
    fn stops_after_result() {
        let game = parse_game("1. e4 1-0 [Event \"next\"] 1. d4").unwrap();
        assert_eq!(game.movetext.len(), 1);
        assert_eq!(game.result, Some(GameResult::WhiteWins));
    }

    #[test]
    fn malformed_tag() {
        assert!(matches!(
            parse_game("[Event]"),
            Err(PgnError::InvalidTag(_))
        ));
        assert!(matches!(
            parse_game("[\"Event\" \"x\"]"),
            Err(PgnError::InvalidTag(_))
        ));
    }

    #[test]
    fn unbalanced_variations() {
        assert_eq!(
            parse_game("1. e4 (1. d4"),
            Err(PgnError::UnterminatedVariation)
        );
        assert_eq!(
            parse_game("1. e4 )"),
            Err(PgnError::UnexpectedToken("')'".to_string()))
        );
        assert_eq!(
            parse_game("1. e4 (1. d4 1-0)"),
            Err(PgnError::UnexpectedToken("result 1-0".to_string()))
        );
    }

    #[test]
    fn depth_limit() {
        let tokenizer = Tokenizer::new(TokenizerConfig { max_depth: 1 });
        assert!(tokenizer.parse("1. e4 (1. d4) *").is_ok());
        assert_eq!(
            tokenizer.parse("1. e4 (1. d4 (1. c4)) *"),
            Err(PgnError::NestingTooDeep(1))
        );
    }

    #[test]
    fn bad_move_token() {
        assert_eq!(
            parse_game("1. e4 Zz9"),
            Err(PgnError::InvalidSan("Zz9".to_string()))
        );
    }

    #[test]
    fn result_display() {
        assert_eq!(GameResult::Draw.to_string(), "1/2-1/2");
        assert_eq!(GameResult::from_token("0-1"), Some(GameResult::BlackWins));
        assert_eq!(GameResult::from_token("2-0"), None);
    }
}
