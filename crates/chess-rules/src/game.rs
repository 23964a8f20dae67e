//! Games and variations.
//!
//! Both are ordered move sequences rendered as numbered SAN movetext. A
//! [`Variation`] hangs off the move it replaces; a [`Game`] adds the initial
//! state, PGN tag pairs and the result.

use crate::{GameState, Move};
use chess_core::Color;
use chess_pgn::GameResult;
use std::fmt;

/// Writes moves as movetext: "1. e4 e5 {comment} 2. Nf3 (2. d4) Nc6".
fn write_movetext(f: &mut fmt::Formatter<'_>, moves: &[Move]) -> fmt::Result {
    for (i, m) in moves.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        match m.color() {
            Color::White => write!(f, "{}. ", m.move_number())?,
            Color::Black if i == 0 => write!(f, "{}... ", m.move_number())?,
            Color::Black => {}
        }
        write!(f, "{}", m.san())?;

        for nag in m.nags() {
            write!(f, " ${}", nag)?;
        }
        if let Some(comment) = m.comment() {
            write!(f, " {{{}}}", comment)?;
        }
        for variation in m.variations().iter().filter(|v| !v.is_empty()) {
            write!(f, " {}", variation)?;
        }
    }
    Ok(())
}

/// An alternative continuation, replacing the move that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Variation {
    moves: Vec<Move>,
}

impl Variation {
    pub fn new(moves: Vec<Move>) -> Self {
        Variation { moves }
    }

    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl fmt::Display for Variation {
    /// Parenthesized movetext; nothing at all when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        write_movetext(f, &self.moves)?;
        write!(f, ")")
    }
}

/// A game: an initial state and the moves played from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    initial_state: GameState,
    moves: Vec<Move>,
    tags: Vec<(String, String)>,
    result: Option<GameResult>,
}

impl Game {
    /// Creates a game without tags or result.
    pub fn new(initial_state: GameState, moves: Vec<Move>) -> Self {
        Game {
            initial_state,
            moves,
            tags: Vec::new(),
            result: None,
        }
    }

    /// Returns the game with PGN tag pairs attached, in order.
    pub fn with_tags(mut self, tags: Vec<(String, String)>) -> Self {
        self.tags = tags;
        self
    }

    /// Returns the game with a result attached.
    pub fn with_result(mut self, result: Option<GameResult>) -> Self {
        self.result = result;
        self
    }

    #[inline]
    pub fn initial_state(&self) -> &GameState {
        &self.initial_state
    }

    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The state after the last move (the initial state if there is none).
    pub fn final_state(&self) -> &GameState {
        self.moves
            .last()
            .map_or(&self.initial_state, |m| m.state_after())
    }

    #[inline]
    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    /// Looks up a tag value by name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Renders the game as PGN: tag pairs, a blank line, movetext and result.
    pub fn to_pgn(&self) -> String {
        let mut pgn = String::new();
        for (name, value) in &self.tags {
            pgn.push_str(&format!("[{} \"{}\"]\n", name, escape_tag(value)));
        }
        if !self.tags.is_empty() {
            pgn.push('\n');
        }

        let movetext = self.to_string();
        let result = self.result.unwrap_or(GameResult::Ongoing);
        if movetext.is_empty() {
            pgn.push_str(&result.to_string());
        } else {
            pgn.push_str(&format!("{} {}", movetext, result));
        }
        pgn.push('\n');
        pgn
    }
}

fn escape_tag(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl fmt::Display for Game {
    /// Movetext without tags or result.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_movetext(f, &self.moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{PieceKind, Square};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn push(moves: &mut Vec<Move>, state: &GameState, kind: PieceKind, to: &str) -> GameState {
        let m = Move::resolve(state, kind, None, None, sq(to), None).unwrap();
        let next = m.state_after().clone();
        moves.push(m);
        next
    }

    #[test]
    fn numbered_movetext() {
        let start = GameState::initial();
        let mut moves = Vec::new();
        let s = push(&mut moves, &start, PieceKind::Pawn, "e4");
        let s = push(&mut moves, &s, PieceKind::Pawn, "e5");
        push(&mut moves, &s, PieceKind::Knight, "f3");

        let game = Game::new(start, moves);
        assert_eq!(game.to_string(), "1. e4 e5 2. Nf3");
        assert_eq!(game.len(), 3);
        assert_eq!(game.final_state().side_to_move(), Color::Black);
    }

    #[test]
    fn variation_opening_on_black() {
        let start = GameState::initial();
        let e4 = Move::resolve(&start, PieceKind::Pawn, None, None, sq("e4"), None).unwrap();
        let c5 =
            Move::resolve(e4.state_after(), PieceKind::Pawn, None, None, sq("c5"), None).unwrap();
        let variation = Variation::new(vec![c5]);
        assert_eq!(variation.to_string(), "(1... c5)");
        assert_eq!(Variation::default().to_string(), "");
    }

    #[test]
    fn annotations_follow_the_move() {
        let start = GameState::initial();
        let d4 = Move::resolve(&start, PieceKind::Pawn, None, None, sq("d4"), None).unwrap();
        let e4 = Move::resolve(&start, PieceKind::Pawn, None, None, sq("e4"), None)
            .unwrap()
            .with_nag(1)
            .with_comment("king pawn")
            .with_variation(Variation::new(vec![d4]))
            .with_variation(Variation::default());
        let game = Game::new(start, vec![e4]);
        assert_eq!(game.to_string(), "1. e4 $1 {king pawn} (1. d4)");
    }

    #[test]
    fn empty_game_pgn() {
        let game = Game::new(GameState::initial(), Vec::new());
        assert!(game.is_empty());
        assert_eq!(game.final_state(), game.initial_state());
        assert_eq!(game.to_pgn(), "*\n");
    }

    #[test]
    fn pgn_with_tags_and_result() {
        let start = GameState::initial();
        let e4 = Move::resolve(&start, PieceKind::Pawn, None, None, sq("e4"), None).unwrap();
        let game = Game::new(start, vec![e4])
            .with_tags(vec![
                ("Event".to_string(), "Casual \"blitz\"".to_string()),
                ("Result".to_string(), "1-0".to_string()),
            ])
            .with_result(Some(GameResult::WhiteWins));
        assert_eq!(game.tag("Result"), Some("1-0"));
        assert_eq!(game.tag("Site"), None);
        assert_eq!(
            game.to_pgn(),
            "[Event \"Casual \\\"blitz\\\"\"]\n[Result \"1-0\"]\n\n1. e4 1-0\n"
        );
    }
}
