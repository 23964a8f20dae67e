//! SAN move tokens.
//!
//! A [`SanMove`] is the syntactic content of one move token. It is not
//! checked against any position; resolving it to a legal move is the rules
//! engine's job.

use crate::PgnError;
use chess_core::{CastleSide, File, PieceKind, Rank, Square};
use std::fmt;
use std::str::FromStr;

/// Move suffix glyphs and their NAG codes.
const GLYPHS: [(&str, u8); 6] = [
    ("!", 1),
    ("?", 2),
    ("!!", 3),
    ("??", 4),
    ("!?", 5),
    ("?!", 6),
];

/// One move as written in SAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanMove {
    Castle {
        side: CastleSide,
        nag: Option<u8>,
    },
    Normal {
        piece: PieceKind,
        origin_file: Option<File>,
        origin_rank: Option<Rank>,
        target: Square,
        promotion: Option<PieceKind>,
        capture: bool,
        nag: Option<u8>,
    },
}

impl SanMove {
    /// Parses a move token such as `Nbd7`, `exd6`, `e8=Q+`, `O-O-O` or `Qh5!?`.
    ///
    /// Check and mate markers are accepted and dropped. A trailing glyph
    /// (`!`, `?`, `!!`, `??`, `!?`, `?!`) becomes the move's NAG.
    pub fn parse(token: &str) -> Result<Self, PgnError> {
        let invalid = || PgnError::InvalidSan(token.to_string());

        let body = token.trim_end_matches(['!', '?']);
        let glyph = &token[body.len()..];
        let nag = if glyph.is_empty() {
            None
        } else {
            let code = GLYPHS
                .iter()
                .find(|(text, _)| *text == glyph)
                .map(|(_, code)| *code)
                .ok_or_else(invalid)?;
            Some(code)
        };

        let body = body.trim_end_matches(['+', '#']);
        match body {
            "O-O" | "0-0" => {
                return Ok(SanMove::Castle {
                    side: CastleSide::Kingside,
                    nag,
                })
            }
            "O-O-O" | "0-0-0" => {
                return Ok(SanMove::Castle {
                    side: CastleSide::Queenside,
                    nag,
                })
            }
            _ => {}
        }

        let chars: Vec<char> = body.chars().collect();
        let Some(&first) = chars.first() else {
            return Err(invalid());
        };

        // Piece letter
        let (piece, mut rest) = if first.is_ascii_uppercase() {
            (PieceKind::from_letter(first).ok_or_else(invalid)?, &chars[1..])
        } else {
            (PieceKind::Pawn, &chars[..])
        };

        // Promotion, with or without '='
        let mut promotion = None;
        if let Some(&last) = rest.last() {
            if last.is_ascii_uppercase() {
                let kind = PieceKind::from_letter(last).ok_or_else(invalid)?;
                if piece != PieceKind::Pawn || !PieceKind::PROMOTIONS.contains(&kind) {
                    return Err(invalid());
                }
                promotion = Some(kind);
                rest = &rest[..rest.len() - 1];
                if rest.last() == Some(&'=') {
                    rest = &rest[..rest.len() - 1];
                }
            }
        }

        // Destination is the last two characters
        if rest.len() < 2 {
            return Err(invalid());
        }
        let (prefix, dest) = rest.split_at(rest.len() - 2);
        let target = match (File::from_char(dest[0]), Rank::from_char(dest[1])) {
            (Some(file), Some(rank)) => Square::new(file, rank),
            _ => return Err(invalid()),
        };

        // Capture marker, then up to two disambiguation characters
        let (prefix, capture) = match prefix.split_last() {
            Some((&'x', before)) => (before, true),
            _ => (prefix, false),
        };
        let (origin_file, origin_rank) = match prefix {
            [] => (None, None),
            [c] => match (File::from_char(*c), Rank::from_char(*c)) {
                (Some(file), _) if c.is_ascii_lowercase() => (Some(file), None),
                (_, Some(rank)) => (None, Some(rank)),
                _ => return Err(invalid()),
            },
            [f, r] if f.is_ascii_lowercase() => {
                match (File::from_char(*f), Rank::from_char(*r)) {
                    (Some(file), Some(rank)) => (Some(file), Some(rank)),
                    _ => return Err(invalid()),
                }
            }
            _ => return Err(invalid()),
        };

        Ok(SanMove::Normal {
            piece,
            origin_file,
            origin_rank,
            target,
            promotion,
            capture,
            nag,
        })
    }

    /// The NAG implied by an inline glyph, if any.
    pub fn nag(&self) -> Option<u8> {
        match self {
            SanMove::Castle { nag, .. } | SanMove::Normal { nag, .. } => *nag,
        }
    }
}

impl FromStr for SanMove {
    type Err = PgnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SanMove {
    /// The move as written, without check markers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nag = match *self {
            SanMove::Castle { side, nag } => {
                write!(f, "{}", side.san())?;
                nag
            }
            SanMove::Normal {
                piece,
                origin_file,
                origin_rank,
                target,
                promotion,
                capture,
                nag,
            } => {
                if piece != PieceKind::Pawn {
                    write!(f, "{}", piece.letter())?;
                }
                if let Some(file) = origin_file {
                    write!(f, "{}", file.to_char())?;
                }
                if let Some(rank) = origin_rank {
                    write!(f, "{}", rank.to_char())?;
                }
                if capture {
                    write!(f, "x")?;
                }
                write!(f, "{}", target)?;
                if let Some(kind) = promotion {
                    write!(f, "={}", kind.letter())?;
                }
                nag
            }
        };
        if let Some(glyph) = nag.and_then(|code| GLYPHS.iter().find(|(_, c)| *c == code)) {
            write!(f, "{}", glyph.0)?;
        }
        Ok(())
    }
}
