//! Pseudo-legal move generation.
//!
//! Candidates are produced per piece kind by walking square offsets. They
//! carry only origin, destination and a flag; [`crate::Move`] turns them into
//! full transitions. Legality is decided by the caller, which simulates the
//! opponent's reply.

use crate::GameState;
use chess_core::{CastleRight, Color, Piece, PieceKind, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// How a candidate differs from a plain relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveFlag {
    Normal,
    Promotion(PieceKind),
    Castle(CastleRight),
}

/// A pseudo-legal move before its resulting state is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub from: Square,
    pub to: Square,
    pub flag: MoveFlag,
}

impl Candidate {
    #[inline]
    const fn normal(from: Square, to: Square) -> Self {
        Candidate {
            from,
            to,
            flag: MoveFlag::Normal,
        }
    }
}

/// Generates pseudo-legal candidates for the side to move.
///
/// Castles are skipped when `with_castles` is false; they never capture and
/// are irrelevant when probing which squares can be taken.
pub(crate) fn pseudo_moves(state: &GameState, with_castles: bool) -> Vec<Candidate> {
    let mut moves = Vec::with_capacity(48);
    let us = state.side_to_move();

    generate_pawn_moves(state, &mut moves);
    generate_leaper_moves(state, PieceKind::Knight, &KNIGHT_OFFSETS, &mut moves);
    generate_slider_moves(state, PieceKind::Bishop, &BISHOP_DIRECTIONS, &mut moves);
    generate_slider_moves(state, PieceKind::Rook, &ROOK_DIRECTIONS, &mut moves);
    generate_slider_moves(state, PieceKind::Queen, &BISHOP_DIRECTIONS, &mut moves);
    generate_slider_moves(state, PieceKind::Queen, &ROOK_DIRECTIONS, &mut moves);
    generate_leaper_moves(state, PieceKind::King, &KING_OFFSETS, &mut moves);
    if with_castles {
        generate_castling_moves(state, us, &mut moves);
    }

    moves
}

/// Returns true if `to` is empty or holds an enemy piece.
#[inline]
fn can_land(state: &GameState, to: Square, us: Color) -> bool {
    !state.piece_at(to).is_color(us)
}

fn push_pawn_move(from: Square, to: Square, us: Color, moves: &mut Vec<Candidate>) {
    if to.rank_number() == us.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Candidate {
                from,
                to,
                flag: MoveFlag::Promotion(kind),
            });
        }
    } else {
        moves.push(Candidate::normal(from, to));
    }
}

/// Generates pseudo-legal pawn moves.
fn generate_pawn_moves(state: &GameState, moves: &mut Vec<Candidate>) {
    let us = state.side_to_move();
    let dir = us.pawn_direction();

    for from in state.pieces(Piece::new(PieceKind::Pawn, us)) {
        // Pushes
        if let Some(one) = from.offset(dir, 0) {
            if state.piece_at(one).is_empty() {
                push_pawn_move(from, one, us, moves);

                if from.rank_number() == us.pawn_start_rank() {
                    if let Some(two) = one.offset(dir, 0) {
                        if state.piece_at(two).is_empty() {
                            moves.push(Candidate::normal(from, two));
                        }
                    }
                }
            }
        }

        // Captures, en passant included
        for side in [-1, 1] {
            let Some(to) = from.offset(dir, side) else {
                continue;
            };
            let target = state.piece_at(to);
            if target.is_color(us.opposite()) {
                push_pawn_move(from, to, us, moves);
            } else if target.is_empty() && state.en_passant() == Some(to) {
                moves.push(Candidate::normal(from, to));
            }
        }
    }
}

/// Generates moves for pieces that jump by fixed offsets (knight, king).
fn generate_leaper_moves(
    state: &GameState,
    kind: PieceKind,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Candidate>,
) {
    let us = state.side_to_move();

    for from in state.pieces(Piece::new(kind, us)) {
        for &(dr, df) in offsets {
            if let Some(to) = from.offset(dr, df) {
                if can_land(state, to, us) {
                    moves.push(Candidate::normal(from, to));
                }
            }
        }
    }
}

/// Generates moves for pieces that slide until blocked.
fn generate_slider_moves(
    state: &GameState,
    kind: PieceKind,
    directions: &[(i8, i8)],
    moves: &mut Vec<Candidate>,
) {
    let us = state.side_to_move();

    for from in state.pieces(Piece::new(kind, us)) {
        for &(dr, df) in directions {
            let mut current = from;
            while let Some(to) = current.offset(dr, df) {
                let target = state.piece_at(to);
                if target.is_color(us) {
                    break;
                }
                moves.push(Candidate::normal(from, to));
                if !target.is_empty() {
                    break;
                }
                current = to;
            }
        }
    }
}

/// Generates castling moves for `us`.
///
/// Requires the right, the king and rook on their home squares, empty
/// squares between them, and neither the king's square nor the square it
/// passes over under attack. The landing square is left to the legality
/// filter.
fn generate_castling_moves(state: &GameState, us: Color, moves: &mut Vec<Candidate>) {
    let rights: Vec<CastleRight> = state.castling().for_color(us).collect();
    if rights.is_empty() {
        return;
    }

    let king = Piece::new(PieceKind::King, us);
    let rook = Piece::new(PieceKind::Rook, us);
    let them = us.opposite();

    for right in rights {
        if state.piece_at(right.king_origin()) != king
            || state.piece_at(right.rook_origin()) != rook
        {
            continue;
        }

        let between = [
            Some(right.rook_destination()),
            Some(right.king_destination()),
            right.fly_over(),
        ];
        if between
            .into_iter()
            .flatten()
            .any(|sq| !state.piece_at(sq).is_empty())
        {
            continue;
        }

        if is_square_attacked(state, right.king_origin(), them)
            || is_square_attacked(state, right.rook_destination(), them)
        {
            continue;
        }

        moves.push(Candidate {
            from: right.king_origin(),
            to: right.king_destination(),
            flag: MoveFlag::Castle(right),
        });
    }
}

/// Returns true if a piece of `by` attacks `sq`, whether or not it is occupied.
pub(crate) fn is_square_attacked(state: &GameState, sq: Square, by: Color) -> bool {
    // A pawn of `by` attacks `sq` from one rank behind it.
    let back = -by.pawn_direction();
    let pawn = Piece::new(PieceKind::Pawn, by);
    if [-1, 1]
        .into_iter()
        .filter_map(|df| sq.offset(back, df))
        .any(|from| state.piece_at(from) == pawn)
    {
        return true;
    }

    let knight = Piece::new(PieceKind::Knight, by);
    if KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(dr, df)| sq.offset(dr, df))
        .any(|from| state.piece_at(from) == knight)
    {
        return true;
    }

    let king = Piece::new(PieceKind::King, by);
    if KING_OFFSETS
        .iter()
        .filter_map(|&(dr, df)| sq.offset(dr, df))
        .any(|from| state.piece_at(from) == king)
    {
        return true;
    }

    let queen = Piece::new(PieceKind::Queen, by);
    let diagonal = Piece::new(PieceKind::Bishop, by);
    let orthogonal = Piece::new(PieceKind::Rook, by);
    ray_hits(state, sq, &BISHOP_DIRECTIONS, |p| p == diagonal || p == queen)
        || ray_hits(state, sq, &ROOK_DIRECTIONS, |p| p == orthogonal || p == queen)
}

/// Returns true if the first piece along any direction from `sq` matches.
fn ray_hits(
    state: &GameState,
    sq: Square,
    directions: &[(i8, i8)],
    matches: impl Fn(Piece) -> bool,
) -> bool {
    directions.iter().any(|&(dr, df)| {
        let mut current = sq;
        while let Some(next) = current.offset(dr, df) {
            let piece = state.piece_at(next);
            if !piece.is_empty() {
                return matches(piece);
            }
            current = next;
        }
        false
    })
}
