//! Offset tables and per-piece attack tests.

use crate::Board;
use chess_core::{Color, Piece, PieceKind, Square};

/// Knight jumps as (row, column) deltas.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// One-step king moves as (row, column) deltas.
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Ray directions for a sliding piece; empty for everything else.
pub fn slider_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Queen => &KING_OFFSETS,
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
    }
}

/// Squares reached by applying each offset once.
pub fn leaps(from: Square, offsets: &'static [(i8, i8)]) -> impl Iterator<Item = Square> {
    offsets
        .iter()
        .filter_map(move |&(d_row, d_col)| from.offset(d_row, d_col))
}

/// Squares a knight on `from` attacks.
#[inline]
pub fn knight_attacks(from: Square) -> impl Iterator<Item = Square> {
    leaps(from, &KNIGHT_OFFSETS)
}

/// Squares a king on `from` attacks. Castling and check detection reuse this.
#[inline]
pub fn king_attacks(from: Square) -> impl Iterator<Item = Square> {
    leaps(from, &KING_OFFSETS)
}

/// The two forward diagonals a pawn of `color` on `from` attacks.
pub fn pawn_attacks(from: Square, color: Color) -> impl Iterator<Item = Square> {
    let dir = color.pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(move |d_col| from.offset(dir, d_col))
}

/// Returns true if a slider on `from` moving along `directions` reaches
/// `target` before running into any occupied square.
pub fn slides_to(board: &Board, from: Square, target: Square, directions: &[(i8, i8)]) -> bool {
    let d_row = target.row() as i8 - from.row() as i8;
    let d_col = target.col() as i8 - from.col() as i8;
    if (d_row, d_col) == (0, 0) {
        return false;
    }
    if d_row != 0 && d_col != 0 && d_row.abs() != d_col.abs() {
        return false;
    }

    let step = (d_row.signum(), d_col.signum());
    if !directions.contains(&step) {
        return false;
    }

    let mut current = from;
    while let Some(next) = current.offset(step.0, step.1) {
        if next == target {
            return true;
        }
        if board.get_piece(next).is_some() {
            return false;
        }
        current = next;
    }
    false
}

/// Returns true if `piece` attacks `target` on `board`.
pub fn attacks(board: &Board, piece: &Piece, target: Square) -> bool {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(piece.square, piece.color).any(|sq| sq == target),
        PieceKind::Knight => knight_attacks(piece.square).any(|sq| sq == target),
        PieceKind::King => king_attacks(piece.square).any(|sq| sq == target),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            slides_to(board, piece.square, target, slider_directions(piece.kind))
        }
    }
}
