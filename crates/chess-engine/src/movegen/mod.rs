//! Piece geometry.
//!
//! Potential moves are the squares a piece's movement pattern reaches on the
//! current board, before the board filters out friendly-occupied squares,
//! blocked pawn advances and moves that leave the king in check. Nothing in
//! here mutates the board or looks at whose turn it is.

mod attacks;

use crate::Board;
use chess_core::{Piece, PieceKind, Square};

pub use attacks::{
    attacks, king_attacks, knight_attacks, pawn_attacks, slider_directions, slides_to,
    BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};

/// Returns the potential moves of `piece` on `board`.
///
/// Sliders include the first occupied square of every ray, whatever its
/// color, so captures can be recognized later. Pawns emit their advance
/// squares and both capture diagonals unconditionally; occupancy rules and
/// en passant are applied by the board.
pub fn potential_moves(board: &Board, piece: &Piece) -> Vec<Square> {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(piece),
        PieceKind::Knight => knight_attacks(piece.square).collect(),
        PieceKind::King => king_attacks(piece.square).collect(),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            sliding_moves(board, piece.square, slider_directions(piece.kind))
        }
    }
}

fn pawn_moves(piece: &Piece) -> Vec<Square> {
    let dir = piece.color.pawn_direction();
    let mut moves = Vec::with_capacity(4);

    if let Some(single) = piece.square.offset(dir, 0) {
        moves.push(single);
        if piece.square.row() == piece.color.pawn_row() {
            if let Some(double) = piece.square.offset(2 * dir, 0) {
                moves.push(double);
            }
        }
    }
    moves.extend(pawn_attacks(piece.square, piece.color));
    moves
}

fn sliding_moves(board: &Board, from: Square, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut moves = Vec::new();
    for &(d_row, d_col) in directions {
        let mut current = from;
        while let Some(next) = current.offset(d_row, d_col) {
            moves.push(next);
            if board.get_piece(next).is_some() {
                break;
            }
            current = next;
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn moves_from(board: &Board, name: &str) -> Vec<Square> {
        let piece = *board.get_piece(sq(name)).unwrap();
        potential_moves(board, &piece)
    }

    #[test]
    fn pawn_on_start_row_has_double_advance() {
        let board = Board::standard();
        let moves = moves_from(&board, "e2");
        assert_eq!(moves, vec![sq("e3"), sq("e4"), sq("d3"), sq("f3")]);
    }

    #[test]
    fn black_pawn_moves_down() {
        let board = Board::standard();
        let moves = moves_from(&board, "a7");
        assert_eq!(moves, vec![sq("a6"), sq("a5"), sq("b6")]);
    }

    #[test]
    fn pawn_geometry_ignores_blockers() {
        let board = Board::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        let moves = moves_from(&board, "e2");
        assert!(moves.contains(&sq("e3")));
        assert!(moves.contains(&sq("e4")));
    }

    #[test]
    fn moved_pawn_has_no_double_advance() {
        let board = Board::from_fen("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1").unwrap();
        let moves = moves_from(&board, "e3");
        assert_eq!(moves, vec![sq("e4"), sq("d4"), sq("f4")]);
    }

    #[test]
    fn knight_in_start_position() {
        let board = Board::standard();
        let moves = moves_from(&board, "g1");
        assert_eq!(moves.len(), 3);
        assert!(moves.contains(&sq("f3")));
        assert!(moves.contains(&sq("h3")));
        assert!(moves.contains(&sq("e2")));
    }

    #[test]
    fn rook_rays_include_first_blocker_of_either_color() {
        let board = Board::from_fen("4k3/8/8/3p4/8/8/3R1P2/4K3 w - - 0 1").unwrap();
        let moves = moves_from(&board, "d2");
        assert!(moves.contains(&sq("d5")));
        assert!(!moves.contains(&sq("d6")));
        assert!(moves.contains(&sq("e2")));
        assert!(moves.contains(&sq("f2")));
        assert!(!moves.contains(&sq("g2")));
        assert!(moves.contains(&sq("d1")));
        assert!(moves.contains(&sq("a2")));
        assert_eq!(moves.len(), 9);
    }

    #[test]
    fn bishop_blocked_in_start_position() {
        let board = Board::standard();
        let moves = moves_from(&board, "c1");
        assert_eq!(moves, vec![sq("d2"), sq("b2")]);
    }

    #[test]
    fn queen_on_empty_board() {
        let board = Board::from_fen("k7/8/8/8/3Q4/8/8/7K w - - 0 1").unwrap();
        let piece = *board.get_piece(sq("d4")).unwrap();
        assert_eq!(piece.color, Color::White);
        assert_eq!(potential_moves(&board, &piece).len(), 27);
    }
}
