//! Attack detection and king-safety simulation.

use super::Board;
use crate::movegen;
use chess_core::{Color, Piece, Square};

/// A tentative move applied to a board. The three touched cells go back to
/// their saved contents when the guard drops, on every exit path.
struct Simulation<'a> {
    board: &'a mut Board,
    saved: [(Square, Option<Piece>); 3],
    touched: usize,
}

impl<'a> Simulation<'a> {
    fn apply(board: &'a mut Board, from: Square, to: Square) -> Self {
        let mover = board.get_piece(from).copied();
        let victim = mover.and_then(|mover| board.en_passant_victim(&mover, to));

        let mut saved = [(from, None); 3];
        saved[0] = (from, board.get_piece(from).copied());
        saved[1] = (to, board.get_piece(to).copied());
        let mut touched = 2;
        if let Some(victim) = victim {
            saved[2] = (victim, board.get_piece(victim).copied());
            touched = 3;
            board.set_piece(victim, None);
        }

        board.set_piece(from, None);
        board.set_piece(
            to,
            mover.map(|mover| Piece {
                has_moved: true,
                ..mover
            }),
        );

        Simulation {
            board,
            saved,
            touched,
        }
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        for &(square, piece) in self.saved[..self.touched].iter().rev() {
            self.board.set_piece(square, piece);
        }
    }
}

impl Board {
    /// Returns true if any piece of `by` attacks `square`.
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        self.pieces_of(by)
            .any(|piece| movegen::attacks(self, piece, square))
    }

    /// Returns true if `color`'s king is attacked. A board without that
    /// king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_square_attacked(king, color.opposite()))
    }

    /// Tentatively plays `from` to `to` (removing an en-passant victim when
    /// the move is one), checks whether the mover's king is safe, and puts
    /// everything back.
    ///
    /// The board is identical before and after the call.
    pub fn simulate_and_check_safety(&mut self, from: Square, to: Square) -> bool {
        let Some(color) = self.get_piece(from).map(|piece| piece.color) else {
            return false;
        };
        let simulation = Simulation::apply(self, from, to);
        !simulation.board.is_in_check(color)
    }
}
