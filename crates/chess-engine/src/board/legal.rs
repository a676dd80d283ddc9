//! Legal move enumeration.

use super::Board;
use crate::movegen::potential_moves;
use chess_core::{CastleSide, Color, Move, Piece, PieceKind, Square};

impl Board {
    /// Returns the legal destinations of the piece on `from`.
    ///
    /// Starts from the piece's potential moves, drops friendly-occupied
    /// squares and illegal pawn moves, keeps only moves that leave the own
    /// king safe, then adds en passant and castling where available. The
    /// board is not modified; simulation runs on a scratch copy.
    pub fn legal_moves_for(&self, from: Square) -> Vec<Square> {
        let Some(piece) = self.get_piece(from).copied() else {
            return Vec::new();
        };

        let mut scratch = self.clone();
        let mut moves: Vec<Square> = potential_moves(self, &piece)
            .into_iter()
            .filter(|&to| self.occupancy_allows(&piece, to))
            .collect();
        moves.retain(|&to| scratch.simulate_and_check_safety(from, to));

        if piece.kind == PieceKind::Pawn {
            if let Some(target) = self.en_passant_destination(&piece) {
                if scratch.simulate_and_check_safety(from, target) {
                    moves.push(target);
                }
            }
        }

        if piece.kind == PieceKind::King {
            moves.extend(self.castling_destinations(piece.color));
        }

        moves
    }

    /// Occupancy rules applied on top of piece geometry.
    fn occupancy_allows(&self, piece: &Piece, to: Square) -> bool {
        let occupant = self.get_piece(to);
        if occupant.is_some_and(|other| other.color == piece.color) {
            return false;
        }
        if piece.kind != PieceKind::Pawn {
            return true;
        }

        if to.col() == piece.square.col() {
            if occupant.is_some() {
                return false;
            }
            let double = to.row().abs_diff(piece.square.row()) == 2;
            if double {
                let middle = piece.square.offset(piece.color.pawn_direction(), 0);
                if middle.is_some_and(|middle| self.get_piece(middle).is_some()) {
                    return false;
                }
            }
            true
        } else {
            occupant.is_some()
        }
    }

    /// The en-passant target square if `pawn` may capture onto it: the
    /// target lies diagonally ahead and the pawn beside it is an enemy pawn.
    fn en_passant_destination(&self, pawn: &Piece) -> Option<Square> {
        let target = self.en_passant?;
        let diagonal_ahead = target.row() as i8 - pawn.square.row() as i8
            == pawn.color.pawn_direction()
            && target.col().abs_diff(pawn.square.col()) == 1;
        if !diagonal_ahead || self.get_piece(target).is_some() {
            return None;
        }
        let victim = Square::new(pawn.square.row(), target.col())?;
        self.get_piece(victim)
            .is_some_and(|p| p.is(PieceKind::Pawn, pawn.color.opposite()))
            .then_some(target)
    }

    /// Destinations of the king for every castling move `color` may make now.
    ///
    /// Requires the right, an unmoved king and rook on their home squares,
    /// empty squares between them, and a king that is not in check and
    /// does not pass over or land on an attacked square.
    pub fn castling_destinations(&self, color: Color) -> Vec<Square> {
        let row = color.back_row();
        let Some(king_home) = Square::new(row, 4) else {
            return Vec::new();
        };
        let king_ready = self
            .get_piece(king_home)
            .is_some_and(|k| k.is(PieceKind::King, color) && !k.has_moved);
        if !king_ready {
            return Vec::new();
        }

        let enemy = color.opposite();
        let mut in_check = None;
        let mut destinations = Vec::with_capacity(2);

        for side in CastleSide::ALL {
            if !self.castling.has(color, side) {
                continue;
            }
            let rook_ready = self
                .get_piece(side.rook_home(color))
                .is_some_and(|r| r.is(PieceKind::Rook, color) && !r.has_moved);
            if !rook_ready {
                continue;
            }

            let (low, high) = match side {
                CastleSide::Kingside => (5, 6),
                CastleSide::Queenside => (1, 3),
            };
            let path_clear = (low..=high)
                .filter_map(|col| Square::new(row, col))
                .all(|sq| self.get_piece(sq).is_none());
            if !path_clear {
                continue;
            }

            if *in_check.get_or_insert_with(|| self.is_square_attacked(king_home, enemy)) {
                return Vec::new();
            }

            let king_to_col = side.king_to_col();
            let passage_safe = [(4 + king_to_col) / 2, king_to_col]
                .into_iter()
                .filter_map(|col| Square::new(row, col))
                .all(|sq| !self.is_square_attacked(sq, enemy));
            if passage_safe {
                if let Some(to) = Square::new(row, king_to_col) {
                    destinations.push(to);
                }
            }
        }

        destinations
    }

    /// All legal moves for `color`, in board order of the moving piece.
    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        self.pieces_of(color)
            .flat_map(|piece| {
                let from = piece.square;
                self.legal_moves_for(from)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// Returns true if `color` has at least one legal move.
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.pieces_of(color)
            .any(|piece| !self.legal_moves_for(piece.square).is_empty())
    }
}
