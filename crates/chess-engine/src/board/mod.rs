//! Board state: the 8×8 grid, castling rights and the en-passant target.
//!
//! The board performs physical mutations (placing pieces, executing a
//! move, castling) and answers geometric questions (attacked squares,
//! legal destinations, material, position signature). Turn order,
//! counters and history belong to [`Game`](crate::Game).

mod legal;
mod safety;

use crate::CastlingRights;
use chess_core::{CastleSide, Color, Fen, FenError, Piece, PieceKind, Square};
use thiserror::Error;
use tracing::error;

/// Errors from low-level board mutations.
///
/// Every check runs before the first write, so an error always leaves the
/// board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("{0} is occupied by a piece of the moving side")]
    FriendlyCapture(Square),

    #[error("no enemy pawn to capture en passant on {0}")]
    MissingEnPassantVictim(Square),

    #[error("{color} cannot castle {side}: king or rook is not where expected")]
    CastlingPieces { color: Color, side: CastleSide },
}

/// Whether a completed [`Board::move_piece`] still needs a promotion choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    /// The move is complete.
    Completed,
    /// A pawn reached its last row; the caller must replace it.
    PromotionRequired,
}

/// Result of [`Board::move_piece`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub status: MoveStatus,
    /// The captured piece, carrying the square it was taken on.
    pub captured: Option<Piece>,
    /// True when the capture was en passant.
    pub en_passant: bool,
}

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The chess board.
///
/// Owns every piece by value. A grid cell holds `Some(piece)` exactly when
/// `piece.square` is that cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
    castling: CastlingRights,
    en_passant: Option<Square>,
}

impl Board {
    /// Creates a board with no pieces and no castling rights.
    pub fn empty() -> Self {
        Board {
            grid: [[None; 8]; 8],
            castling: CastlingRights::NONE,
            en_passant: None,
        }
    }

    /// Creates the standard starting position.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for square in Square::all() {
            let col = square.col() as usize;
            let occupant = match square.row() {
                0 => Some((BACK_ROW[col], Color::White)),
                1 => Some((PieceKind::Pawn, Color::White)),
                6 => Some((PieceKind::Pawn, Color::Black)),
                7 => Some((BACK_ROW[col], Color::Black)),
                _ => None,
            };
            if let Some((kind, color)) = occupant {
                board.set_piece(square, Some(Piece::new(kind, color, square)));
            }
        }
        board.castling = CastlingRights::ALL;
        board
    }

    /// Creates a board from position text (see [`Fen`]).
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_setup(&Fen::parse(fen)?))
    }

    /// Creates a board from a parsed position.
    ///
    /// Has-moved flags are inferred from placement: pawns off their start
    /// row, kings off their home square and rooks off their corners count
    /// as moved.
    pub fn from_setup(fen: &Fen) -> Self {
        let mut board = Board::empty();
        for &(square, kind, color) in &fen.placement {
            let home_row = square.row() == color.back_row();
            let has_moved = match kind {
                PieceKind::Pawn => square.row() != color.pawn_row(),
                PieceKind::King => !(home_row && square.col() == 4),
                PieceKind::Rook => CastleSide::from_rook_home(color, square).is_none(),
                PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => false,
            };
            let mut piece = Piece::new(kind, color, square);
            piece.has_moved = has_moved;
            board.set_piece(square, Some(piece));
        }
        board.castling = CastlingRights::from_pairs(&fen.castling);
        board.en_passant = fen.en_passant;
        board
    }

    /// Returns true if (row, col) lies on the board.
    #[inline]
    pub fn is_valid_square(row: i8, col: i8) -> bool {
        Square::from_coords(row, col).is_some()
    }

    #[inline]
    fn cell(&self, square: Square) -> &Option<Piece> {
        &self.grid[square.row() as usize][square.col() as usize]
    }

    #[inline]
    fn cell_mut(&mut self, square: Square) -> &mut Option<Piece> {
        &mut self.grid[square.row() as usize][square.col() as usize]
    }

    /// Returns the piece on `square`, if any.
    #[inline]
    pub fn get_piece(&self, square: Square) -> Option<&Piece> {
        self.cell(square).as_ref()
    }

    /// Returns the piece at raw coordinates. Off-board coordinates read as empty.
    pub fn piece_at_coords(&self, row: i8, col: i8) -> Option<&Piece> {
        Square::from_coords(row, col).and_then(|square| self.get_piece(square))
    }

    /// Puts `piece` on `square` (or clears it) and returns the previous occupant.
    ///
    /// The stored piece's `square` is rewritten to `square`.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        let placed = piece.map(|p| Piece { square, ..p });
        std::mem::replace(self.cell_mut(square), placed)
    }

    /// Iterates over every piece, row by row from a1.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.grid.iter().flatten().flatten()
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |piece| piece.color == color)
    }

    /// Returns the square of `color`'s king.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|piece| piece.kind == PieceKind::King)
            .map(|piece| piece.square)
    }

    /// Returns the current castling rights.
    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// Permanently removes one castling right.
    pub fn revoke_castling(&mut self, color: Color, side: CastleSide) {
        self.castling.revoke(color, side);
    }

    /// Permanently removes both castling rights of a color.
    pub fn revoke_all_castling(&mut self, color: Color) {
        self.castling.revoke_color(color);
    }

    /// Returns the square a pawn skipped on the previous move, if any.
    #[inline]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    pub(crate) fn set_en_passant(&mut self, target: Option<Square>) {
        self.en_passant = target;
    }

    /// Puts back castling rights and en-passant target from a snapshot.
    pub(crate) fn restore_state(&mut self, castling: CastlingRights, en_passant: Option<Square>) {
        self.castling = castling;
        self.en_passant = en_passant;
    }

    /// Square of the pawn an en-passant move from `from` to `to` would take,
    /// or `None` if the move is not en passant.
    fn en_passant_victim(&self, mover: &Piece, to: Square) -> Option<Square> {
        let is_en_passant = mover.kind == PieceKind::Pawn
            && self.en_passant == Some(to)
            && to.col() != mover.square.col()
            && self.get_piece(to).is_none();
        if is_en_passant {
            Square::new(mover.square.row(), to.col())
        } else {
            None
        }
    }

    /// Physically moves the piece on `from` to `to`.
    ///
    /// Handles ordinary and en-passant captures, updates the mover's square
    /// and has-moved flag, and reports when a pawn reached its last row.
    /// Legality is the caller's concern, as are turn, counters, castling
    /// rights and the en-passant target.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<MoveOutcome, BoardError> {
        let Some(mover) = self.get_piece(from).copied() else {
            error!(%from, "move_piece called on an empty square");
            return Err(BoardError::EmptySquare(from));
        };
        if self.get_piece(to).is_some_and(|p| p.color == mover.color) {
            error!(%from, %to, "move_piece would capture a friendly piece");
            return Err(BoardError::FriendlyCapture(to));
        }

        let victim_square = self.en_passant_victim(&mover, to);
        if let Some(victim_square) = victim_square {
            let victim_ok = self
                .get_piece(victim_square)
                .is_some_and(|p| p.is(PieceKind::Pawn, mover.color.opposite()));
            if !victim_ok {
                error!(%to, %victim_square, "en passant without a pawn to capture");
                return Err(BoardError::MissingEnPassantVictim(to));
            }
        }

        let captured = match victim_square {
            Some(victim_square) => self.set_piece(victim_square, None),
            None => self.set_piece(to, None),
        };
        self.set_piece(from, None);
        self.set_piece(
            to,
            Some(Piece {
                has_moved: true,
                ..mover
            }),
        );

        let status = if mover.kind == PieceKind::Pawn && to.row() == mover.color.promotion_row() {
            MoveStatus::PromotionRequired
        } else {
            MoveStatus::Completed
        };

        Ok(MoveOutcome {
            status,
            captured,
            en_passant: victim_square.is_some(),
        })
    }

    /// Squares involved in castling: king from/to and rook from/to.
    fn castling_squares(color: Color, side: CastleSide) -> Option<[Square; 4]> {
        let row = color.back_row();
        Some([
            Square::new(row, 4)?,
            Square::new(row, side.king_to_col())?,
            Square::new(row, side.rook_from_col())?,
            Square::new(row, side.rook_to_col())?,
        ])
    }

    /// Moves king and rook together and clears both castling rights of `color`.
    ///
    /// Legality (rights, empty path, unattacked squares) must already be
    /// established. Fails without touching the board if the king or rook is
    /// missing from its home square.
    pub fn perform_castling(&mut self, color: Color, side: CastleSide) -> Result<(), BoardError> {
        let shape_error = BoardError::CastlingPieces { color, side };
        let [king_from, king_to, rook_from, rook_to] =
            Self::castling_squares(color, side).ok_or(shape_error.clone())?;

        let king = self.get_piece(king_from).copied();
        let rook = self.get_piece(rook_from).copied();
        let (Some(king), Some(rook)) = (king, rook) else {
            error!(%color, %side, "castling pieces missing");
            return Err(shape_error);
        };
        if !king.is(PieceKind::King, color)
            || !rook.is(PieceKind::Rook, color)
            || self.get_piece(king_to).is_some()
            || self.get_piece(rook_to).is_some()
        {
            error!(%color, %side, "castling pieces out of place");
            return Err(shape_error);
        }

        self.set_piece(king_from, None);
        self.set_piece(rook_from, None);
        self.set_piece(
            king_to,
            Some(Piece {
                has_moved: true,
                ..king
            }),
        );
        self.set_piece(
            rook_to,
            Some(Piece {
                has_moved: true,
                ..rook
            }),
        );
        self.castling.revoke_color(color);
        Ok(())
    }

    /// Reverses [`perform_castling`](Self::perform_castling): king and rook
    /// return home with their has-moved flags cleared. Castling rights are
    /// left alone; the caller restores them from its snapshot.
    pub(crate) fn undo_castling(&mut self, color: Color, side: CastleSide) -> Result<(), BoardError> {
        let shape_error = BoardError::CastlingPieces { color, side };
        let [king_home, king_at, rook_home, rook_at] =
            Self::castling_squares(color, side).ok_or(shape_error.clone())?;

        let king = self.get_piece(king_at).copied();
        let rook = self.get_piece(rook_at).copied();
        let (Some(king), Some(rook)) = (king, rook) else {
            error!(%color, %side, "cannot undo castling: pieces missing");
            return Err(shape_error);
        };
        if !king.is(PieceKind::King, color) || !rook.is(PieceKind::Rook, color) {
            error!(%color, %side, "cannot undo castling: pieces out of place");
            return Err(shape_error);
        }

        self.set_piece(king_at, None);
        self.set_piece(rook_at, None);
        self.set_piece(
            king_home,
            Some(Piece {
                has_moved: false,
                ..king
            }),
        );
        self.set_piece(
            rook_home,
            Some(Piece {
                has_moved: false,
                ..rook
            }),
        );
        Ok(())
    }

    /// Returns true if neither side can possibly deliver mate: K vs K,
    /// K + minor vs K, or K + B vs K + B with both bishops on the same
    /// square color.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors: [Vec<(PieceKind, u8)>; 2] = [Vec::new(), Vec::new()];
        for piece in self.pieces() {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Queen | PieceKind::Rook | PieceKind::Pawn => return false,
                PieceKind::Knight | PieceKind::Bishop => {
                    minors[piece.color.index()].push((piece.kind, piece.square.parity()))
                }
            }
        }

        match (minors[0].as_slice(), minors[1].as_slice()) {
            ([], []) => true,
            ([_], []) | ([], [_]) => true,
            ([(PieceKind::Bishop, white)], [(PieceKind::Bishop, black)]) => white == black,
            _ => false,
        }
    }

    /// Canonical text for the position with `side_to_move` to play:
    /// placement (rank 8 first, empty runs as digits), side letter, castling
    /// letters and en-passant square. Used as the repetition key.
    pub fn position_signature(&self, side_to_move: Color) -> String {
        let mut out = String::with_capacity(80);

        for row in (0..8).rev() {
            let mut empty = 0;
            for piece in &self.grid[row] {
                match piece {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.symbol());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if row > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(side_to_move.to_char());
        out.push(' ');
        out.push_str(&self.castling.to_string());
        out.push(' ');
        match self.en_passant {
            Some(square) => out.push_str(&square.to_algebraic()),
            None => out.push('-'),
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn standard_setup() {
        let board = Board::standard();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(
            board.get_piece(Square::E1).map(|p| (p.kind, p.color)),
            Some((PieceKind::King, Color::White))
        );
        assert_eq!(
            board.get_piece(Square::D8).map(|p| (p.kind, p.color)),
            Some((PieceKind::Queen, Color::Black))
        );
        assert!(board.get_piece(sq("e4")).is_none());
        assert_eq!(board.castling_rights(), CastlingRights::ALL);
        assert_eq!(board.en_passant_target(), None);
    }

    #[test]
    fn standard_matches_startpos_text() {
        assert_eq!(Board::standard(), Board::from_fen(Fen::STARTPOS).unwrap());
    }

    #[test]
    fn grid_and_piece_square_agree() {
        let board = Board::standard();
        for square in Square::all() {
            if let Some(piece) = board.get_piece(square) {
                assert_eq!(piece.square, square);
            }
        }
    }

    #[test]
    fn off_board_coordinates_read_empty() {
        let board = Board::standard();
        assert!(Board::is_valid_square(0, 0));
        assert!(!Board::is_valid_square(8, 0));
        assert!(!Board::is_valid_square(0, -1));
        assert!(board.piece_at_coords(-1, 4).is_none());
        assert!(board.piece_at_coords(0, 8).is_none());
        assert!(board.piece_at_coords(0, 4).is_some());
    }

    #[test]
    fn set_piece_rewrites_square() {
        let mut board = Board::empty();
        let knight = Piece::new(PieceKind::Knight, Color::White, Square::A1);
        assert_eq!(board.set_piece(sq("c3"), Some(knight)), None);
        assert_eq!(board.get_piece(sq("c3")).unwrap().square, sq("c3"));
        let removed = board.set_piece(sq("c3"), None).unwrap();
        assert_eq!(removed.square, sq("c3"));
        assert!(board.get_piece(sq("c3")).is_none());
    }

    #[test]
    fn move_piece_simple_advance() {
        let mut board = Board::standard();
        let outcome = board.move_piece(sq("e2"), sq("e4")).unwrap();
        assert_eq!(outcome.status, MoveStatus::Completed);
        assert_eq!(outcome.captured, None);
        assert!(!outcome.en_passant);
        let pawn = board.get_piece(sq("e4")).unwrap();
        assert!(pawn.has_moved);
        assert!(board.get_piece(sq("e2")).is_none());
    }

    #[test]
    fn move_piece_capture() {
        let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let outcome = board.move_piece(sq("e4"), sq("d5")).unwrap();
        let captured = outcome.captured.unwrap();
        assert_eq!(captured.kind, PieceKind::Pawn);
        assert_eq!(captured.color, Color::Black);
        assert_eq!(captured.square, sq("d5"));
        assert_eq!(board.get_piece(sq("d5")).unwrap().color, Color::White);
    }

    #[test]
    fn move_piece_en_passant_removes_passed_pawn() {
        let mut board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let outcome = board.move_piece(sq("e5"), sq("d6")).unwrap();
        assert!(outcome.en_passant);
        assert_eq!(outcome.captured.unwrap().square, sq("d5"));
        assert!(board.get_piece(sq("d5")).is_none());
        assert_eq!(board.get_piece(sq("d6")).unwrap().kind, PieceKind::Pawn);
    }

    #[test]
    fn move_piece_reports_promotion() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let outcome = board.move_piece(sq("a7"), Square::A8).unwrap();
        assert_eq!(outcome.status, MoveStatus::PromotionRequired);
    }

    #[test]
    fn move_piece_errors_leave_board_untouched() {
        let mut board = Board::standard();
        let before = board.clone();
        assert_eq!(
            board.move_piece(sq("e4"), sq("e5")),
            Err(BoardError::EmptySquare(sq("e4")))
        );
        assert_eq!(
            board.move_piece(Square::A1, sq("a2")),
            Err(BoardError::FriendlyCapture(sq("a2")))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn en_passant_without_victim_is_rejected() {
        let mut board = Board::from_fen("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1").unwrap();
        let before = board.clone();
        assert_eq!(
            board.move_piece(sq("e5"), sq("d6")),
            Err(BoardError::MissingEnPassantVictim(sq("d6")))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn castling_moves_both_pieces() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        board.perform_castling(Color::White, CastleSide::Kingside).unwrap();
        let king = board.get_piece(Square::G1).unwrap();
        let rook = board.get_piece(Square::F1).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(king.has_moved && rook.has_moved);
        assert!(board.get_piece(Square::E1).is_none());
        assert!(board.get_piece(Square::H1).is_none());
        assert_eq!(board.castling_rights().to_string(), "kq");

        board.perform_castling(Color::Black, CastleSide::Queenside).unwrap();
        assert_eq!(board.get_piece(Square::C8).unwrap().kind, PieceKind::King);
        assert_eq!(board.get_piece(Square::D8).unwrap().kind, PieceKind::Rook);
        assert_eq!(board.castling_rights(), CastlingRights::NONE);
    }

    #[test]
    fn castling_shape_error_leaves_board_untouched() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let before = board.clone();
        assert_eq!(
            board.perform_castling(Color::White, CastleSide::Kingside),
            Err(BoardError::CastlingPieces {
                color: Color::White,
                side: CastleSide::Kingside
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn undo_castling_restores_home_squares() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let before = board.clone();
        board.perform_castling(Color::White, CastleSide::Queenside).unwrap();
        board.undo_castling(Color::White, CastleSide::Queenside).unwrap();
        board.restore_state(before.castling_rights(), None);
        assert_eq!(board, before);
    }

    #[test]
    fn insufficient_material_cases() {
        let cases = [
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KB2 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", true),
            ("4kn2/8/8/8/8/8/8/4K3 w - - 0 1", true),
            // f1 and c8 are both light squares
            ("2b1k3/8/8/8/8/8/8/4KB2 w - - 0 1", true),
            // f1 light, f8 dark
            ("4kb2/8/8/8/8/8/8/4KB2 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/3NKN2 w - - 0 1", false),
            ("4kn2/8/8/8/8/8/8/4KN2 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/4KR2 w - - 0 1", false),
            ("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/3QK3 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(board.is_insufficient_material(), expected, "{}", fen);
        }
    }

    #[test]
    fn signature_of_start_position() {
        assert_eq!(
            Board::standard().position_signature(Color::White),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
        );
    }

    #[test]
    fn signature_includes_en_passant_and_rights() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b Kq e3 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(
            board.position_signature(Color::Black),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b Kq e3"
        );
    }

    #[test]
    fn signature_parses_back_to_same_placement() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let board = Board::from_fen(fen).unwrap();
        let signature = board.position_signature(Color::White);
        let reparsed = Board::from_fen(&signature).unwrap();
        assert_eq!(reparsed.position_signature(Color::White), signature);
    }

    #[test]
    fn has_moved_inferred_from_setup() {
        let board = Board::from_fen("4k2r/8/8/8/8/4P3/3P4/R3K3 w Qk - 0 1").unwrap();
        assert!(!board.get_piece(Square::E1).unwrap().has_moved);
        assert!(!board.get_piece(Square::A1).unwrap().has_moved);
        assert!(!board.get_piece(sq("d2")).unwrap().has_moved);
        assert!(board.get_piece(sq("e3")).unwrap().has_moved);
        assert!(!board.get_piece(Square::H8).unwrap().has_moved);
    }
}
