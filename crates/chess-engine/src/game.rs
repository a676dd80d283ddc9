//! Full game management with history tracking.
//!
//! The [`Game`] struct owns the [`Board`] and provides:
//! - Turn order and move validation
//! - Castling-rights decay, en-passant target and promotion handling
//! - Ply, move-number and half-move counters
//! - A reversible move history and a position-repetition table
//! - Status recomputation after every move and undo

use crate::status::GameStatus;
use crate::{Board, BoardError, CastlingRights, MoveStatus, RulesConfig};
use chess_core::{CastleSide, Color, Fen, FenError, Move, Piece, PieceKind, SpecialMove, Square};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, dispatcher, info, warn, Dispatch};

/// A recorded move with everything needed to reverse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMove {
    /// The moving piece as it was before the move (origin square and
    /// has-moved flag included).
    pub piece: Piece,
    /// Destination square.
    pub to: Square,
    /// The captured piece, on the square it was taken from. For en passant
    /// that is the passed pawn's square, not the destination.
    pub captured: Option<Piece>,
    pub special: Option<SpecialMove>,
    pub castling_before: CastlingRights,
    pub en_passant_before: Option<Square>,
    pub halfmove_clock_before: u32,
}

impl GameMove {
    /// Origin square.
    #[inline]
    pub fn from(&self) -> Square {
        self.piece.square
    }

    /// The move as an origin/destination pair.
    #[inline]
    pub fn mov(&self) -> Move {
        Move::new(self.piece.square, self.to)
    }
}

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game has already ended: {0}")]
    GameAlreadyOver(GameStatus),

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("it is {turn}'s turn, not {mover}'s")]
    WrongTurn { turn: Color, mover: Color },

    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("move {0} needs a promotion choice")]
    PromotionRequired(Move),

    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceKind),

    #[error("malformed move text: {0:?}")]
    MalformedMove(String),

    #[error("no move to undo")]
    NothingToUndo,

    #[error("move counters are at their limit")]
    CounterOverflow,

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// A chess game: board, turn, counters, history and status.
///
/// All mutation goes through [`try_move`](Self::try_move) and
/// [`try_undo`](Self::try_undo) (or their boolean forms). A rejected call
/// leaves the game exactly as it was.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Color,
    status: GameStatus,
    ply: u32,
    move_number: u32,
    halfmove_clock: u32,
    /// Pieces taken, indexed by the capturing color.
    captured: [Vec<Piece>; 2],
    history: Vec<GameMove>,
    /// Position signature to occurrence count.
    repetitions: HashMap<String, u32>,
    config: RulesConfig,
    logger: Dispatch,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position and rules.
    ///
    /// Events go to the dispatcher that is the default when this is called.
    pub fn new() -> Self {
        Self::with_config(RulesConfig::default())
    }

    /// Creates a new game with custom draw thresholds.
    pub fn with_config(config: RulesConfig) -> Self {
        Self::with_config_and_logger(config, current_dispatch())
    }

    /// Creates a new game whose events go to `logger`.
    pub fn with_logger(logger: Dispatch) -> Self {
        Self::with_config_and_logger(RulesConfig::default(), logger)
    }

    /// Creates a new game with custom thresholds and logger.
    pub fn with_config_and_logger(config: RulesConfig, logger: Dispatch) -> Self {
        Self::from_board(Board::standard(), Color::White, 0, 1, config, logger)
    }

    /// Creates a game from position text, with standard rules.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let setup = Fen::parse(fen)?;
        Ok(Self::from_setup(&setup, RulesConfig::default(), current_dispatch()))
    }

    /// Creates a game from a parsed position.
    ///
    /// The status is computed immediately, so a setup can start out
    /// terminal (e.g. stalemate).
    pub fn from_setup(setup: &Fen, config: RulesConfig, logger: Dispatch) -> Self {
        Self::from_board(
            Board::from_setup(setup),
            setup.side_to_move,
            setup.halfmove_clock,
            setup.fullmove_number,
            config,
            logger,
        )
    }

    fn from_board(
        board: Board,
        turn: Color,
        halfmove_clock: u32,
        move_number: u32,
        config: RulesConfig,
        logger: Dispatch,
    ) -> Self {
        let mut game = Game {
            board,
            turn,
            status: GameStatus::InProgress,
            ply: 0,
            move_number,
            halfmove_clock,
            captured: [Vec::new(), Vec::new()],
            history: Vec::new(),
            repetitions: HashMap::new(),
            config,
            logger,
        };
        let signature = game.position_signature();
        game.repetitions.insert(signature, 1);
        game.status = game.evaluate_status();
        game
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece on `square`, if any.
    pub fn get_piece(&self, square: Square) -> Option<&Piece> {
        self.board.get_piece(square)
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true once a terminal status is reached.
    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// The winner, if the game ended in checkmate.
    pub fn winner(&self) -> Option<Color> {
        (self.status == GameStatus::Checkmate).then(|| self.turn.opposite())
    }

    /// Returns true if `color`'s king is attacked.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.is_in_check(color)
    }

    /// All legal moves for `color`.
    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        self.board.all_legal_moves(color)
    }

    /// Legal destinations of the piece on `square`, whoever's turn it is.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Square> {
        self.board.legal_moves_for(square)
    }

    /// Pieces captured by `color`, oldest first.
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// Moves played so far, oldest first.
    pub fn history(&self) -> &[GameMove] {
        &self.history
    }

    /// Half-moves played since this game was created.
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// The full-move number; increments after each Black move.
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// Half-moves since the last pawn move or capture.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// The rule thresholds in use.
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Canonical key of the current position (see
    /// [`Board::position_signature`]).
    pub fn position_signature(&self) -> String {
        self.board.position_signature(self.turn)
    }

    /// How many times the current position has occurred.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&self.position_signature())
            .copied()
            .unwrap_or(0)
    }

    /// Plays `from` to `to`, with `promotion` naming the new piece when a
    /// pawn reaches its last row. Returns false if the move was rejected.
    pub fn make_move(&mut self, from: Square, to: Square, promotion: Option<PieceKind>) -> bool {
        self.try_move(from, to, promotion).is_ok()
    }

    /// Plays a move given in coordinate notation, e.g. `"e2e4"` or `"e7e8q"`.
    pub fn make_move_uci(&mut self, text: &str) -> bool {
        self.try_move_uci(text).is_ok()
    }

    /// Undoes the last move. Returns false if there is nothing to undo.
    pub fn undo_last_move(&mut self) -> bool {
        self.try_undo().is_ok()
    }

    /// Like [`make_move_uci`](Self::make_move_uci), reporting why a move
    /// was rejected.
    pub fn try_move_uci(&mut self, text: &str) -> Result<(), GameError> {
        match Move::from_uci(text) {
            Some((mov, promotion)) => self.try_move(mov.from, mov.to, promotion),
            None => {
                let err = GameError::MalformedMove(text.to_string());
                dispatcher::with_default(&self.logger, || warn!(error = %err, "move rejected"));
                Err(err)
            }
        }
    }

    /// Like [`make_move`](Self::make_move), reporting why a move was rejected.
    ///
    /// On error nothing has changed: a missing or invalid promotion choice
    /// puts the pawn and any captured piece back before returning.
    pub fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<(), GameError> {
        let logger = self.logger.clone();
        dispatcher::with_default(&logger, || {
            let mov = Move::new(from, to);
            let result = self.apply_move(mov, promotion);
            match &result {
                Ok(()) => {
                    debug!(%mov, ply = self.ply, status = %self.status, "move applied");
                    if self.status.is_terminal() {
                        info!(status = %self.status, ply = self.ply, "game over");
                    }
                }
                Err(err) => warn!(%mov, error = %err, "move rejected"),
            }
            result
        })
    }

    /// Like [`undo_last_move`](Self::undo_last_move), reporting why the undo
    /// was rejected.
    pub fn try_undo(&mut self) -> Result<(), GameError> {
        let logger = self.logger.clone();
        dispatcher::with_default(&logger, || {
            let result = self.revert_last_move();
            match &result {
                Ok(mov) => debug!(%mov, ply = self.ply, status = %self.status, "move undone"),
                Err(err) => warn!(error = %err, "undo rejected"),
            }
            result.map(|_| ())
        })
    }

    fn apply_move(&mut self, mov: Move, promotion: Option<PieceKind>) -> Result<(), GameError> {
        let Move { from, to } = mov;
        if self.status.is_terminal() {
            return Err(GameError::GameAlreadyOver(self.status));
        }
        let piece = *self
            .board
            .get_piece(from)
            .ok_or(GameError::EmptySquare(from))?;
        if piece.color != self.turn {
            return Err(GameError::WrongTurn {
                turn: self.turn,
                mover: piece.color,
            });
        }
        if !self.board.legal_moves_for(from).contains(&to) {
            return Err(GameError::IllegalMove(mov));
        }

        let resets_clock = piece.kind == PieceKind::Pawn || self.board.get_piece(to).is_some();
        let halfmove_clock = if resets_clock {
            Some(0)
        } else {
            self.halfmove_clock.checked_add(1)
        };
        let move_number = if piece.color == Color::Black {
            self.move_number.checked_add(1)
        } else {
            Some(self.move_number)
        };
        let (Some(halfmove_clock), Some(move_number), Some(ply)) =
            (halfmove_clock, move_number, self.ply.checked_add(1))
        else {
            return Err(GameError::CounterOverflow);
        };

        let castling_before = self.board.castling_rights();
        let en_passant_before = self.board.en_passant_target();

        let is_castling = piece.kind == PieceKind::King && from.col().abs_diff(to.col()) == 2;
        let (captured, special) = if is_castling {
            let side = if to.col() > from.col() {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            };
            self.board.perform_castling(piece.color, side)?;
            (None, Some(SpecialMove::Castle(side)))
        } else {
            let outcome = self.board.move_piece(from, to)?;
            let mut special = outcome.en_passant.then_some(SpecialMove::EnPassant);
            if outcome.status == MoveStatus::PromotionRequired {
                let kind = match promotion {
                    Some(kind) if kind.is_promotion_target() => kind,
                    other => {
                        self.roll_back(piece, to, outcome.captured);
                        return Err(match other {
                            Some(kind) => GameError::InvalidPromotion(kind),
                            None => GameError::PromotionRequired(mov),
                        });
                    }
                };
                let mut promoted = Piece::new(kind, piece.color, to);
                promoted.has_moved = true;
                self.board.set_piece(to, Some(promoted));
                special = Some(SpecialMove::Promotion(kind));
            }
            (outcome.captured, special)
        };

        self.update_castling_rights(&piece, captured.as_ref());
        let en_passant = (piece.kind == PieceKind::Pawn && from.row().abs_diff(to.row()) == 2)
            .then(|| Square::new((from.row() + to.row()) / 2, from.col()))
            .flatten();
        self.board.set_en_passant(en_passant);

        let halfmove_clock_before = self.halfmove_clock;
        self.halfmove_clock = halfmove_clock;
        self.ply = ply;
        self.move_number = move_number;

        if let Some(captured) = captured {
            self.captured[piece.color.index()].push(captured);
        }
        self.history.push(GameMove {
            piece,
            to,
            captured,
            special,
            castling_before,
            en_passant_before,
            halfmove_clock_before,
        });

        self.turn = self.turn.opposite();
        let signature = self.position_signature();
        *self.repetitions.entry(signature).or_insert(0) += 1;
        self.status = self.evaluate_status();
        Ok(())
    }

    /// Undoes a half-finished promotion: the pawn goes back to its origin
    /// and the captured piece, if any, to its square.
    fn roll_back(&mut self, pawn: Piece, to: Square, captured: Option<Piece>) {
        self.board.set_piece(to, None);
        self.board.set_piece(pawn.square, Some(pawn));
        if let Some(captured) = captured {
            self.board.set_piece(captured.square, Some(captured));
        }
    }

    fn update_castling_rights(&mut self, mover: &Piece, captured: Option<&Piece>) {
        match mover.kind {
            PieceKind::King => self.board.revoke_all_castling(mover.color),
            PieceKind::Rook => {
                if let Some(side) = CastleSide::from_rook_home(mover.color, mover.square) {
                    self.board.revoke_castling(mover.color, side);
                }
            }
            _ => {}
        }
        if let Some(captured) = captured.filter(|p| p.kind == PieceKind::Rook) {
            if let Some(side) = CastleSide::from_rook_home(captured.color, captured.square) {
                self.board.revoke_castling(captured.color, side);
            }
        }
    }

    fn revert_last_move(&mut self) -> Result<Move, GameError> {
        let last = *self.history.last().ok_or(GameError::NothingToUndo)?;
        let mover = last.piece;
        let signature = self.position_signature();

        match last.special {
            Some(SpecialMove::Castle(side)) => self.board.undo_castling(mover.color, side)?,
            _ => {
                let in_place = self
                    .board
                    .get_piece(last.to)
                    .is_some_and(|p| p.color == mover.color);
                if !in_place {
                    return Err(BoardError::EmptySquare(last.to).into());
                }
                self.board.set_piece(last.to, None);
                let restored = match last.special {
                    Some(SpecialMove::Promotion(_)) => Piece {
                        kind: PieceKind::Pawn,
                        ..mover
                    },
                    _ => mover,
                };
                self.board.set_piece(mover.square, Some(restored));
                if let Some(captured) = last.captured {
                    self.board.set_piece(captured.square, Some(captured));
                }
            }
        }

        self.history.pop();
        if let Some(count) = self.repetitions.get_mut(&signature) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&signature);
            }
        }
        if last.captured.is_some() {
            self.captured[mover.color.index()].pop();
        }

        self.board.restore_state(last.castling_before, last.en_passant_before);
        self.halfmove_clock = last.halfmove_clock_before;
        self.ply = self.ply.saturating_sub(1);
        if mover.color == Color::Black {
            self.move_number = self.move_number.saturating_sub(1);
        }
        self.turn = mover.color;
        self.status = self.evaluate_status();
        Ok(last.mov())
    }

    /// Status of the current position for the side to move. Checks run in
    /// order and the first match wins.
    fn evaluate_status(&self) -> GameStatus {
        if self.halfmove_clock >= self.config.fifty_move_limit {
            return GameStatus::FiftyMoveDraw;
        }
        if self.repetition_count() >= self.config.repetition_limit {
            return GameStatus::RepetitionDraw;
        }
        if self.board.is_insufficient_material() {
            return GameStatus::InsufficientMaterialDraw;
        }

        let in_check = self.board.is_in_check(self.turn);
        match (self.board.has_legal_move(self.turn), in_check) {
            (false, true) => GameStatus::Checkmate,
            (false, false) => GameStatus::StalemateDraw,
            (true, true) => GameStatus::Check,
            (true, false) => GameStatus::InProgress,
        }
    }
}

fn current_dispatch() -> Dispatch {
    dispatcher::get_default(Dispatch::clone)
}
