//! Chess rules engine with a mailbox board and reversible move history.
//!
//! This crate provides:
//! - [`Board`] - 8×8 grid of pieces, castling rights and en-passant target,
//!   with attack detection, legal-move enumeration and a position signature
//! - [`Game`] - turn order, move execution (castling, en passant, promotion),
//!   undo, repetition tracking and status detection
//! - [`GameStatus`] - check, checkmate and the automatic draws
//! - [`RulesConfig`] - draw thresholds, loadable from TOML
//! - Piece geometry in [`movegen`] and [`perft`] for generator validation
//!
//! # Architecture
//!
//! The board owns every piece by value. Piece geometry is a set of free
//! functions that read the board; the board filters those squares by
//! occupancy and by simulating each move to see whether the mover's king
//! stays safe. The game validates requests against that legal set and is
//! the only thing that mutates the board during play.
//!
//! Events are emitted through `tracing`. Each game carries its own
//! dispatcher, captured at construction or injected with
//! [`Game::with_logger`].
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, GameStatus};
//! use chess_core::{Color, Square};
//!
//! let mut game = Game::new();
//! println!("Legal moves from starting position: {}", game.all_legal_moves(Color::White).len());
//!
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! assert!(game.make_move(e2, e4, None));
//! assert!(game.make_move_uci("e7e5"));
//! assert_eq!(game.status(), GameStatus::InProgress);
//!
//! assert!(game.undo_last_move());
//! assert_eq!(game.turn(), Color::Black);
//! ```

mod board;
mod castling;
mod config;
mod game;
pub mod movegen;
pub mod perft;
mod status;

pub use board::{Board, BoardError, MoveOutcome, MoveStatus};
pub use castling::CastlingRights;
pub use config::{ConfigError, RulesConfig};
pub use game::{Game, GameError, GameMove};
pub use movegen::potential_moves;
pub use perft::{perft, perft_divide};
pub use status::GameStatus;
