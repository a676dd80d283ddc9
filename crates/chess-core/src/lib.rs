//! Core types for chess.
//!
//! This crate provides the fundamental types used across the rules engine:
//! - [`PieceKind`], [`Piece`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Move`], [`CastleSide`] and [`SpecialMove`] for move representation
//! - [`Fen`] for position setup text

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{CastleSide, Move, SpecialMove};
pub use piece::{Piece, PieceKind};
pub use square::Square;
