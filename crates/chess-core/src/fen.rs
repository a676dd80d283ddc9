//! Position setup text parsing.
//!
//! Accepts standard FEN with six fields, or the four-field form
//! (placement, side, castling, en passant) that the engine uses as its
//! repetition key.

use crate::{CastleSide, Color, PieceKind, Square};
use thiserror::Error;

/// Errors that can occur when parsing position text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 or 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("expected exactly one {color} king, found {count}")]
    InvalidKingCount { color: Color, count: usize },
}

/// A parsed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Every occupied square, rank 8 first.
    pub placement: Vec<(Square, PieceKind, Color)>,
    /// The side to move.
    pub side_to_move: Color,
    /// Castling rights that are still available.
    pub castling: Vec<(Color, CastleSide)>,
    /// Square skipped by a pawn that just advanced two rows.
    pub en_passant: Option<Square>,
    /// Half-moves since the last pawn move or capture (0 when omitted).
    pub halfmove_clock: u32,
    /// Full-move number (1 when omitted).
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses position text.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 4 && parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let mut side = parts[1].chars();
        let side_to_move = match (side.next().and_then(Color::from_char), side.next()) {
            (Some(color), None) => color,
            _ => return Err(FenError::InvalidActiveColor(parts[1].to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3], side_to_move)?;

        let (halfmove_clock, fullmove_number) = if parts.len() == 6 {
            let halfmove = parts[4]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
            let fullmove = parts[5]
                .parse::<u32>()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;
            (halfmove, fullmove)
        } else {
            (0, 1)
        };

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<Vec<(Square, PieceKind, Color)>, FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut pieces = Vec::new();
        for (i, rank) in ranks.iter().enumerate() {
            let row = 7 - i as u8;
            let mut col = 0u8;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    col += run as u8;
                } else if let Some((kind, color)) = PieceKind::from_char(c) {
                    if let Some(square) = Square::new(row, col) {
                        pieces.push((square, kind, color));
                    }
                    col += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - i
                    )));
                }
                if col > 8 {
                    break;
                }
            }
            if col != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} does not describe 8 squares",
                    8 - i
                )));
            }
        }

        for color in Color::ALL {
            let count = pieces
                .iter()
                .filter(|(_, kind, c)| *kind == PieceKind::King && *c == color)
                .count();
            if count != 1 {
                return Err(FenError::InvalidKingCount { color, count });
            }
        }

        Ok(pieces)
    }

    fn parse_castling(castling: &str) -> Result<Vec<(Color, CastleSide)>, FenError> {
        if castling == "-" {
            return Ok(Vec::new());
        }

        let mut rights = Vec::new();
        for c in castling.chars() {
            let right = match c {
                'K' => (Color::White, CastleSide::Kingside),
                'Q' => (Color::White, CastleSide::Queenside),
                'k' => (Color::Black, CastleSide::Kingside),
                'q' => (Color::Black, CastleSide::Queenside),
                _ => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        c
                    )))
                }
            };
            if rights.contains(&right) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "duplicate character '{}'",
                    c
                )));
            }
            rights.push(right);
        }

        Ok(rights)
    }

    /// The target sits behind a pawn of the side that just moved.
    fn parse_en_passant(ep: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        let mover = side_to_move.opposite();
        let expected_row = mover.pawn_row() as i8 + mover.pawn_direction();
        match Square::from_algebraic(ep) {
            Some(square) if square.row() as i8 == expected_row => Ok(Some(square)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }
}
