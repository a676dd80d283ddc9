//! Board square representation.

use std::fmt;

/// A square on the chess board as a (row, column) pair.
///
/// Row 0 is White's back rank (rank 1), row 7 is Black's (rank 8).
/// Column 0 is the a-file. Both coordinates are always in `0..8`;
/// out-of-range coordinates cannot be represented, so constructors
/// return `None` instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square from row and column, each in `0..8`.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// Creates a square from signed coordinates, rejecting anything off the board.
    #[inline]
    pub const fn from_coords(row: i8, col: i8) -> Option<Self> {
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }

    /// Returns the square shifted by the given row and column deltas, if on the board.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        match (
            (self.row as i8).checked_add(d_row),
            (self.col as i8).checked_add(d_col),
        ) {
            (Some(row), Some(col)) => Self::from_coords(row, col),
            _ => None,
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Self::new(rank - b'1', file - b'a')
    }

    /// Returns the row (0-7).
    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Returns the column (0-7).
    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    /// Returns the rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + self.row) as char
    }

    /// Square color parity: 0 for dark squares (a1), 1 for light squares.
    #[inline]
    pub const fn parity(self) -> u8 {
        (self.row + self.col) % 2
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// Iterates over all 64 squares, row by row from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }

    // Squares the castling rules refer to
    pub const A1: Square = Square { row: 0, col: 0 };
    pub const C1: Square = Square { row: 0, col: 2 };
    pub const D1: Square = Square { row: 0, col: 3 };
    pub const E1: Square = Square { row: 0, col: 4 };
    pub const F1: Square = Square { row: 0, col: 5 };
    pub const G1: Square = Square { row: 0, col: 6 };
    pub const H1: Square = Square { row: 0, col: 7 };
    pub const A8: Square = Square { row: 7, col: 0 };
    pub const C8: Square = Square { row: 7, col: 2 };
    pub const D8: Square = Square { row: 7, col: 3 };
    pub const E8: Square = Square { row: 7, col: 4 };
    pub const F8: Square = Square { row: 7, col: 5 };
    pub const G8: Square = Square { row: 7, col: 6 };
    pub const H8: Square = Square { row: 7, col: 7 };
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}
