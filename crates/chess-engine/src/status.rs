//! Game status.

use std::fmt;

/// Overall state of a game, recomputed after every move and undo.
///
/// `InProgress` and `Check` describe the side to move; every other variant
/// is terminal and makes the game reject further moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    InProgress,
    /// The side to move is in check and has a legal reply.
    Check,
    /// The side to move is in check with no legal reply.
    Checkmate,
    /// The side to move is not in check and has no legal move.
    StalemateDraw,
    /// The half-move clock reached the fifty-move limit.
    FiftyMoveDraw,
    /// The current position occurred as often as the repetition limit.
    RepetitionDraw,
    /// Neither side has the material to mate.
    InsufficientMaterialDraw,
}

impl GameStatus {
    /// Returns true if no further moves are accepted.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress | GameStatus::Check)
    }

    /// Returns true for the drawn outcomes.
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::StalemateDraw
                | GameStatus::FiftyMoveDraw
                | GameStatus::RepetitionDraw
                | GameStatus::InsufficientMaterialDraw
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::InProgress => "in progress",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::StalemateDraw => "draw by stalemate",
            GameStatus::FiftyMoveDraw => "draw by the fifty-move rule",
            GameStatus::RepetitionDraw => "draw by repetition",
            GameStatus::InsufficientMaterialDraw => "draw by insufficient material",
        };
        write!(f, "{}", text)
    }
}
