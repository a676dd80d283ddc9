//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Moves are played and taken back through [`Game`], so execution and undo
//! are exercised along with generation.

use crate::{Game, GameError};
use chess_core::{Color, Move, PieceKind};

/// Promotion choices for `mov`: all four pieces for a pawn reaching its
/// last row, otherwise just `None`.
fn promotion_choices(game: &Game, mov: Move) -> Vec<Option<PieceKind>> {
    let promotes = game.get_piece(mov.from).is_some_and(|piece| {
        piece.kind == PieceKind::Pawn && mov.to.row() == piece.color.promotion_row()
    });
    if promotes {
        PieceKind::PROMOTIONS.into_iter().map(Some).collect()
    } else {
        vec![None]
    }
}

/// Counts the number of leaf nodes at the given depth.
///
/// The game is returned to its starting state before this returns `Ok`.
/// Draw rules still apply, so a line that reaches a drawn position before
/// `depth` is exhausted fails with [`GameError::GameAlreadyOver`].
pub fn perft(game: &mut Game, depth: u32) -> Result<u64, GameError> {
    if depth == 0 {
        return Ok(1);
    }

    let mut nodes = 0u64;
    for mov in game.all_legal_moves(game.turn()) {
        for promotion in promotion_choices(game, mov) {
            if depth == 1 {
                nodes += 1;
                continue;
            }
            game.try_move(mov.from, mov.to, promotion)?;
            nodes += perft(game, depth - 1)?;
            game.try_undo()?;
        }
    }
    Ok(nodes)
}

/// Perft with divide - node count below each root move, sorted by move
/// text. Promotions are suffixed with the piece letter.
pub fn perft_divide(game: &mut Game, depth: u32) -> Result<Vec<(String, u64)>, GameError> {
    let mut results = Vec::new();

    for mov in game.all_legal_moves(game.turn()) {
        for promotion in promotion_choices(game, mov) {
            let mut text = mov.to_uci();
            if let Some(kind) = promotion {
                text.push(kind.to_char(Color::Black));
            }

            let nodes = if depth > 1 {
                game.try_move(mov.from, mov.to, promotion)?;
                let nodes = perft(game, depth - 1)?;
                game.try_undo()?;
                nodes
            } else {
                1
            };
            results.push((text, nodes));
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

    fn count(fen: Option<&str>, depth: u32) -> u64 {
        let mut game = match fen {
            Some(fen) => Game::from_fen(fen).unwrap(),
            None => Game::new(),
        };
        let signature = game.position_signature();
        let nodes = perft(&mut game, depth).unwrap();
        assert_eq!(game.position_signature(), signature);
        assert!(game.history().is_empty());
        nodes
    }

    // Starting position perft values (well-known and verified)
    #[test]
    fn perft_startpos_depth_1() {
        assert_eq!(count(None, 1), 20);
    }

    #[test]
    fn perft_startpos_depth_2() {
        assert_eq!(count(None, 2), 400);
    }

    #[test]
    fn perft_startpos_depth_3() {
        assert_eq!(count(None, 3), 8902);
    }

    // Kiwipete - a position with lots of special moves
    #[test]
    fn perft_kiwipete_depth_1() {
        assert_eq!(count(Some(KIWIPETE), 1), 48);
    }

    #[test]
    fn perft_kiwipete_depth_2() {
        assert_eq!(count(Some(KIWIPETE), 2), 2039);
    }

    // Slow in debug builds
    #[test]
    #[ignore]
    fn perft_kiwipete_depth_3() {
        assert_eq!(count(Some(KIWIPETE), 3), 97862);
    }

    // Position 3: Check evasion, en passant, promotion
    #[test]
    fn perft_position3_depth_1() {
        assert_eq!(count(Some(POSITION3), 1), 14);
    }

    #[test]
    fn perft_position3_depth_2() {
        assert_eq!(count(Some(POSITION3), 2), 191);
    }

    #[test]
    fn perft_position3_depth_3() {
        assert_eq!(count(Some(POSITION3), 3), 2812);
    }

    // Position 4: Lots of promotions and captures
    #[test]
    fn perft_position4_depth_1() {
        assert_eq!(count(Some(POSITION4), 1), 6);
    }

    #[test]
    fn perft_position4_depth_2() {
        assert_eq!(count(Some(POSITION4), 2), 264);
    }

    #[test]
    fn perft_position5_depth_1() {
        assert_eq!(count(Some(POSITION5), 1), 44);
    }

    #[test]
    fn perft_position5_depth_2() {
        assert_eq!(count(Some(POSITION5), 2), 1486);
    }

    #[test]
    fn perft_divide_works() {
        let mut game = Game::new();
        let results = perft_divide(&mut game, 1).unwrap();
        assert_eq!(results.len(), 20);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn perft_divide_lists_promotions() {
        let mut game = Game::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let results = perft_divide(&mut game, 1).unwrap();
        let promotions: Vec<&str> = results
            .iter()
            .map(|(text, _)| text.as_str())
            .filter(|text| text.starts_with("b7"))
            .collect();
        assert_eq!(promotions, vec!["b7b8b", "b7b8n", "b7b8q", "b7b8r"]);
    }
}
