//! Pure, signed position score from BLACK's perspective (spec.md §4.6).

use crate::prelude::*;

const H_MATERIAL: i32 = 200;
const H_CENTER_DIVISOR: i32 = 16; // H_CENTER = 1/16, applied as an integer divide.
const H_CAPTURE: i32 = 100;
const H_WIN: i32 = 9999;

/// Zero-sized: the formula reads entirely off `&Game`, nothing is cached here.
#[derive(Clone, Copy, Debug, Default)]
pub struct Evaluator;

fn centrality(sq: Square) -> i32 {
    let row = sq.row as i32;
    let col = sq.col as i32;
    (8 - row) * row * (8 - col) * col
}

/// For `active`, the length-sorted (descending) vulnerable clusters of
/// `color` whose `risky_border` some `active`-colored piece can reach this
/// turn — the clusters `active` could capture by moving there.
fn realizable_captures(game: &Game, attacker: Color, defender: Color) -> Vec<usize> {
    let attacker_pieces = game.board().squares_by_color(attacker);
    let mut lengths: Vec<usize> = game
        .vulnerable(defender)
        .filter(|c| {
            c.risky_border
                .is_some_and(|border| attacker_pieces.iter().any(|&p| game.reachable_from(p).contains(&border)))
        })
        .map(|c| c.len())
        .collect();
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    lengths
}

/// spec.md §4.6 `realized_capture_term`.
fn realized_capture_term(game: &Game, active: Color) -> i32 {
    let opponent = -active;
    let active_targets = realizable_captures(game, active, opponent);
    let opponent_targets = realizable_captures(game, opponent, active);

    let a_best = active_targets.first().copied().unwrap_or(0) as i32;
    let o_best = opponent_targets.first().copied().unwrap_or(0) as i32;
    let o_next = opponent_targets.get(1).copied().unwrap_or(0) as i32;

    let active_count = game.board().squares_by_color(active).len() as i32;
    let opponent_count = game.board().squares_by_color(opponent).len() as i32;
    let delta = active_count - opponent_count;

    if o_best > 0 {
        (a_best - o_best + delta).max(o_next)
    } else {
        a_best
    }
}

impl Evaluator {
    /// The raw, BLACK-oriented score (spec.md §4.6); the search's own sign
    /// convention (BLACK maximizes, RED minimizes) handles perspective, not
    /// this function.
    pub fn score(&self, game: &Game) -> i32 {
        let black_count = game.board().squares_by_color(Color::Black).len() as i32;
        let red_count = game.board().squares_by_color(Color::Red).len() as i32;
        let material = black_count - red_count;

        let black_center: i32 = game.board().squares_by_color(Color::Black).iter().map(|&sq| centrality(sq)).sum();
        let red_center: i32 = game.board().squares_by_color(Color::Red).iter().map(|&sq| centrality(sq)).sum();
        let center = (black_center - red_center) / H_CENTER_DIVISOR;

        let active = game.active_color();
        // realized_capture_term is computed relative to whichever color is
        // active; project it into BLACK-oriented terms via that color's
        // signed perspective (spec.md §3 `Color::perspective`), since the
        // overall formula is specified as a single BLACK-oriented sum.
        let capture = realized_capture_term(game, active) * active.perspective();

        let win = match game.game_state() {
            GameState::BlackWon => 1,
            GameState::RedWon => -1,
            GameState::Ongoing => 0,
        };

        H_MATERIAL * material + center + H_CAPTURE * capture + H_WIN * win
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_symmetric() {
        let game = Game::default();
        assert_eq!(Evaluator.score(&game), 0);
    }

    #[test]
    fn black_win_dominates_the_score() {
        let mut board = Board::empty();
        board.set("i6".parse().unwrap(), Some(Color::Black));
        board.set("f7".parse().unwrap(), Some(Color::Red));
        board.set("f3".parse().unwrap(), Some(Color::Red));
        board.set("f4".parse().unwrap(), Some(Color::Red));
        board.set("f5".parse().unwrap(), Some(Color::Red));
        let mut game = Game::from_board(board, Color::Black);
        assert!(game.make_move("i6".parse().unwrap(), "f6".parse().unwrap()));
        assert_eq!(game.captured(Color::Red), 3);
        assert!(Evaluator.score(&game) > 0);
    }

    #[test]
    fn material_lead_favors_black() {
        let mut board = Board::empty();
        board.set("e5".parse().unwrap(), Some(Color::Black));
        board.set("e4".parse().unwrap(), Some(Color::Black));
        board.set("a1".parse().unwrap(), Some(Color::Red));
        let game = Game::from_board(board, Color::Black);
        assert!(Evaluator.score(&game) > 0);
    }
}
