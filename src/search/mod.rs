//! Alpha-beta minimax search (spec.md §4.7). BLACK maximizes, RED minimizes;
//! the evaluator is BLACK-oriented throughout, so the two sides compare raw
//! scores directly rather than negating between plies.

use std::cmp::Reverse;

use crate::consts::Orientation;
use crate::player::Player;
use crate::prelude::*;

/// `(best_move, score)`, replacing the tuple/`None`-sentinel pattern the
/// original drafts used (spec.md §9).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<MoveNotation>,
    pub score: i32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Search {
    evaluator: Evaluator,
}

const CENTRAL: std::ops::RangeInclusive<u8> = 3..=5;

impl Search {
    pub fn new() -> Search {
        Search { evaluator: Evaluator }
    }

    /// Recurses directly over `&mut Game` rather than a persistent pair of
    /// `Player` handles: the spec's "opposing_player.search" would require
    /// two simultaneous mutable borrows of one `Game`, which a single owner
    /// can't grant. A short-lived `Player` still applies and undoes each
    /// candidate (spec.md §4.7), it just doesn't outlive one loop iteration.
    pub fn search(&self, game: &mut Game, depth: u32, alpha: i32, beta: i32) -> SearchResult {
        if depth == 0 || game.game_state().is_terminal() {
            return SearchResult { best_move: None, score: self.evaluator.score(game) };
        }

        let active = game.active_color();
        let maximizing = active == Color::Black;
        let moves = self.ordered_moves(game);

        let mut alpha = alpha;
        let mut beta = beta;
        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for mv in moves {
            let applied = Player::new(game, active).make_move(mv.from, mv.to);
            debug_assert!(applied, "search proposed a move that Player::make_move rejected");

            let sub = self.search(game, depth - 1, alpha, beta);

            let undone = Player::new(game, active).undo_move();
            debug_assert!(undone, "search failed to undo its own candidate move");

            let better = if maximizing { sub.score > best_score } else { sub.score < best_score };
            if better {
                best_score = sub.score;
                best_move = Some(mv);
            }
            if maximizing {
                alpha = alpha.max(best_score);
            } else {
                beta = beta.min(best_score);
            }
            if beta <= alpha {
                break;
            }
        }

        SearchResult { best_move, score: best_score }
    }

    /// Four-tier move ordering (spec.md §4.7): captures by size, then
    /// threats, then central landings, then everything else.
    fn ordered_moves(&self, game: &Game) -> Vec<MoveNotation> {
        let active = game.active_color();
        let opponent = -active;

        let mut moves: Vec<MoveNotation> = game
            .board()
            .squares_by_color(active)
            .into_iter()
            .flat_map(|from| game.reachable_from(from).into_iter().map(move |to| MoveNotation { from, to }))
            .collect();

        let capture_value = |to: Square| -> usize {
            game.vulnerable(opponent).filter(|c| c.risky_border == Some(to)).map(|c| c.len()).sum()
        };
        let is_threat = |to: Square| -> bool {
            [Orientation::Horizontal, Orientation::Vertical].into_iter().any(|o| {
                [1i16, -1i16]
                    .into_iter()
                    .any(|d| to.stepped(o, d).is_some_and(|n| game.board().get(n) == Some(opponent)))
            })
        };
        let is_central = |sq: Square| CENTRAL.contains(&sq.row) && CENTRAL.contains(&sq.col);

        moves.sort_by_key(|m| {
            let cap = capture_value(m.to);
            if cap > 0 {
                (0u8, Reverse(cap))
            } else if is_threat(m.to) {
                (1u8, Reverse(0usize))
            } else if is_central(m.to) {
                (2u8, Reverse(0usize))
            } else {
                (3u8, Reverse(0usize))
            }
        });
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_returns_static_eval_and_no_move() {
        let mut game = Game::default();
        let result = Search::new().search(&mut game, 0, i32::MIN, i32::MAX);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, Evaluator.score(&game));
    }

    #[test]
    fn depth_one_picks_a_legal_move_and_restores_the_game() {
        // P6 (shallow soundness) plus an implicit reversibility check: the
        // board must be back to the starting position once search returns.
        let mut game = Game::default();
        let before = game.board().squares_by_color(Color::Black);
        let result = Search::new().search(&mut game, 1, i32::MIN, i32::MAX);
        assert!(result.best_move.is_some());
        assert_eq!(game.board().squares_by_color(Color::Black), before);
        assert_eq!(game.active_color(), Color::Black);

        let mv = result.best_move.unwrap();
        let player = Player::new(&mut game, Color::Black);
        assert!(player.get_pieces().contains(&mv.from));
    }

    #[test]
    fn depth_one_matches_best_child_score() {
        let mut game = Game::default();
        let result = Search::new().search(&mut game, 1, i32::MIN, i32::MAX);
        let mv = result.best_move.unwrap();
        assert!(game.make_move(mv.from, mv.to));
        let child_score = Evaluator.score(&game);
        assert!(game.undo_move());
        assert_eq!(result.score, child_score);
    }
}
