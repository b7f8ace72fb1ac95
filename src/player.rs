//! A thin facade over [`Game`], scoped to one color (spec.md §4.5). `Search`
//! drives the game exclusively through a pair of these rather than touching
//! `Game` directly, mirroring the teacher's `Player`/`Agent` split.

use crate::prelude::*;

pub struct Player<'g> {
    game: &'g mut Game,
    color: Color,
}

impl<'g> Player<'g> {
    pub fn new(game: &'g mut Game, color: Color) -> Player<'g> {
        Player { game, color }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn game(&self) -> &Game {
        self.game
    }

    /// The set of squares this color currently occupies, read live from the
    /// board rather than cached (spec.md §4.5).
    pub fn get_pieces(&self) -> BTreeSet<Square> {
        self.game.board().squares_by_color(self.color)
    }

    /// Every `(piece, destination)` pair reachable from one of this color's
    /// pieces (spec.md §4.5): `{piece ∘ dest : dest ∈ reachable_from(piece)}`.
    pub fn valid_moves(&self) -> Vec<MoveNotation> {
        let mut moves = Vec::new();
        for piece in self.get_pieces() {
            for dest in self.game.reachable_from(piece) {
                moves.push(MoveNotation { from: piece, to: dest });
            }
        }
        moves
    }

    /// Forwards to `Game::make_move`, rejecting moves whose `from` square
    /// isn't this player's own piece (spec.md §7 "illegal query": asking to
    /// move a piece that is not the player's color).
    pub fn make_move(&mut self, from: Square, to: Square) -> bool {
        if self.game.board().get(from) != Some(self.color) {
            return false;
        }
        self.game.make_move(from, to)
    }

    pub fn undo_move(&mut self) -> bool {
        self.game.undo_move()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_moves_enumerates_every_reachable_destination() {
        let mut game = Game::default();
        let player = Player::new(&mut game, Color::Black);
        // BLACK's home row has 9 pieces, each with exactly one empty tube
        // ahead of it spanning rows b..h (7 destinations) plus however many
        // sideways slides its own row offers once a piece has moved; at the
        // start, sideways is blocked by neighbouring stones, so each piece
        // has exactly 7 forward destinations.
        assert_eq!(player.valid_moves().len(), 9 * 7);
    }

    #[test]
    fn make_move_rejects_moving_the_opponents_piece() {
        let mut game = Game::default();
        let mut player = Player::new(&mut game, Color::Black);
        assert!(!player.make_move("a4".parse().unwrap(), "e4".parse().unwrap()));
    }
}
