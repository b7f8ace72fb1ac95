//! The rules engine (spec.md §4.4): legality, move execution, capture
//! resolution, and the reversible move log. `Game` owns the board and both
//! indexes and is the only thing permitted to mutate them.

use crate::board::Board;
use crate::cluster::ClusterIndex;
use crate::prelude::*;
use crate::tube::TubeIndex;

/// A move-log entry: enough to invert the move exactly (spec.md §3 Move record).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub color: Color,
    pub from: Square,
    pub to: Square,
    pub captured_color: Option<Color>,
    pub captured_squares: Vec<Square>,
}

/// Owns Board, ClusterIndex, TubeIndex, captured-counts, active color, state,
/// and move_log (spec.md §3 Game). Mutated only via `make_move`/`undo_move`.
/// Derives `PartialEq` so the reversibility contract (spec.md §4.7, P3) can
/// be checked as `game_before == game_after_apply_then_undo`; this is sound
/// because `ClusterIndex`/`TubeIndex` compare by content rather than by the
/// internal ids `undo_move` never restores (see their own `PartialEq` impls).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    clusters: ClusterIndex,
    tubes: TubeIndex,
    captured: HashMap<Color, u32>,
    active: Color,
    state: GameState,
    move_log: Vec<MoveRecord>,
}

impl Default for Game {
    fn default() -> Game {
        let board = Board::default();
        Game {
            clusters: ClusterIndex::from_board(&board),
            tubes: TubeIndex::from_board(&board),
            board,
            captured: HashMap::from([(Color::Red, 0), (Color::Black, 0)]),
            active: Color::Black,
            state: GameState::Ongoing,
            move_log: Vec::new(),
        }
    }
}

impl Game {
    /// A game seeded from an arbitrary board, used by tests (spec.md §8
    /// scenarios S3/S4/S5/S6 all start from non-default seeds).
    pub fn from_board(board: Board, active: Color) -> Game {
        Game {
            clusters: ClusterIndex::from_board(&board),
            tubes: TubeIndex::from_board(&board),
            board,
            captured: HashMap::from([(Color::Red, 0), (Color::Black, 0)]),
            active,
            state: GameState::Ongoing,
            move_log: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_color(&self) -> Color {
        self.active
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn captured(&self, c: Color) -> u32 {
        self.captured.get(&c).copied().unwrap_or(0)
    }

    /// The set of empty squares reachable from `sq` in one sliding step
    /// (spec.md §4.4 `reachable_from`), served from `TubeIndex`.
    pub fn reachable_from(&self, sq: Square) -> BTreeSet<Square> {
        self.tubes.reachable_from(sq)
    }

    pub fn vulnerable(&self, color: Color) -> impl Iterator<Item = &crate::cluster::Cluster> {
        self.clusters.vulnerable(color)
    }

    /// The cluster of a given orientation containing `sq`, if `sq` is
    /// occupied (spec.md §4.2). Used by property tests to check C1/C2.
    pub fn cluster_at(&self, sq: Square, orientation: crate::consts::Orientation) -> Option<&crate::cluster::Cluster> {
        self.clusters.cluster_at(sq, orientation)
    }

    pub fn tubes(&self) -> &TubeIndex {
        &self.tubes
    }

    /// The squares emptied by the most recently applied move (spec.md §6,
    /// "for just-resolved captures, the set of squares the engine emptied").
    pub fn last_captures(&self) -> &[Square] {
        self.move_log.last().map_or(&[], |r| &r.captured_squares)
    }

    pub fn pretty(&self) -> String {
        self.board.pretty()
    }

    fn is_legal(&self, from: Square, to: Square) -> bool {
        if self.state.is_terminal() {
            return false; // L1
        }
        if !from.in_bounds() || !to.in_bounds() {
            return false; // L2
        }
        if self.board.get(from) != Some(self.active) {
            return false; // L3
        }
        if from == to {
            return false; // L4
        }
        if !from.shares_axis(&to) {
            return false; // L5
        }
        self.tubes.path_is_clear(from, to) // L6
    }

    /// Validates, applies, and resolves captures for a single half-move
    /// (spec.md §4.4 `make_move`). Returns `false` and leaves state untouched
    /// if the move is illegal.
    pub fn make_move(&mut self, from: Square, to: Square) -> bool {
        if !self.is_legal(from, to) {
            return false;
        }
        let color = self.active;

        // Step 1.
        self.clusters.clear_just_captured();

        // Step 2.
        self.board.set(from, None);
        self.clusters.on_departure(&self.board, from);
        self.tubes.on_arrival(from);

        // Step 3.
        self.board.set(to, Some(color));
        self.clusters.on_arrival(&self.board, to, color);
        self.tubes.on_departure(to);

        // Step 4.
        let mut captured_squares: Vec<Square> = Vec::new();

        // Step 5: linear captures.
        let mut linear: Vec<Square> = self.clusters.just_captured_squares().iter().copied().collect();
        linear.sort();
        captured_squares.append(&mut linear);

        // Step 6: corner capture.
        if let Some(corner) = self.corner_capture(to, color) {
            if !captured_squares.contains(&corner) {
                captured_squares.push(corner);
            }
        }

        // Step 7.
        let loser = -color;
        for &sq in &captured_squares {
            self.board.set(sq, None);
            self.clusters.on_departure(&self.board, sq);
            self.tubes.on_arrival(sq);
        }
        *self.captured.entry(loser).or_insert(0) += captured_squares.len() as u32;

        self.move_log.push(MoveRecord {
            color,
            from,
            to,
            captured_color: (!captured_squares.is_empty()).then_some(loser),
            captured_squares,
        });

        // Step 8.
        if self.captured(Color::Red) >= CAPTURES_TO_WIN {
            self.state = GameState::BlackWon;
        } else if self.captured(Color::Black) >= CAPTURES_TO_WIN {
            self.state = GameState::RedWon;
        }

        // Step 9.
        self.active = -self.active;

        // Keeps the scratch accumulator empty at rest (cleared at the top of
        // the next make_move regardless, but this keeps undo's restoration
        // symmetric with a freshly-built index).
        self.clusters.clear_just_captured();

        true
    }

    /// A stone of the opposite color sits on a corner and both of its
    /// orthogonal neighbours are now occupied by `color`, with `to` being one
    /// of those two neighbours (spec.md §4.4 corner capture rule).
    fn corner_capture(&self, to: Square, color: Color) -> Option<Square> {
        for (i, pair) in CORNER_PAIR_SQUARES.iter().enumerate() {
            let neighbours = [Square::new(pair[0].0, pair[0].1), Square::new(pair[1].0, pair[1].1)];
            if !neighbours.contains(&to) {
                continue;
            }
            if neighbours.iter().all(|&sq| self.board.get(sq) == Some(color)) {
                let corner = Square::new(CORNERS[i].0, CORNERS[i].1);
                if self.board.get(corner) == Some(-color) {
                    return Some(corner);
                }
            }
        }
        None
    }

    /// Pops the last move-log entry and inverts it exactly (spec.md §4.4
    /// `undo_move`). Returns `false` if there is nothing to undo.
    pub fn undo_move(&mut self) -> bool {
        let Some(record) = self.move_log.pop() else { return false };

        self.active = -self.active;

        if let Some(loser) = record.captured_color {
            for &sq in record.captured_squares.iter().rev() {
                self.board.set(sq, Some(loser));
                self.clusters.restore_arrival(&self.board, sq, loser);
                self.tubes.on_departure(sq);
            }
            let count = self.captured.entry(loser).or_insert(0);
            *count -= record.captured_squares.len() as u32;
        }

        self.board.set(record.to, None);
        self.clusters.on_departure(&self.board, record.to);
        self.tubes.on_arrival(record.to);

        self.board.set(record.from, Some(record.color));
        self.clusters.restore_arrival(&self.board, record.from, record.color);
        self.tubes.on_departure(record.from);

        self.clusters.clear_just_captured();
        self.state = GameState::Ongoing;
        true
    }
}
