//! The empty-tube index (spec.md §4.3): structurally the cluster index's
//! twin, but over maximal runs of EMPTY cells rather than same-color stones.
//! Answers path-is-clear and reachable-from queries in O(1) instead of
//! O(board size) by keeping the runs up to date incrementally.

use crate::board::Board;
use crate::consts::Orientation;
use crate::prelude::*;
use crate::run::{scan_runs, Run, RunOpResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TubeId(usize);

/// Incrementally maintained over the whole board (spec.md §4.3). A stone's
/// placement is a *departure* from the tube world; a stone's removal is an
/// *arrival* — opposite polarity from the cluster index over the same board
/// mutation (spec.md §4.3, final paragraph).
#[derive(Clone, Debug)]
pub struct TubeIndex {
    tubes: HashMap<TubeId, Run<()>>,
    by_member: HashMap<Square, HashMap<Orientation, TubeId>>,
    by_border: HashMap<Square, Vec<TubeId>>,
    next_id: usize,
}

/// Same reasoning as `ClusterIndex`'s hand-written `PartialEq`: `TubeId`s are
/// reassigned on every split/merge and `next_id` never rewinds, so undo never
/// restores the same ids even when the board and every tube's content is back
/// to where it started. `by_member`/`by_border` are pure functions of the
/// live `Run<()>` set, so comparing that set alone is sufficient.
impl PartialEq for TubeIndex {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_tubes() == other.canonical_tubes()
    }
}

impl Eq for TubeIndex {}

impl TubeIndex {
    fn empty_index() -> TubeIndex {
        TubeIndex { tubes: HashMap::new(), by_member: HashMap::new(), by_border: HashMap::new(), next_id: 0 }
    }

    /// Builds the index from scratch over whatever `board` currently holds.
    pub fn from_board(board: &Board) -> TubeIndex {
        let mut idx = TubeIndex::empty_index();
        for row in 0..BOARD_SIZE as u8 {
            for run in scan_runs(
                Orientation::Horizontal,
                BOARD_SIZE,
                |c| board.get(Square::new(row, c as u8)).is_none().then_some(()),
                move |c| Square::new(row, c as u8),
            ) {
                idx.insert_tube(run);
            }
        }
        for col in 0..BOARD_SIZE as u8 {
            for run in scan_runs(
                Orientation::Vertical,
                BOARD_SIZE,
                |r| board.get(Square::new(r as u8, col)).is_none().then_some(()),
                move |r| Square::new(r as u8, col),
            ) {
                idx.insert_tube(run);
            }
        }
        idx
    }

    /// True iff there is an unobstructed line from `from` to `to`: some
    /// tube's members contain `to` and have `from` as a border.
    pub fn path_is_clear(&self, from: Square, to: Square) -> bool {
        let Some(orientations) = self.by_member.get(&to) else { return false };
        orientations.values().any(|id| {
            let tube = &self.tubes[id];
            tube.lower_border == Some(from) || tube.upper_border == Some(from)
        })
    }

    /// The union of member sets of every tube that has `sq` as a border.
    pub fn reachable_from(&self, sq: Square) -> BTreeSet<Square> {
        let mut reachable = BTreeSet::new();
        if let Some(ids) = self.by_border.get(&sq) {
            for id in ids {
                reachable.extend(self.tubes[id].members.iter().copied());
            }
        }
        reachable
    }

    /// `sq` just became empty (a stone departed): a new empty square joins
    /// the tube world.
    pub fn on_arrival(&mut self, sq: Square) {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let mut new_run = Run::singleton(orientation, (), sq);
            let merge_ids: Vec<TubeId> = self
                .by_border
                .get(&sq)
                .into_iter()
                .flatten()
                .copied()
                .filter(|id| self.tubes[id].orientation == orientation)
                .collect();
            for id in merge_ids {
                let tube = self.tubes.remove(&id).expect("invariant violation: dangling tube id");
                self.unindex(&tube, id);
                new_run = new_run.merge(&tube);
            }
            self.insert_tube(new_run);
        }
    }

    /// `sq` just became occupied (a stone arrived): it leaves the tube world.
    pub fn on_departure(&mut self, sq: Square) {
        let Some(member_entry) = self.by_member.remove(&sq) else {
            panic!("invariant violation: tube on_departure({sq}) but square had no member tubes");
        };
        for (_, id) in member_entry {
            let tube = self.tubes.remove(&id).expect("invariant violation: dangling tube id");
            self.unindex(&tube, id);
            match tube.release(sq) {
                RunOpResult::Removed => {}
                RunOpResult::Shrunk(run) => {
                    self.insert_tube(run);
                }
                RunOpResult::Split(a, b) => {
                    self.insert_tube(a);
                    self.insert_tube(b);
                }
            }
        }
    }

    fn insert_tube(&mut self, run: Run<()>) -> TubeId {
        let id = TubeId(self.next_id);
        self.next_id += 1;
        for &m in &run.members {
            self.by_member.entry(m).or_default().insert(run.orientation, id);
        }
        for b in [run.lower_border, run.upper_border].into_iter().flatten() {
            self.by_border.entry(b).or_default().push(id);
        }
        self.tubes.insert(id, run);
        id
    }

    fn unindex(&mut self, tube: &Run<()>, id: TubeId) {
        for &m in &tube.members {
            if let Some(map) = self.by_member.get_mut(&m) {
                map.remove(&tube.orientation);
                if map.is_empty() {
                    self.by_member.remove(&m);
                }
            }
        }
        for b in [tube.lower_border, tube.upper_border].into_iter().flatten() {
            if let Some(v) = self.by_border.get_mut(&b) {
                v.retain(|&x| x != id);
                if v.is_empty() {
                    self.by_border.remove(&b);
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn debug_member_orientations(&self, sq: Square) -> usize {
        self.by_member.get(&sq).map_or(0, |m| m.len())
    }

    /// Every live tube's content, independent of its (unstable) id, sorted
    /// into a canonical order so two indexes over identical boards compare
    /// equal regardless of insertion history.
    fn canonical_tubes(&self) -> Vec<&Run<()>> {
        let mut tubes: Vec<&Run<()>> = self.tubes.values().collect();
        tubes.sort_by_key(|t| (t.orientation, t.lower_occ()));
        tubes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_reachable_from_matches_board_scan() {
        // reachable_from is queried from occupied squares (a piece's own square).
        let board = Board::default();
        let idx = TubeIndex::from_board(&board);
        for sq in board.squares_by_color(Color::Red).into_iter().chain(board.squares_by_color(Color::Black)) {
            assert_eq!(idx.reachable_from(sq), board.reachable_from(sq), "mismatch at {sq}");
        }
    }

    #[test]
    fn every_empty_square_has_two_tubes() {
        let board = Board::default();
        let idx = TubeIndex::from_board(&board);
        for sq in board.all_squares() {
            if board.get(sq).is_none() {
                assert_eq!(idx.debug_member_orientations(sq), 2);
            }
        }
    }

    #[test]
    fn path_is_clear_along_empty_column() {
        let board = Board::default();
        let idx = TubeIndex::from_board(&board);
        assert!(idx.path_is_clear(Square::new(0, 4), Square::new(7, 4)));
        assert!(!idx.path_is_clear(Square::new(0, 4), Square::new(0, 0)));
    }
}
