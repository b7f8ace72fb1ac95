mod pretty;

use crate::prelude::*;

/// A cell value: `None` is empty, `Some(c)` is occupied by color `c`.
pub type Cell = Option<Color>;

/// The 9x9 grid of cell values (spec.md §3 Board, §4.1).
///
/// No capture logic lives here; this is pure storage and coordinate helpers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    /// The starting configuration: RED on row `a`, BLACK on row `i`.
    fn default() -> Self {
        let mut cells = [[None; BOARD_SIZE]; BOARD_SIZE];
        for col in 0..BOARD_SIZE {
            cells[Color::Red.home_row() as usize][col] = Some(Color::Red);
            cells[Color::Black.home_row() as usize][col] = Some(Color::Black);
        }
        Board { cells }
    }
}

impl Board {
    /// An empty board, used by tests that seed custom positions.
    pub fn empty() -> Board {
        Board { cells: [[None; BOARD_SIZE]; BOARD_SIZE] }
    }

    /// Gets the value at a square. Panics if `sq` is out of bounds; callers
    /// are expected to have validated square legality upstream (spec.md §7,
    /// "illegal query").
    pub fn get(&self, sq: Square) -> Cell {
        assert!(sq.in_bounds(), "square {sq} out of bounds");
        self.cells[sq.row as usize][sq.col as usize]
    }

    /// Sets the value at a square, returning the previous value. Used only by
    /// the rules engine (spec.md §4.1).
    pub fn set(&mut self, sq: Square, c: Cell) -> Cell {
        assert!(sq.in_bounds(), "square {sq} out of bounds");
        let prev = self.cells[sq.row as usize][sq.col as usize];
        self.cells[sq.row as usize][sq.col as usize] = c;
        prev
    }

    /// All squares currently occupied by `color`.
    pub fn squares_by_color(&self, color: Color) -> BTreeSet<Square> {
        self.all_squares()
            .filter(|&sq| self.get(sq) == Some(color))
            .collect()
    }

    /// The occupied squares along `axis`, in canonical (sorted) order.
    pub fn occupied_on_axis(&self, axis: Axis) -> Vec<Square> {
        self.squares_on_axis(axis)
            .filter(|&sq| self.get(sq).is_some())
            .collect()
    }

    /// The empty squares along `axis`, in canonical (sorted) order.
    pub fn free_on_axis(&self, axis: Axis) -> Vec<Square> {
        self.squares_on_axis(axis)
            .filter(|&sq| self.get(sq).is_none())
            .collect()
    }

    /// The inclusive sequence of squares from `a` to `b`, in order from `a`
    /// towards `b`. Fails if `a` and `b` do not share a row or column
    /// (spec.md §4.1).
    pub fn build_range(&self, a: Square, b: Square) -> Result<Vec<Square>> {
        if a.row == b.row {
            let (lo, hi) = (a.col.min(b.col), a.col.max(b.col));
            let mut range: Vec<Square> = (lo..=hi).map(|c| Square::new(a.row, c)).collect();
            if a.col > b.col {
                range.reverse();
            }
            Ok(range)
        } else if a.col == b.col {
            let (lo, hi) = (a.row.min(b.row), a.row.max(b.row));
            let mut range: Vec<Square> = (lo..=hi).map(|r| Square::new(r, a.col)).collect();
            if a.row > b.row {
                range.reverse();
            }
            Ok(range)
        } else {
            Err(anyhow!("{a} and {b} are not co-linear"))
        }
    }

    /// The set of empty squares reachable from `sq` in a single legal sliding
    /// step: same row or column, no intervening stone. This is a from-scratch
    /// scan (O(board size)); the engine's hot path uses `TubeIndex` instead,
    /// this exists so that property tests (spec.md §8 P5) have an
    /// independent oracle to check the index-backed version against.
    pub fn reachable_from(&self, sq: Square) -> BTreeSet<Square> {
        let mut reachable = BTreeSet::new();
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            for delta in [1i16, -1i16] {
                let mut step = delta;
                while let Some(next) = sq.stepped(orientation, step) {
                    if self.get(next).is_some() {
                        break;
                    }
                    reachable.insert(next);
                    step += delta.signum();
                }
            }
        }
        reachable
    }

    /// All 81 squares, canonically ordered.
    pub fn all_squares(&self) -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE as u8).flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Square::new(row, col)))
    }

    fn squares_on_axis(&self, axis: Axis) -> impl Iterator<Item = Square> {
        let idx = axis.index();
        (0..BOARD_SIZE as u8).map(move |i| match axis {
            Axis::Row(_) => Square::new(idx, i),
            Axis::Col(_) => Square::new(i, idx),
        })
    }
}
