//! The capture-cluster index (spec.md §4.2).
//!
//! Maintains, for the whole board, every maximal same-color run of stones
//! along each orientation, and which of those runs are presently one enemy
//! move from capture (`risky_border`). Updated incrementally on every cell
//! mutation by [`ClusterIndex::on_departure`]/[`ClusterIndex::on_arrival`],
//! never recomputed from scratch on the hot path.

use crate::board::Board;
use crate::consts::Orientation;
use crate::prelude::*;
use crate::run::{scan_runs, Run, RunOpResult};

/// Opaque identifier for a live cluster. Stable for the cluster's lifetime;
/// reused ids are never handed out while a cluster is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

/// A maximal same-color run plus its derived `risky_border` (spec.md §3 C4).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    pub run: Run<Color>,
    pub risky_border: Option<Square>,
}

impl Cluster {
    pub fn color(&self) -> Color {
        self.run.value
    }

    pub fn orientation(&self) -> Orientation {
        self.run.orientation
    }

    pub fn members(&self) -> &[Square] {
        &self.run.members
    }

    pub fn len(&self) -> usize {
        self.run.len()
    }

    pub fn is_vulnerable(&self) -> bool {
        self.risky_border.is_some()
    }
}

/// Incrementally maintained over the whole board (spec.md §4.2).
#[derive(Clone, Debug)]
pub struct ClusterIndex {
    clusters: HashMap<ClusterId, Cluster>,
    by_member: HashMap<Square, HashMap<Orientation, ClusterId>>,
    by_border: HashMap<Square, Vec<ClusterId>>,
    by_color: HashMap<Color, HashSet<ClusterId>>,
    vulnerable_per_color: HashMap<Color, HashSet<ClusterId>>,
    just_captured_squares: HashSet<Square>,
    next_id: usize,
}

/// `ClusterId`s are assigned monotonically and never restored by `undo_move`
/// (an apply/undo pair leaves `next_id` larger and every live id reassigned),
/// so comparing the id-keyed maps or `next_id` directly would make two
/// boardwise-identical indexes compare unequal. Equality instead compares the
/// content of every live `Cluster` -- `by_member`/`by_border`/`by_color`/
/// `vulnerable_per_color` are all pure functions of that set, so comparing it
/// alone is exactly the reversibility contract spec.md §4.7 (P3) asks for.
impl PartialEq for ClusterIndex {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_clusters() == other.canonical_clusters()
    }
}

impl Eq for ClusterIndex {}

fn compute_risky_border(run: &Run<Color>, board: &Board) -> Option<Square> {
    let (Some(lower), Some(upper)) = (run.lower_border, run.upper_border) else {
        return None;
    };
    let opposite = -run.value;
    if board.get(upper) == Some(opposite) && board.get(lower).is_none() {
        return Some(lower);
    }
    if board.get(lower) == Some(opposite) && board.get(upper).is_none() {
        return Some(upper);
    }
    None
}

impl ClusterIndex {
    fn empty() -> ClusterIndex {
        ClusterIndex {
            clusters: HashMap::new(),
            by_member: HashMap::new(),
            by_border: HashMap::new(),
            by_color: HashMap::new(),
            vulnerable_per_color: HashMap::new(),
            just_captured_squares: HashSet::new(),
            next_id: 0,
        }
    }

    /// Builds the index from scratch over whatever `board` currently holds:
    /// one horizontal and one vertical run per maximal same-color run
    /// (spec.md §4.2 initialization, generalized to arbitrary boards so
    /// seeded test positions build the same way the starting position does).
    pub fn from_board(board: &Board) -> ClusterIndex {
        let mut idx = ClusterIndex::empty();
        for row in 0..BOARD_SIZE as u8 {
            for run in scan_runs(
                Orientation::Horizontal,
                BOARD_SIZE,
                |c| board.get(Square::new(row, c as u8)),
                move |c| Square::new(row, c as u8),
            ) {
                idx.insert_cluster(run, board);
            }
        }
        for col in 0..BOARD_SIZE as u8 {
            for run in scan_runs(
                Orientation::Vertical,
                BOARD_SIZE,
                |r| board.get(Square::new(r as u8, col)),
                move |r| Square::new(r as u8, col),
            ) {
                idx.insert_cluster(run, board);
            }
        }
        idx
    }

    /// The squares captured by the most recent `on_arrival` call's linear
    /// resolution (spec.md §4.4 step 5). Cleared by the rules engine before
    /// each move (spec.md §4.4 step 1).
    pub fn just_captured_squares(&self) -> &HashSet<Square> {
        &self.just_captured_squares
    }

    pub fn clear_just_captured(&mut self) {
        self.just_captured_squares.clear();
    }

    /// Own clusters of `color` with a non-empty `risky_border`.
    pub fn vulnerable(&self, color: Color) -> impl Iterator<Item = &Cluster> {
        self.vulnerable_per_color
            .get(&color)
            .into_iter()
            .flatten()
            .map(move |id| &self.clusters[id])
    }

    pub fn clusters_of_color(&self, color: Color) -> impl Iterator<Item = &Cluster> {
        self.by_color.get(&color).into_iter().flatten().map(move |id| &self.clusters[id])
    }

    /// The cluster of a given orientation containing `sq`, if `sq` is
    /// occupied. Panics (an illegal query, spec.md §7) if `sq` is empty and
    /// queried as a member.
    pub fn cluster_at(&self, sq: Square, orientation: Orientation) -> Option<&Cluster> {
        self.by_member.get(&sq).and_then(|m| m.get(&orientation)).map(|id| &self.clusters[id])
    }

    /// Square `sq` just transitioned from occupied to empty; the board cell
    /// itself has already been updated (spec.md §4.2 `on_departure`).
    pub fn on_departure(&mut self, board: &Board, sq: Square) {
        let Some(member_entry) = self.by_member.remove(&sq) else {
            panic!("invariant violation: on_departure({sq}) but square had no member clusters");
        };
        for (_, id) in member_entry {
            let cluster = self.clusters.remove(&id).expect("invariant violation: dangling cluster id");
            self.unindex(&cluster, id);
            match cluster.run.release(sq) {
                RunOpResult::Removed => {}
                RunOpResult::Shrunk(run) => {
                    self.insert_cluster(run, board);
                }
                RunOpResult::Split(a, b) => {
                    self.insert_cluster(a, board);
                    self.insert_cluster(b, board);
                }
            }
        }
        self.refresh_at(sq, board);
    }

    /// Square `sq` just transitioned from empty to `color`; the board cell
    /// itself has already been updated (spec.md §4.2 `on_arrival`).
    pub fn on_arrival(&mut self, board: &Board, sq: Square, color: Color) {
        self.detect_linear_captures(sq, color);
        self.arrive(board, sq, color);
    }

    /// Structural half of `on_arrival`, without linear-capture detection.
    /// Used both by `on_arrival` itself and by `undo_move` to restore a
    /// square's previous occupant — undo replays board mutations in reverse,
    /// and must not re-trigger capture bookkeeping while doing so.
    pub(crate) fn restore_arrival(&mut self, board: &Board, sq: Square, color: Color) {
        self.arrive(board, sq, color);
    }

    fn arrive(&mut self, board: &Board, sq: Square, color: Color) {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let mut new_run = Run::singleton(orientation, color, sq);
            let merge_ids: Vec<ClusterId> = self
                .by_border
                .get(&sq)
                .into_iter()
                .flatten()
                .copied()
                .filter(|id| {
                    let c = &self.clusters[id];
                    c.run.orientation == orientation && c.run.value == color
                })
                .collect();
            for id in merge_ids {
                let c = self.clusters.remove(&id).expect("invariant violation: dangling cluster id");
                self.unindex(&c, id);
                new_run = new_run.merge(&c.run);
            }
            self.insert_cluster(new_run, board);
        }

        self.refresh_at(sq, board);
    }

    /// Every opponent cluster bordering `sq` whose `risky_border` is
    /// precisely `sq` is captured in full by this arrival (spec.md §4.4
    /// linear capture rule; spec.md §4.2 C4).
    fn detect_linear_captures(&mut self, sq: Square, color: Color) {
        let captured: Vec<Square> = self
            .by_border
            .get(&sq)
            .into_iter()
            .flatten()
            .filter_map(|id| {
                let c = &self.clusters[id];
                (c.run.value != color && c.risky_border == Some(sq)).then(|| c.run.members.clone())
            })
            .flatten()
            .collect();
        self.just_captured_squares.extend(captured);
    }

    fn refresh_at(&mut self, sq: Square, board: &Board) {
        let mut ids: HashSet<ClusterId> = HashSet::new();
        if let Some(m) = self.by_member.get(&sq) {
            ids.extend(m.values().copied());
        }
        if let Some(b) = self.by_border.get(&sq) {
            ids.extend(b.iter().copied());
        }
        for id in ids {
            self.recompute_risky(id, board);
        }
    }

    fn recompute_risky(&mut self, id: ClusterId, board: &Board) {
        let Some(cluster) = self.clusters.get(&id) else { return };
        let color = cluster.color();
        let new_risky = compute_risky_border(&cluster.run, board);
        let cluster = self.clusters.get_mut(&id).unwrap();
        let old_risky = cluster.risky_border;
        cluster.risky_border = new_risky;
        match (old_risky, new_risky) {
            (None, Some(_)) => {
                self.vulnerable_per_color.entry(color).or_default().insert(id);
            }
            (Some(_), None) => {
                if let Some(set) = self.vulnerable_per_color.get_mut(&color) {
                    set.remove(&id);
                }
            }
            _ => {}
        }
    }

    fn insert_cluster(&mut self, run: Run<Color>, board: &Board) -> ClusterId {
        let id = ClusterId(self.next_id);
        self.next_id += 1;
        let risky_border = compute_risky_border(&run, board);

        for &m in &run.members {
            self.by_member.entry(m).or_default().insert(run.orientation, id);
        }
        for b in [run.lower_border, run.upper_border].into_iter().flatten() {
            self.by_border.entry(b).or_default().push(id);
        }
        self.by_color.entry(run.value).or_default().insert(id);
        if risky_border.is_some() {
            self.vulnerable_per_color.entry(run.value).or_default().insert(id);
        }

        self.clusters.insert(id, Cluster { run, risky_border });
        id
    }

    fn unindex(&mut self, cluster: &Cluster, id: ClusterId) {
        for &m in &cluster.run.members {
            if let Some(map) = self.by_member.get_mut(&m) {
                map.remove(&cluster.run.orientation);
                if map.is_empty() {
                    self.by_member.remove(&m);
                }
            }
        }
        for b in [cluster.run.lower_border, cluster.run.upper_border].into_iter().flatten() {
            if let Some(v) = self.by_border.get_mut(&b) {
                v.retain(|&x| x != id);
                if v.is_empty() {
                    self.by_border.remove(&b);
                }
            }
        }
        if let Some(set) = self.by_color.get_mut(&cluster.run.value) {
            set.remove(&id);
        }
        if let Some(set) = self.vulnerable_per_color.get_mut(&cluster.run.value) {
            set.remove(&id);
        }
    }

    /// Every live cluster's content, independent of its (unstable) id, sorted
    /// into a canonical order so two indexes over identical boards compare
    /// equal regardless of insertion history.
    fn canonical_clusters(&self) -> Vec<&Cluster> {
        let mut clusters: Vec<&Cluster> = self.clusters.values().collect();
        clusters.sort_by_key(|c| (c.orientation(), c.run.lower_occ()));
        clusters
    }

    /// Every occupied square, paired with its horizontal and vertical
    /// cluster ids — used by property tests to check C1/C2 (spec.md §8 P1).
    #[cfg(test)]
    pub(crate) fn debug_all_clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    #[cfg(test)]
    pub(crate) fn debug_member_orientations(&self, sq: Square) -> usize {
        self.by_member.get(&sq).map_or(0, |m| m.len())
    }
}
