//! A generic maximal contiguous run along one axis.
//!
//! Both the capture-cluster index (spec.md §4.2) and the empty-tube index
//! (spec.md §4.3) are, structurally, the same thing: a maximal run of
//! same-valued cells along a row or column, with endpoints and borders. This
//! module factors that shared machinery out once, the way the teacher
//! factors `CoordSet`/`MoveSet` through a single `SetOps` trait
//! (`battle_of_lits/sets/mod.rs`) instead of duplicating bitset code per
//! concrete type. `ClusterIndex` instantiates `Run<Color>`; `TubeIndex`
//! instantiates `Run<()>` (a tube's value is always "empty", so there is
//! nothing to distinguish between tubes besides position).

use crate::coords::Square;
use crate::consts::Orientation;

/// A maximal contiguous run of same-valued cells along `orientation`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run<T> {
    pub orientation: Orientation,
    pub value: T,
    /// Sorted ascending along the axis.
    pub members: Vec<Square>,
    pub lower_border: Option<Square>,
    pub upper_border: Option<Square>,
}

/// The result of releasing a member square from a run: it shrinks to one run,
/// splits into two, or (a singleton releasing itself) disappears entirely.
#[derive(Clone, Debug)]
pub enum RunOpResult<T> {
    Removed,
    Shrunk(Run<T>),
    Split(Run<T>, Run<T>),
}

fn border_before<T>(orientation: Orientation, sq: Square) -> Option<Square> {
    sq.stepped(orientation, -1)
}

fn border_after<T>(orientation: Orientation, sq: Square) -> Option<Square> {
    sq.stepped(orientation, 1)
}

impl<T: Copy + PartialEq> Run<T> {
    /// A freshly-created run consisting of exactly `sq`.
    pub fn singleton(orientation: Orientation, value: T, sq: Square) -> Run<T> {
        Run {
            orientation,
            value,
            members: vec![sq],
            lower_border: sq.stepped(orientation, -1),
            upper_border: sq.stepped(orientation, 1),
        }
    }

    pub fn lower_occ(&self) -> Square {
        *self.members.first().expect("invariant violation: run has no members")
    }

    pub fn upper_occ(&self) -> Square {
        *self.members.last().expect("invariant violation: run has no members")
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, sq: Square) -> bool {
        self.members.binary_search(&sq).is_ok()
    }

    /// Releases `sq` from this run, producing 0, 1, or 2 resulting runs
    /// (spec.md §4.2 `release`). Panics — a fatal invariant violation per
    /// spec.md §7 — if `sq` is not a member of this run.
    pub fn release(&self, sq: Square) -> RunOpResult<T> {
        let idx = self
            .members
            .iter()
            .position(|&m| m == sq)
            .unwrap_or_else(|| panic!("invariant violation: release({sq}) on a run not containing it"));

        if self.members.len() == 1 {
            return RunOpResult::Removed;
        }

        if idx == 0 {
            let mut members = self.members.clone();
            members.remove(0);
            let lower_border = border_before::<T>(self.orientation, members[0]);
            RunOpResult::Shrunk(Run {
                orientation: self.orientation,
                value: self.value,
                members,
                lower_border,
                upper_border: self.upper_border,
            })
        } else if idx == self.members.len() - 1 {
            let mut members = self.members.clone();
            members.pop();
            let last = *members.last().expect("shrunk run cannot be empty here");
            let upper_border = border_after::<T>(self.orientation, last);
            RunOpResult::Shrunk(Run {
                orientation: self.orientation,
                value: self.value,
                members,
                lower_border: self.lower_border,
                upper_border,
            })
        } else {
            let left_members = self.members[..idx].to_vec();
            let right_members = self.members[idx + 1..].to_vec();
            let left = Run {
                orientation: self.orientation,
                value: self.value,
                lower_border: self.lower_border,
                upper_border: Some(sq),
                members: left_members,
            };
            let right = Run {
                orientation: self.orientation,
                value: self.value,
                lower_border: Some(sq),
                upper_border: self.upper_border,
                members: right_members,
            };
            RunOpResult::Split(left, right)
        }
    }

    /// Merges `self` and `other` into one run. Requires same orientation,
    /// same value, and that one run's upper border is the other's lower
    /// occupied endpoint (spec.md §4.2 `merge`). Panics — a fatal invariant
    /// violation — otherwise.
    pub fn merge(&self, other: &Run<T>) -> Run<T> {
        assert_eq!(
            self.orientation, other.orientation,
            "invariant violation: merge of runs with different orientation"
        );
        assert!(
            self.value == other.value,
            "invariant violation: merge of runs with different value"
        );

        let (lower, upper) = if self.upper_border == Some(other.lower_occ()) {
            (self, other)
        } else if other.upper_border == Some(self.lower_occ()) {
            (other, self)
        } else {
            panic!("invariant violation: merge of non-adjoining runs");
        };

        let mut members = lower.members.clone();
        members.extend(upper.members.iter().copied());
        Run {
            orientation: self.orientation,
            value: self.value,
            members,
            lower_border: lower.lower_border,
            upper_border: upper.upper_border,
        }
    }
}

/// Scans one axis (a row or a column, `len` cells long) into maximal runs of
/// equal `value_at(i)` results, skipping `None` (empty/no-value) cells. Used
/// to build a `ClusterIndex` or `TubeIndex` from scratch over an arbitrary
/// board (spec.md §4.2/§4.3 initialization, generalized beyond the fixed
/// starting position so seeded test positions can be indexed the same way).
pub fn scan_runs<T: Copy + PartialEq>(
    orientation: Orientation,
    len: usize,
    value_at: impl Fn(usize) -> Option<T>,
    to_square: impl Fn(usize) -> Square,
) -> Vec<Run<T>> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < len {
        let Some(v) = value_at(i) else {
            i += 1;
            continue;
        };
        let start = i;
        while i < len && value_at(i) == Some(v) {
            i += 1;
        }
        let members: Vec<Square> = (start..i).map(&to_square).collect();
        let lower_border = to_square(start).stepped(orientation, -1);
        let upper_border = to_square(i - 1).stepped(orientation, 1);
        runs.push(Run { orientation, value: v, members, lower_border, upper_border });
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col)
    }

    #[test]
    fn singleton_has_symmetric_borders() {
        let run = Run::singleton(Orientation::Horizontal, 'x', sq(4, 4));
        assert_eq!(run.lower_border, Some(sq(4, 3)));
        assert_eq!(run.upper_border, Some(sq(4, 5)));
    }

    #[test]
    fn release_interior_splits() {
        let run = Run {
            orientation: Orientation::Horizontal,
            value: 'x',
            members: vec![sq(4, 2), sq(4, 3), sq(4, 4)],
            lower_border: Some(sq(4, 1)),
            upper_border: Some(sq(4, 5)),
        };
        match run.release(sq(4, 3)) {
            RunOpResult::Split(left, right) => {
                assert_eq!(left.members, vec![sq(4, 2)]);
                assert_eq!(left.upper_border, Some(sq(4, 3)));
                assert_eq!(right.members, vec![sq(4, 4)]);
                assert_eq!(right.lower_border, Some(sq(4, 3)));
            }
            other => panic!("expected a split, got {other:?}"),
        }
    }

    #[test]
    fn release_endpoint_shrinks() {
        let run = Run {
            orientation: Orientation::Horizontal,
            value: 'x',
            members: vec![sq(4, 2), sq(4, 3), sq(4, 4)],
            lower_border: Some(sq(4, 1)),
            upper_border: Some(sq(4, 5)),
        };
        match run.release(sq(4, 2)) {
            RunOpResult::Shrunk(shrunk) => {
                assert_eq!(shrunk.members, vec![sq(4, 3), sq(4, 4)]);
                assert_eq!(shrunk.lower_border, Some(sq(4, 2)));
            }
            other => panic!("expected a shrink, got {other:?}"),
        }
    }

    #[test]
    fn release_singleton_removes() {
        let run = Run::singleton(Orientation::Vertical, 'x', sq(3, 3));
        assert!(matches!(run.release(sq(3, 3)), RunOpResult::Removed));
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn release_non_member_panics() {
        let run = Run::singleton(Orientation::Vertical, 'x', sq(3, 3));
        run.release(sq(0, 0));
    }

    #[test]
    fn merge_concatenates_members_in_order() {
        let left = Run {
            orientation: Orientation::Vertical,
            value: 'x',
            members: vec![sq(1, 1), sq(2, 1)],
            lower_border: Some(sq(0, 1)),
            upper_border: Some(sq(3, 1)),
        };
        let right = Run::singleton(Orientation::Vertical, 'x', sq(3, 1));
        let merged = left.merge(&right);
        assert_eq!(merged.members, vec![sq(1, 1), sq(2, 1), sq(3, 1)]);
        assert_eq!(merged.lower_border, Some(sq(0, 1)));
        assert_eq!(merged.upper_border, sq(3, 1).stepped(Orientation::Vertical, 1));
    }
}
