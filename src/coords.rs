//! Board coordinates and the row/column notation used at the external boundary.

use crate::consts::{Orientation, BOARD_SIZE};
use crate::prelude::*;

/// A square on the board, identified by a zero-based `(row, col)` pair, `0..9`
/// each. Canonical ordering is lexicographic on `(row, col)` (spec.md §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub fn new(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    /// Whether this square lies on the 9x9 board.
    pub fn in_bounds(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Row letter, `a`..`i`.
    pub fn row_letter(&self) -> char {
        (b'a' + self.row) as char
    }

    /// Column digit, `1`..`9`.
    pub fn col_digit(&self) -> char {
        (b'1' + self.col) as char
    }

    /// Canonical two-character notation, e.g. `e5`.
    pub fn notate(&self) -> String {
        format!("{}{}", self.row_letter(), self.col_digit())
    }

    /// Whether `self` and `other` share a row or column.
    pub fn shares_axis(&self, other: &Square) -> bool {
        self.row == other.row || self.col == other.col
    }

    /// The axis (orientation + index) this square lies on for the given
    /// orientation: the row index for `Horizontal`, the column index for
    /// `Vertical`.
    pub fn axis_index(&self, orientation: Orientation) -> u8 {
        match orientation {
            Orientation::Horizontal => self.row,
            Orientation::Vertical => self.col,
        }
    }

    /// The square offset by `delta` along `orientation`'s axis index, or
    /// `None` if it would fall off the board.
    pub fn stepped(&self, orientation: Orientation, delta: i16) -> Option<Square> {
        let (row, col) = match orientation {
            Orientation::Horizontal => (self.row as i16, self.col as i16 + delta),
            Orientation::Vertical => (self.row as i16 + delta, self.col as i16),
        };
        if (0..BOARD_SIZE as i16).contains(&row) && (0..BOARD_SIZE as i16).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// The corner index (0..4) this square is, matching [`crate::consts::CORNERS`],
    /// if it is a corner.
    pub fn corner_index(&self) -> Option<usize> {
        crate::consts::CORNERS
            .iter()
            .position(|&(r, c)| r == self.row && c == self.col)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notate())
    }
}

impl std::str::FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(anyhow!("expected a 2-character square notation, received {s}"));
        }
        let row_ch = chars[0].to_ascii_lowercase();
        if !('a'..='i').contains(&row_ch) {
            return Err(anyhow!("row letter must be a..i, received {row_ch}"));
        }
        let col_ch = chars[1];
        if !('1'..='9').contains(&col_ch) {
            return Err(anyhow!("column digit must be 1..9, received {col_ch}"));
        }
        let row = row_ch as u8 - b'a';
        let col = col_ch as u8 - b'1';
        Ok(Square::new(row, col))
    }
}

/// A move from one square to another, the four-character notation of
/// spec.md §6 (`<from><to>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveNotation {
    pub from: Square,
    pub to: Square,
}

impl std::str::FromStr for MoveNotation {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.len() != 4 {
            return Err(anyhow!("expected a 4-character move notation, received {s}"));
        }
        let from = s[0..2].parse::<Square>().context("parsing from-square")?;
        let to = s[2..4].parse::<Square>().context("parsing to-square")?;
        Ok(MoveNotation { from, to })
    }
}

/// An axis identifier: a row letter or a column digit, used by
/// [`crate::board::Board::occupied_on_axis`] and friends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Row(u8),
    Col(u8),
}

impl Axis {
    pub fn orientation(&self) -> Orientation {
        match self {
            Axis::Row(_) => Orientation::Horizontal,
            Axis::Col(_) => Orientation::Vertical,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Axis::Row(r) => *r,
            Axis::Col(c) => *c,
        }
    }
}
