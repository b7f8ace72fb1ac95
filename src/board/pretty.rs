use super::Board;
use crate::consts::BOARD_SIZE;
use crate::coords::Square;

impl Board {
    /// Renders the board as a 9-row ASCII grid with row letters and column
    /// digits (spec.md §6): `.` for empty, `R`/`B` for stones.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        out.push_str("  1 2 3 4 5 6 7 8 9\n");
        for row in 0..BOARD_SIZE as u8 {
            out.push((b'a' + row) as char);
            out.push(' ');
            for col in 0..BOARD_SIZE as u8 {
                let sq = Square::new(row, col);
                let ch = match self.get(sq) {
                    None => '.',
                    Some(c) => c.notate().chars().next().unwrap(),
                };
                out.push(ch);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}
