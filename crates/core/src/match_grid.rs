//! Snapshot of the visible window used by match detection.

use crate::keyed::Handle;
use crate::types::{TileColor, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Empty,
    /// Occupied but unable to take part in a match this tick.
    Blocked,
    Tile(Handle, TileColor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Down,
}

/// Cells of rows `top..=lowest`, row-major.
#[derive(Debug, Clone)]
pub struct MatchGrid {
    top: i32,
    lowest: i32,
    cells: Vec<GridCell>,
}

impl MatchGrid {
    /// Build the grid by asking `classify` about every cell in the window.
    pub fn build(top: i32, lowest: i32, mut classify: impl FnMut(i32, i32) -> GridCell) -> Self {
        let rows = (lowest - top + 1).max(0) as usize;
        let mut cells = Vec::with_capacity(rows * BOARD_WIDTH as usize);
        for y in top..=lowest {
            for x in 0..BOARD_WIDTH {
                cells.push(classify(x, y));
            }
        }
        Self { top, lowest, cells }
    }

    /// Cell at `(x, y)`; anything outside the window reads as empty.
    pub fn at(&self, x: i32, y: i32) -> GridCell {
        if !(0..BOARD_WIDTH).contains(&x) || y < self.top || y > self.lowest {
            return GridCell::Empty;
        }
        let idx = ((y - self.top) * BOARD_WIDTH + x) as usize;
        self.cells.get(idx).copied().unwrap_or(GridCell::Empty)
    }

    /// Length of the same-colored run that reaches `(x, y)` with `count`
    /// tiles already behind it.
    ///
    /// Tiles of a run of three or more are appended to `out` from the far end
    /// back toward the start; the caller appends the origin tile itself.
    /// Row `lowest` is the incoming row and never counts toward a downward run.
    pub fn run_length(
        &self,
        out: &mut Vec<Handle>,
        color: TileColor,
        dir: Direction,
        x: i32,
        y: i32,
        count: u32,
    ) -> u32 {
        let GridCell::Tile(handle, c) = self.at(x, y) else {
            return count;
        };
        if c != color {
            return count;
        }
        let (nx, ny) = match dir {
            Direction::Right => (x + 1, y),
            Direction::Down => {
                if y >= self.lowest {
                    return count;
                }
                (x, y + 1)
            }
        };
        let total = self.run_length(out, color, dir, nx, ny, count + 1);
        if total >= 3 {
            out.push(handle);
        }
        total
    }
}
