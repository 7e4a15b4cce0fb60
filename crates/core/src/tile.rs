//! Tile - a single occupant of a grid cell.

use crate::keyed::Keyed;
use crate::types::{DrawType, TileColor, KEY_ROW_STRIDE, TILE_SIZE};

/// Storage key of the cell at `(x, y)`.
#[inline(always)]
pub fn tile_key(x: i32, y: i32) -> i32 {
    y * KEY_ROW_STRIDE + x
}

/// A colored tile on the board.
///
/// `x` and `y` are only writable from inside the crate because the board has
/// to rekey the tile store whenever they change.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub color: TileColor,
    x: i32,
    y: i32,
    /// Draw position in logical units (16 per cell).
    pub draw_x: f32,
    pub draw_y: f32,
    /// May take part in a swap, and may start falling.
    pub swappable: bool,
    /// Queued for removal by a pop animation.
    pub matched: bool,
    /// Fell as the result of a pop; a match involving it extends the chain.
    pub combo_viable: bool,
    pub draw_type: DrawType,
}

impl Tile {
    pub fn new(color: TileColor, swappable: bool, x: i32, y: i32) -> Self {
        Self {
            color,
            x,
            y,
            draw_x: (x * TILE_SIZE) as f32,
            draw_y: (y * TILE_SIZE) as f32,
            swappable,
            matched: false,
            combo_viable: false,
            draw_type: DrawType::Regular,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub(crate) fn set_x(&mut self, x: i32) {
        self.x = x;
        self.draw_x = (x * TILE_SIZE) as f32;
    }

    pub(crate) fn set_y(&mut self, y: i32) {
        self.y = y;
        self.draw_y = (y * TILE_SIZE) as f32;
    }

    pub fn set_swappable(&mut self, swappable: bool) {
        self.swappable = swappable;
    }

    pub fn set_combo_viable(&mut self, combo_viable: bool) {
        self.combo_viable = combo_viable;
    }

    /// Per-tick timer step: snap draw offsets back to the grid cell.
    ///
    /// A running swap re-applies its interpolation later in the same tick.
    pub fn tick(&mut self) {
        self.draw_x = (self.x * TILE_SIZE) as f32;
        self.draw_y = (self.y * TILE_SIZE) as f32;
    }
}

impl Keyed for Tile {
    fn key(&self) -> i32 {
        tile_key(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_row_major_with_stride() {
        let tile = Tile::new(TileColor::Red, true, 4, 7);
        assert_eq!(tile.key(), 7004);
        assert_eq!(tile_key(0, 0), 0);
    }

    #[test]
    fn setters_keep_draw_offsets_on_grid() {
        let mut tile = Tile::new(TileColor::Blue, true, 1, 2);
        tile.set_x(3);
        tile.set_y(5);

        assert_eq!(tile.draw_x, 48.0);
        assert_eq!(tile.draw_y, 80.0);
        assert_eq!(tile.key(), 5003);
    }

    #[test]
    fn tick_snaps_interpolated_offset() {
        let mut tile = Tile::new(TileColor::Teal, true, 2, 0);
        tile.draw_x = 40.0;
        tile.tick();
        assert_eq!(tile.draw_x, 32.0);
    }
}
