//! Animation records owned by the board.
//!
//! Each record is a small state machine the board advances once per tick.
//! Records refer to tiles through [`Handle`]s into the board's tile store and
//! never own tiles themselves.

use arrayvec::ArrayVec;

use crate::keyed::Handle;
use crate::types::TILE_SIZE;

/// A pair of horizontally adjacent cells trading places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapAnimation {
    pub x1: i32,
    pub x2: i32,
    pub y: i32,
    pub ticks_left: u32,
}

impl SwapAnimation {
    /// Whether `(x, y)` is one of the two cells being swapped.
    pub fn covers(&self, x: i32, y: i32) -> bool {
        self.y == y && (self.x1 == x || self.x2 == x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPhase {
    Stalled,
    Falling,
    Bouncing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BouncePhase {
    NotStarted,
    Regular,
    Low,
    High,
    Mid,
}

/// Fall-then-bounce state for one column segment.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppingAnimation {
    pub x: i32,
    /// Row of the lowest tile in the falling stack.
    pub bottom_y: i32,
    pub phase: DropPhase,
    pub bounce_phase: BouncePhase,
    pub drop_ticks: u32,
    pub bounce_ticks: u32,
    pub bouncing_tiles: Vec<Handle>,
    /// Tiles that become combo-viable once the bounce settles.
    pub combo_tiles: Vec<Handle>,
}

impl DroppingAnimation {
    pub fn stalled(x: i32, bottom_y: i32, stall_ticks: u32, combo_tiles: Vec<Handle>) -> Self {
        Self {
            x,
            bottom_y,
            phase: DropPhase::Stalled,
            bounce_phase: BouncePhase::NotStarted,
            drop_ticks: stall_ticks,
            bounce_ticks: 0,
            bouncing_tiles: Vec::new(),
            combo_tiles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Blink,
    Solid,
    Pop,
}

/// Floating "pop"/"repeat" counter shown above a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopDialog {
    pub x: f32,
    pub starting_y: f32,
    pub combo_count: u32,
    /// Ticks since the match was detected.
    pub tick: u32,
}

impl PopDialog {
    /// Vertical rise of the dialog, in logical units, `tick` ticks after the
    /// match. `None` once the dialog has expired.
    pub fn box_offset(tick: u32) -> Option<i32> {
        let t = tick as i32;
        if t < 7 {
            Some(t - 2)
        } else if t < 15 {
            Some(9 + div_ceil(t - 15, 3))
        } else if t < 47 {
            Some(13 + div_ceil(t - 23, 4))
        } else if t < 77 {
            Some(20)
        } else {
            None
        }
    }
}

/// Ceiling division for a positive divisor, correct for negative numerators.
fn div_ceil(a: i32, b: i32) -> i32 {
    -((-a).div_euclid(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Group size, shown for groups larger than three.
    Pop,
    /// Chain counter, shown from the second link on.
    Repeat,
}

/// One box of a pop dialog, positioned in logical board units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogBox {
    pub kind: DialogKind,
    pub count: u32,
    pub x: f32,
    pub y: f32,
}

/// A matched group on its way out.
#[derive(Debug, Clone, PartialEq)]
pub struct PopAnimation {
    /// Tiles in pop order.
    pub queued_pops: Vec<Handle>,
    pub phase: MatchPhase,
    pub timer: u32,
    /// Index into `queued_pops` of the tile currently popping.
    pub pop_index: usize,
    pub dialog: PopDialog,
}

impl PopAnimation {
    /// True while the last tile of the group is in its pop step.
    pub fn on_final_pop(&self) -> bool {
        self.phase == MatchPhase::Pop && self.pop_index + 1 == self.queued_pops.len()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.queued_pops.contains(&handle)
    }

    /// Boxes to draw for this group's dialog at its current tick.
    pub fn dialog_boxes(&self) -> ArrayVec<DialogBox, 2> {
        let mut boxes = ArrayVec::new();
        if self.dialog.tick <= 2 {
            return boxes;
        }
        let Some(mut offset) = PopDialog::box_offset(self.dialog.tick) else {
            return boxes;
        };

        let count = self.queued_pops.len() as u32;
        if count > 3 {
            boxes.push(DialogBox {
                kind: DialogKind::Pop,
                count,
                x: self.dialog.x,
                y: self.dialog.starting_y - offset as f32,
            });
            offset += TILE_SIZE;
        }
        if self.dialog.combo_count > 1 {
            boxes.push(DialogBox {
                kind: DialogKind::Repeat,
                count: self.dialog.combo_count,
                x: self.dialog.x,
                y: self.dialog.starting_y - offset as f32,
            });
        }
        boxes
    }
}

/// Marks a column whose pop just finished: tiles above `above_y` that start
/// falling within `timer` ticks carry the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboTracker {
    pub x: i32,
    pub above_y: i32,
    pub timer: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_offset_curve() {
        assert_eq!(PopDialog::box_offset(3), Some(1));
        assert_eq!(PopDialog::box_offset(6), Some(4));
        assert_eq!(PopDialog::box_offset(7), Some(7));
        assert_eq!(PopDialog::box_offset(14), Some(9));
        assert_eq!(PopDialog::box_offset(15), Some(11));
        assert_eq!(PopDialog::box_offset(23), Some(13));
        assert_eq!(PopDialog::box_offset(46), Some(19));
        assert_eq!(PopDialog::box_offset(47), Some(20));
        assert_eq!(PopDialog::box_offset(76), Some(20));
        assert_eq!(PopDialog::box_offset(77), None);
    }

    #[test]
    fn div_ceil_handles_negative_numerators() {
        assert_eq!(div_ceil(-8, 3), -2);
        assert_eq!(div_ceil(-1, 3), 0);
        assert_eq!(div_ceil(5, 4), 2);
        assert_eq!(div_ceil(8, 4), 2);
    }

    fn pop_with(count: usize, combo_count: u32, tick: u32) -> PopAnimation {
        let mut store = crate::keyed::KeyedCollection::new();
        let queued_pops = (0..count as i32)
            .map(|x| {
                store
                    .insert(crate::tile::Tile::new(
                        crate::types::TileColor::Red,
                        false,
                        x,
                        0,
                    ))
                    .unwrap()
            })
            .collect();
        PopAnimation {
            queued_pops,
            phase: MatchPhase::Blink,
            timer: 10,
            pop_index: 0,
            dialog: PopDialog {
                x: 16.0,
                starting_y: 100.0,
                combo_count,
                tick,
            },
        }
    }

    #[test]
    fn dialog_hidden_for_first_ticks() {
        assert!(pop_with(5, 3, 2).dialog_boxes().is_empty());
    }

    #[test]
    fn dialog_stacks_repeat_above_pop() {
        let boxes = pop_with(4, 2, 3).dialog_boxes();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].kind, DialogKind::Pop);
        assert_eq!(boxes[0].count, 4);
        assert_eq!(boxes[0].y, 99.0);
        assert_eq!(boxes[1].kind, DialogKind::Repeat);
        assert_eq!(boxes[1].count, 2);
        assert_eq!(boxes[1].y, 99.0 - TILE_SIZE as f32);
    }

    #[test]
    fn plain_triple_has_no_dialog() {
        assert!(pop_with(3, 1, 10).dialog_boxes().is_empty());
    }

    #[test]
    fn dialog_expires() {
        assert!(pop_with(4, 2, 77).dialog_boxes().is_empty());
    }
}
