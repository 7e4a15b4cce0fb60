//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core simulation, terminal rendering, input mapping).
//!
//! # Board Dimensions
//!
//! - **Width**: 6 columns (indexed 0-5)
//! - **Visible height**: 12 rows of [`TILE_SIZE`] logical units each
//! - **Rows**: unbounded; `y` grows downward as the endless board rises
//!
//! # Animation Timing Constants
//!
//! Timing values are in ticks (one call to `GameBoard::tick`):
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SWAP_TICKS` | 4 | Horizontal slide of a swapped pair |
//! | `DROP_STALL_TICKS` | 11 | Hang time before a tile starts to fall |
//! | `DROP_BOUNCE_TICKS` | 3 | Length of each bounce sub-phase after landing |
//! | `MATCH_BLINK_TICKS` | 44 | Blinking phase of a matched group |
//! | `MATCH_SOLID_TICKS` | 20 | Solid phase before popping starts |
//! | `MATCH_POP_TICKS_EACH` | 9 | Time between individual tile pops |
//! | `CURSOR_FLEX_TICKS` | 32 | Period of the cursor flicker |
//!
//! # Examples
//!
//! ```
//! use panel_pop_types::{BoardCommand, GameMode, TileColor, BOARD_WIDTH};
//!
//! assert_eq!(TileColor::from_char('g'), Some(TileColor::Green));
//! assert_eq!(TileColor::Blue.as_char(), 'b');
//!
//! assert_eq!(GameMode::from_str("puzzle"), Some(GameMode::Puzzle));
//! assert_eq!(BoardCommand::from_str("swap"), Some(BoardCommand::Swap));
//!
//! assert_eq!(BOARD_WIDTH, 6);
//! ```

/// Board width in columns
pub const BOARD_WIDTH: i32 = 6;

/// Height of the visible window in rows
pub const BOARD_HEIGHT: i32 = 12;

/// Logical units per cell (scroll offsets and draw positions use these)
pub const TILE_SIZE: i32 = 16;

/// Multiplier applied to `y` when deriving a tile's storage key
///
/// Must stay larger than [`BOARD_WIDTH`] so no two cells share a key.
pub const KEY_ROW_STRIDE: i32 = 1000;

/// Number of populated rows the endless board keeps below its top row
pub const REFILL_ROWS: i32 = 15;

/// Default scroll speed; the board rises one unit every `60 - speed` ticks
pub const DEFAULT_SPEED: u32 = 10;

/// Fixed timestep used by the terminal runner (16ms ≈ 60 FPS)
pub const TICK_MS: u64 = 16;

pub const SWAP_TICKS: u32 = 4;
pub const DROP_STALL_TICKS: u32 = 11;
pub const DROP_BOUNCE_TICKS: u32 = 3;
pub const MATCH_BLINK_TICKS: u32 = 44;
pub const MATCH_SOLID_TICKS: u32 = 20;
pub const MATCH_POP_TICKS_EACH: u32 = 9;
pub const CURSOR_FLEX_TICKS: u32 = 32;

/// Bounce countdown value during the `low` sub-phase at which landed tiles
/// become swappable again.
pub const BOUNCE_SETTLE_TICK: u32 = 2;

/// Ticks a combo tracker stays alive after its pop group finishes.
pub const COMBO_TRACKER_TICKS: u32 = 2;

/// The six tile colors
///
/// The order of [`TileColor::ALL`] is the order the refill RNG picks from,
/// so changing it changes every seeded board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileColor {
    Green,
    Purple,
    Red,
    Yellow,
    Teal,
    Blue,
}

impl TileColor {
    pub const ALL: [TileColor; 6] = [
        TileColor::Green,
        TileColor::Purple,
        TileColor::Red,
        TileColor::Yellow,
        TileColor::Teal,
        TileColor::Blue,
    ];

    /// Parse a color from its puzzle/dump character
    ///
    /// # Examples
    ///
    /// ```
    /// use panel_pop_types::TileColor;
    ///
    /// assert_eq!(TileColor::from_char('t'), Some(TileColor::Teal));
    /// assert_eq!(TileColor::from_char('x'), None);
    /// ```
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'g' => Some(TileColor::Green),
            'p' => Some(TileColor::Purple),
            'r' => Some(TileColor::Red),
            'y' => Some(TileColor::Yellow),
            't' => Some(TileColor::Teal),
            'b' => Some(TileColor::Blue),
            _ => None,
        }
    }

    /// Character used by puzzle layouts and the text dump
    pub fn as_char(&self) -> char {
        match self {
            TileColor::Green => 'g',
            TileColor::Purple => 'p',
            TileColor::Red => 'r',
            TileColor::Yellow => 'y',
            TileColor::Teal => 't',
            TileColor::Blue => 'b',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileColor::Green => "green",
            TileColor::Purple => "purple",
            TileColor::Red => "red",
            TileColor::Yellow => "yellow",
            TileColor::Teal => "teal",
            TileColor::Blue => "blue",
        }
    }
}

/// Visual sub-state of a tile
///
/// Only the renderer reads this, but the core state machines drive every
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawType {
    #[default]
    Regular,
    Matched,
    MatchedBlink,
    Popping,
    Popped,
    BounceLow,
    BounceHigh,
    BounceMid,
}

/// How the board is fed with tiles
///
/// - **Endless**: the board rises on its own and new rows are generated from the RNG
/// - **Puzzle**: a fixed layout, no scrolling and no refill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Endless,
    Puzzle,
}

impl GameMode {
    /// Parse mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "endless" => Some(GameMode::Endless),
            "puzzle" => Some(GameMode::Puzzle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Endless => "endless",
            GameMode::Puzzle => "puzzle",
        }
    }
}

/// Commands an input collaborator can issue between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCommand {
    /// Move the 2-wide cursor one column left
    MoveLeft,
    /// Move the cursor one column right
    MoveRight,
    /// Move the cursor one row up
    MoveUp,
    /// Move the cursor one row down
    MoveDown,
    /// Swap the two tiles under the cursor
    Swap,
    /// Nudge the endless board up by one logical unit
    Raise,
}

impl BoardCommand {
    /// Parse command from string (case-insensitive, camelCase accepted)
    ///
    /// # Examples
    ///
    /// ```
    /// use panel_pop_types::BoardCommand;
    ///
    /// assert_eq!(BoardCommand::from_str("moveLeft"), Some(BoardCommand::MoveLeft));
    /// assert_eq!(BoardCommand::from_str("RAISE"), Some(BoardCommand::Raise));
    /// assert_eq!(BoardCommand::from_str("rotate"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(BoardCommand::MoveLeft),
            "moveright" => Some(BoardCommand::MoveRight),
            "moveup" => Some(BoardCommand::MoveUp),
            "movedown" => Some(BoardCommand::MoveDown),
            "swap" => Some(BoardCommand::Swap),
            "raise" => Some(BoardCommand::Raise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardCommand::MoveLeft => "moveLeft",
            BoardCommand::MoveRight => "moveRight",
            BoardCommand::MoveUp => "moveUp",
            BoardCommand::MoveDown => "moveDown",
            BoardCommand::Swap => "swap",
            BoardCommand::Raise => "raise",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_timing_defaults() {
        assert_eq!(SWAP_TICKS, 4);
        assert_eq!(DROP_STALL_TICKS, 11);
        assert_eq!(DROP_BOUNCE_TICKS, 3);
        assert_eq!(MATCH_BLINK_TICKS, 44);
        assert_eq!(MATCH_SOLID_TICKS, 20);
        assert_eq!(MATCH_POP_TICKS_EACH, 9);
        assert_eq!(CURSOR_FLEX_TICKS, 32);
    }

    #[test]
    fn key_stride_exceeds_width() {
        assert!(KEY_ROW_STRIDE > BOARD_WIDTH);
    }

    #[test]
    fn color_chars_are_unique() {
        for (i, a) in TileColor::ALL.iter().enumerate() {
            for b in &TileColor::ALL[i + 1..] {
                assert_ne!(a.as_char(), b.as_char());
            }
            assert_eq!(TileColor::from_char(a.as_char()), Some(*a));
        }
    }
}
