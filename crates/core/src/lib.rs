//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board simulation: tile storage, the animation state
//! machines and the tick pipeline that drives them. It has **no dependencies**
//! on terminals or input devices, making it:
//!
//! - **Deterministic**: the same seed token and command sequence always
//!   produce the same board
//! - **Snapshot-friendly**: [`GameBoard`] clones deeply, RNG state included, so
//!   a copy forward-simulates exactly like its source
//! - **Headless**: every rule can be driven tick by tick from tests
//!
//! # Module Structure
//!
//! - [`keyed`]: insertion-ordered arena keyed by `y * 1000 + x`
//! - [`tile`]: a single colored tile and its per-tick flags
//! - [`anim`]: swap, drop/bounce, pop and combo-tracker records
//! - [`match_grid`]: window snapshot and run scanning for match detection
//! - [`board`]: the [`GameBoard`] tick pipeline, commands and queries
//! - [`rng`]: seeded LCG used for refill and the auto swapper
//! - [`config`]: serde-backed speed and animation timings
//! - [`presets`]: built-in puzzle layouts
//!
//! # Example
//!
//! ```
//! use panel_pop_core::GameBoard;
//!
//! let mut board = GameBoard::puzzle("rrr").unwrap();
//! board.tick();
//! assert_eq!(board.pop_animations().len(), 1);
//! assert!(board.is_paused());
//! ```
//!
//! # Timing
//!
//! One tick is one frame at 60 FPS; the terminal runner
//! calls [`GameBoard::tick`] every 16ms.

pub mod anim;
pub mod board;
pub mod config;
pub mod error;
pub mod keyed;
pub mod match_grid;
pub mod presets;
pub mod rng;
pub mod tile;

pub use panel_pop_types as types;

// Re-export commonly used types for convenience
pub use anim::{
    BouncePhase, ComboTracker, DialogBox, DialogKind, DropPhase, DroppingAnimation, MatchPhase,
    PopAnimation, PopDialog, SwapAnimation,
};
pub use board::{Cursor, GameBoard};
pub use config::{AnimationTimings, BoardConfig};
pub use error::{BoardError, KeyedError};
pub use keyed::{Handle, Keyed, KeyedCollection};
pub use rng::SimpleRng;
pub use tile::{tile_key, Tile};
