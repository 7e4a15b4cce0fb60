//! Terminal renderer for the panel board.
//!
//! The board is rendered into a plain framebuffer first and only then
//! flushed to the terminal, so every view stays testable without a TTY.
//!
//! - [`board_view`] maps a `GameBoard` onto cells (2 columns per tile)
//! - [`fb`] holds the framebuffer and style types
//! - [`renderer`] repaints changed rows through crossterm

pub mod board_view;
pub mod fb;
pub mod renderer;

pub use panel_pop_core as core;
pub use panel_pop_types as types;

pub use board_view::{AnchorY, BoardView, Viewport};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb, Weight};
pub use renderer::TerminalRenderer;
