//! Terminal input module (board-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::BoardCommand`] and provides an
//! edge-triggered input handler suitable for terminal environments (including
//! terminals without key-release events).

pub mod handler;
pub mod map;

pub use panel_pop_types as types;

pub use handler::InputHandler;
pub use map::{command_for, handle_key_event, should_quit};
