//! Edge-triggered input handler for terminal environments.
//!
//! A held key issues its command once; auto-repeat is swallowed until the key
//! is released. Terminals that never report releases are covered by a timeout.
//! A raise press is spread over one tick per logical unit so the board never
//! skips a refill boundary.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::map::command_for;
use crate::types::{BoardCommand, TILE_SIZE};

// In terminals without key-release events, a short timeout lets a second tap
// of the same key through.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

#[derive(Debug, Clone)]
pub struct InputHandler {
    held: ArrayVec<BoardCommand, 8>,
    idle_ms: u32,
    raise_remaining: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            held: ArrayVec::new(),
            idle_ms: 0,
            raise_remaining: 0,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Command to apply right away, if any. Raises are queued for
    /// [`InputHandler::update`] instead.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<BoardCommand> {
        let command = command_for(code)?;
        self.idle_ms = 0;
        if self.held.contains(&command) {
            return None;
        }
        let _ = self.held.try_push(command);

        if command == BoardCommand::Raise {
            self.raise_remaining = TILE_SIZE as u32;
            return None;
        }
        Some(command)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(command) = command_for(code) {
            self.held.retain(|c| *c != command);
        }
    }

    /// Advance one tick; returns the commands due this tick.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<BoardCommand, 1> {
        let mut commands = ArrayVec::new();

        self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
        if self.idle_ms > self.key_release_timeout_ms {
            self.held.clear();
        }

        if self.raise_remaining > 0 {
            self.raise_remaining -= 1;
            commands.push(BoardCommand::Raise);
        }
        commands
    }

    pub fn is_raising(&self) -> bool {
        self.raise_remaining > 0
    }

    pub fn reset(&mut self) {
        self.held.clear();
        self.idle_ms = 0;
        self.raise_remaining = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_fires_once() {
        let mut h = InputHandler::new();
        assert_eq!(h.handle_key_press(KeyCode::Left), Some(BoardCommand::MoveLeft));
        assert_eq!(h.handle_key_press(KeyCode::Left), None);
        assert_eq!(h.handle_key_press(KeyCode::Char('a')), None);

        h.handle_key_release(KeyCode::Left);
        assert_eq!(h.handle_key_press(KeyCode::Left), Some(BoardCommand::MoveLeft));
    }

    #[test]
    fn different_keys_are_independent() {
        let mut h = InputHandler::new();
        assert_eq!(h.handle_key_press(KeyCode::Left), Some(BoardCommand::MoveLeft));
        assert_eq!(h.handle_key_press(KeyCode::Char(' ')), Some(BoardCommand::Swap));
    }

    #[test]
    fn timeout_releases_keys() {
        let mut h = InputHandler::new().with_key_release_timeout_ms(50);
        assert!(h.handle_key_press(KeyCode::Down).is_some());
        h.update(16);
        assert!(h.handle_key_press(KeyCode::Down).is_none());

        for _ in 0..4 {
            h.update(16);
        }
        assert_eq!(h.handle_key_press(KeyCode::Down), Some(BoardCommand::MoveDown));
    }

    #[test]
    fn raise_is_spread_over_ticks() {
        let mut h = InputHandler::new();
        assert_eq!(h.handle_key_press(KeyCode::Char('r')), None);
        assert!(h.is_raising());

        let mut raised = 0;
        for _ in 0..40 {
            raised += h.update(16).len();
        }
        assert_eq!(raised, TILE_SIZE as usize);
        assert!(!h.is_raising());
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut h = InputHandler::new();
        assert_eq!(h.handle_key_press(KeyCode::Char('z')), None);
        assert!(!h.is_raising());
    }
}
