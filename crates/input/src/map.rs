//! Key mapping from terminal events to board commands.

use crate::types::BoardCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to board commands.
pub fn handle_key_event(key: KeyEvent) -> Option<BoardCommand> {
    command_for(key.code)
}

pub fn command_for(code: KeyCode) -> Option<BoardCommand> {
    match code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(BoardCommand::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(BoardCommand::MoveRight)
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(BoardCommand::MoveUp)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(BoardCommand::MoveDown)
        }

        // Actions
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Enter => {
            Some(BoardCommand::Swap)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(BoardCommand::Raise),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
