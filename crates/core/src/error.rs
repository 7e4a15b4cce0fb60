//! Error types for board construction, configuration and keyed storage.

use thiserror::Error;

/// Errors surfaced to callers that build boards or load configuration.
///
/// Gameplay rejections (an illegal swap, a cursor at the edge) are plain
/// `bool`s and never show up here.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("unknown tile color {ch:?} at line {line}, column {column}")]
    UnknownColor { ch: char, line: usize, column: usize },
    #[error("layout line {line} has {width} columns, the board has 6")]
    RowTooWide { line: usize, width: usize },
    #[error("unknown puzzle preset: {0}")]
    UnknownPreset(String),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Internal-consistency faults raised by [`crate::keyed::KeyedCollection`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum KeyedError {
    #[error("key {0} is already held by another entry")]
    KeyTaken(i32),
    #[error("handle does not refer to a live entry")]
    StaleHandle,
    #[error("key {0} is not the key this entry is stored under")]
    KeyMismatch(i32),
}
