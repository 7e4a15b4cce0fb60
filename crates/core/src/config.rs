//! Board configuration.
//!
//! Every field has a default equal to the constants in `panel_pop_types`, so a
//! config file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BoardError;
use crate::types::{
    CURSOR_FLEX_TICKS, DEFAULT_SPEED, DROP_BOUNCE_TICKS, DROP_STALL_TICKS, MATCH_BLINK_TICKS,
    MATCH_POP_TICKS_EACH, MATCH_SOLID_TICKS, SWAP_TICKS,
};

/// Tick counts for every animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTimings {
    pub swap_ticks: u32,
    pub drop_stall_ticks: u32,
    pub drop_bounce_ticks: u32,
    pub match_blink_ticks: u32,
    pub match_solid_ticks: u32,
    pub match_pop_ticks_each: u32,
    pub cursor_flex: u32,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            swap_ticks: SWAP_TICKS,
            drop_stall_ticks: DROP_STALL_TICKS,
            drop_bounce_ticks: DROP_BOUNCE_TICKS,
            match_blink_ticks: MATCH_BLINK_TICKS,
            match_solid_ticks: MATCH_SOLID_TICKS,
            match_pop_ticks_each: MATCH_POP_TICKS_EACH,
            cursor_flex: CURSOR_FLEX_TICKS,
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Endless scroll speed; the board rises one unit every `60 - speed` ticks.
    pub speed: u32,
    pub timings: AnimationTimings,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            timings: AnimationTimings::default(),
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, BoardError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, BoardError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.display(), speed = config.speed, "loaded board config");
        Ok(config)
    }

    /// Ticks between two one-unit scroll steps. Never zero.
    pub fn scroll_period(&self) -> u64 {
        60u64.saturating_sub(self.speed as u64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = BoardConfig::default();
        assert_eq!(config.speed, 10);
        assert_eq!(config.timings.swap_ticks, 4);
        assert_eq!(config.timings.match_blink_ticks, 44);
        assert_eq!(config.scroll_period(), 50);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            BoardConfig::from_json_str(r#"{ "speed": 30, "timings": { "swap_ticks": 2 } }"#)
                .unwrap();
        assert_eq!(config.speed, 30);
        assert_eq!(config.timings.swap_ticks, 2);
        assert_eq!(config.timings.drop_stall_ticks, 11);
        assert_eq!(config.scroll_period(), 30);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(
            BoardConfig::from_json_str("{}").unwrap(),
            BoardConfig::default()
        );
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = BoardConfig::from_json_str("{ speed: }").unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
    }

    #[test]
    fn scroll_period_never_zero() {
        let config = BoardConfig {
            speed: 90,
            ..BoardConfig::default()
        };
        assert_eq!(config.scroll_period(), 1);
    }
}
