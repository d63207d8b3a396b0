//! Engine Configuration
//!
//! Rule knobs with defaults matching the classic game. Loadable from JSON;
//! missing fields fall back to the defaults.

use serde::{Serialize, Deserialize};

use crate::{BEST_SCORE_KEY, BOARD_SIZE, DEFAULT_WIN_VALUE};

/// Denominator for spawn chances.
pub const PERMILLE: u32 = 1000;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Win value is not a power of two of at least 4.
    #[error("Invalid win value {0}: must be a power of two of at least 4")]
    InvalidWinValue(u32),

    /// Spawn chance above 1000‰.
    #[error("Spawn chance {0} exceeds 1000 per mille")]
    InvalidChance(u32),

    /// Initial tile count outside the board.
    #[error("Initial tile count {0} must be between 1 and 16")]
    InvalidInitialTiles(usize),

    /// Empty persistence key.
    #[error("Best score key must not be empty")]
    EmptyKey,
}

/// Configuration for a grid engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tile value that wins the game
    pub win_value: u32,
    /// Chance that a spawn is a 4 instead of a 2, in per mille
    pub four_chance_permille: u32,
    /// Tiles spawned at session start
    pub initial_tiles: usize,
    /// Key the best score is stored under
    pub best_score_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            win_value: DEFAULT_WIN_VALUE,
            four_chance_permille: 100, // 10% fours
            initial_tiles: 2,
            best_score_key: BEST_SCORE_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check all fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_value < 4 || !self.win_value.is_power_of_two() {
            return Err(ConfigError::InvalidWinValue(self.win_value));
        }
        if self.four_chance_permille > PERMILLE {
            return Err(ConfigError::InvalidChance(self.four_chance_permille));
        }
        if self.initial_tiles == 0 || self.initial_tiles > BOARD_SIZE * BOARD_SIZE {
            return Err(ConfigError::InvalidInitialTiles(self.initial_tiles));
        }
        if self.best_score_key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_classic() {
        let config = EngineConfig::default();
        assert_eq!(config.win_value, 2048);
        assert_eq!(config.four_chance_permille, 100);
        assert_eq!(config.initial_tiles, 2);
        assert_eq!(config.best_score_key, "best2048");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "win_value": 4096 }"#).unwrap();
        assert_eq!(config.win_value, 4096);
        assert_eq!(config.initial_tiles, 2);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig {
            four_chance_permille: 250,
            ..EngineConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_validation_errors() {
        let bad_chance = EngineConfig {
            four_chance_permille: 1001,
            ..EngineConfig::default()
        };
        assert!(matches!(bad_chance.validate(), Err(ConfigError::InvalidChance(1001))));

        let no_tiles = EngineConfig {
            initial_tiles: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(no_tiles.validate(), Err(ConfigError::InvalidInitialTiles(0))));

        let no_key = EngineConfig {
            best_score_key: String::new(),
            ..EngineConfig::default()
        };
        assert!(matches!(no_key.validate(), Err(ConfigError::EmptyKey)));

        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "win_value": 1000 }"#),
            Err(ConfigError::InvalidWinValue(1000))
        ));
    }
}
