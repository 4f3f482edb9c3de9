//! Session configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::EnemyKind;

/// Largest supported grid side.
pub const MAX_GRID_SIZE: u16 = 64;

/// Cumulative terrain thresholds used by map generation.
///
/// A uniform draw below `grass` is grass, below `grass + mountain` is a
/// mountain, and anything else is water.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainWeights {
    /// Probability of grass.
    pub grass: f64,
    /// Probability of a mountain.
    pub mountain: f64,
}

impl Default for TerrainWeights {
    fn default() -> Self {
        Self {
            grass: 0.80,
            mountain: 0.10,
        }
    }
}

/// Immutable settings for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Side of the square grid.
    pub grid_size: u16,
    /// Terrain probabilities.
    pub terrain: TerrainWeights,
    /// Minimum share of grass after generation.
    pub min_walkable_ratio: f64,
    /// Player starting and maximum hp.
    pub player_hp: u32,
    /// Player actions per turn.
    pub player_actions: u32,
    /// Actions shared by all enemies per enemy phase.
    pub enemy_action_pool: u32,
    /// Enemy roster in roster order.
    pub enemies: Vec<EnemyKind>,
    /// Presentation pause between phases, in milliseconds.
    pub turn_delay_ms: u64,
    /// Turn cap for headless runs.
    pub max_turns: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: 6,
            terrain: TerrainWeights::default(),
            min_walkable_ratio: 0.70,
            player_hp: 5,
            player_actions: 2,
            enemy_action_pool: 3,
            enemies: vec![EnemyKind::Ranged, EnemyKind::Melee],
            turn_delay_ms: 1500,
            max_turns: 200,
        }
    }
}

impl SessionConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`SessionConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return invalid(format!(
                "grid_size must be in 1..={MAX_GRID_SIZE}, got {}",
                self.grid_size
            ));
        }

        let TerrainWeights { grass, mountain } = self.terrain;
        if !is_probability(grass) || !is_probability(mountain) || grass + mountain > 1.0 {
            return invalid(format!(
                "terrain weights must be probabilities summing to at most 1, got grass={grass} mountain={mountain}"
            ));
        }

        if !is_probability(self.min_walkable_ratio) {
            return invalid(format!(
                "min_walkable_ratio must be in [0, 1], got {}",
                self.min_walkable_ratio
            ));
        }

        if self.player_hp == 0 {
            return invalid("player_hp must be positive".to_string());
        }
        if self.player_actions == 0 {
            return invalid("player_actions must be positive".to_string());
        }
        if self.enemies.is_empty() {
            return invalid("enemy roster is empty".to_string());
        }

        let cells = usize::from(self.grid_size) * usize::from(self.grid_size);
        if self.enemies.len() + 1 > cells {
            return invalid(format!(
                "{} units do not fit on a {}x{} grid",
                self.enemies.len() + 1,
                self.grid_size,
                self.grid_size
            ));
        }

        Ok(())
    }
}

fn is_probability(p: f64) -> bool {
    p.is_finite() && (0.0..=1.0).contains(&p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_size, 6);
        assert_eq!(config.enemies, vec![EnemyKind::Ranged, EnemyKind::Melee]);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            SessionConfig {
                grid_size: 0,
                ..SessionConfig::default()
            },
            SessionConfig {
                grid_size: 65,
                ..SessionConfig::default()
            },
            SessionConfig {
                terrain: TerrainWeights {
                    grass: 0.9,
                    mountain: 0.2,
                },
                ..SessionConfig::default()
            },
            SessionConfig {
                terrain: TerrainWeights {
                    grass: f64::NAN,
                    mountain: 0.1,
                },
                ..SessionConfig::default()
            },
            SessionConfig {
                min_walkable_ratio: 1.5,
                ..SessionConfig::default()
            },
            SessionConfig {
                player_hp: 0,
                ..SessionConfig::default()
            },
            SessionConfig {
                enemies: Vec::new(),
                ..SessionConfig::default()
            },
            SessionConfig {
                grid_size: 1,
                ..SessionConfig::default()
            },
        ];

        for config in bad {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "accepted {config:?}"
            );
        }
    }

    #[test]
    fn test_load_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "grid_size": 8, "enemies": ["melee", "melee", "ranged"] }"#).unwrap();

        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.grid_size, 8);
        assert_eq!(config.enemies.len(), 3);
        assert_eq!(config.player_hp, 5);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(SessionConfig::load(&missing), Err(ConfigError::Read { .. })));

        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "not json").unwrap();
        assert!(matches!(SessionConfig::load(&garbage), Err(ConfigError::Parse { .. })));

        let invalid = dir.path().join("invalid.json");
        fs::write(&invalid, r#"{ "grid_size": 0 }"#).unwrap();
        assert!(matches!(SessionConfig::load(&invalid), Err(ConfigError::Invalid(_))));
    }
}
