//! Startup configuration: numeric tunables and collaborator identifiers,
//! loaded once from JSON. A missing or malformed key aborts startup.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub screen_width: i32,
    pub screen_height: i32,
    pub tile_size: i32,
    pub max_mobs: usize,
    /// Frames between spawner attempts.
    pub tick_speed: u32,
    /// Water probability per interior cell, out of 10.
    pub water_spawn_chance: u32,
    pub max_air: i32,
    pub max_health: i32,
    pub air_gain_rate: i32,
    pub air_loss_rate: i32,
    /// Below this much air, stepping into water drowns instead of costing air.
    pub drown_threshold: i32,
    /// Milliseconds between mob movement rounds.
    pub mob_move_interval: u64,
    pub base_mobs_killed: u32,
    /// Highest playable level; passing its door wins the run.
    pub max_level: u32,
    pub footstep_first: String,
    pub footstep_second: String,
    pub water_sound: String,
    /// Timer identifier for the presentation layer's collaborator registry.
    pub mob_move_timer: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    /// The file is not valid JSON or a key is missing/mistyped.
    Parse { message: String },
    /// The values parsed but cannot describe a playable grid.
    Invalid { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Parse { message } => write!(f, "invalid config: {message}"),
            Self::Invalid { message } => write!(f, "unusable config: {message}"),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse { message: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size <= 0 {
            return Err(Self::invalid("tile_size must be positive"));
        }
        if self.num_tiles_x() < 3 || self.num_tiles_y() < 3 {
            return Err(Self::invalid("grid must be at least 3x3 tiles"));
        }
        if self.water_spawn_chance > 10 {
            return Err(Self::invalid("water_spawn_chance is a chance out of 10"));
        }
        if self.max_health <= 0 || self.max_air < 0 {
            return Err(Self::invalid("health and air maxima must be positive"));
        }
        if self.max_level == 0 {
            return Err(Self::invalid("max_level must be at least 1"));
        }
        Ok(())
    }

    pub fn num_tiles_x(&self) -> usize {
        (self.screen_width / self.tile_size) as usize
    }

    pub fn num_tiles_y(&self) -> usize {
        (self.screen_height / self.tile_size) as usize
    }

    fn invalid(message: &str) -> ConfigError {
        ConfigError::Invalid { message: message.to_string() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            tile_size: 50,
            max_mobs: 6,
            tick_speed: 10,
            water_spawn_chance: 3,
            max_air: 100,
            max_health: 100,
            air_gain_rate: 5,
            air_loss_rate: 10,
            drown_threshold: 10,
            mob_move_interval: 1000,
            base_mobs_killed: 0,
            max_level: 3,
            footstep_first: "footstep1".to_string(),
            footstep_second: "footstep2".to_string(),
            water_sound: "water".to_string(),
            mob_move_timer: "mob_move_timer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_derives_grid_dimensions() {
        let config = Config::default();
        config.validate().expect("defaults must validate");
        assert_eq!(config.num_tiles_x(), 16);
        assert_eq!(config.num_tiles_y(), 12);
    }

    #[test]
    fn load_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config::default();
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_key_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut value: serde_json::Value =
            serde_json::to_value(Config::default()).unwrap();
        value.as_object_mut().unwrap().remove("tile_size");
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        match Config::load(&path) {
            Err(ConfigError::Parse { message }) => {
                assert!(message.contains("tile_size"), "unexpected message: {message}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn degenerate_grid_is_rejected() {
        let config = Config { screen_width: 100, screen_height: 100, ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(Config::load(&path), Err(ConfigError::Io(_))));
    }
}
