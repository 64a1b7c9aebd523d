use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{MctsConfig, MinimaxConfig};
use crate::arena::ArenaConfig;
use crate::error::ConfigError;

/// Largest search depth accepted from a config file.
pub const MAX_CONFIG_DEPTH: u32 = 12;

const MAX_COLS: usize = 7;
const MAX_ROWS: usize = 6;
const MAX_WIN_LENGTH: usize = 7;

/// Board dimensions and win length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub cols: usize,
    pub rows: usize,
    pub win_length: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            cols: 7,
            rows: 6,
            win_length: 4,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub search: MinimaxConfig,
    pub mcts: MctsConfig,
    pub arena: ArenaConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = &self.board;
        if !(1..=MAX_COLS).contains(&board.cols) {
            return Err(ConfigError::Validation(format!(
                "board.cols must be in [1, {MAX_COLS}]"
            )));
        }
        if !(1..=MAX_ROWS).contains(&board.rows) {
            return Err(ConfigError::Validation(format!(
                "board.rows must be in [1, {MAX_ROWS}]"
            )));
        }
        if !(1..=MAX_WIN_LENGTH).contains(&board.win_length) {
            return Err(ConfigError::Validation(format!(
                "board.win_length must be in [1, {MAX_WIN_LENGTH}]"
            )));
        }

        if !(1..=MAX_CONFIG_DEPTH).contains(&self.search.depth) {
            return Err(ConfigError::Validation(format!(
                "search.depth must be in [1, {MAX_CONFIG_DEPTH}]"
            )));
        }

        if self.mcts.iterations == 0 {
            return Err(ConfigError::Validation(
                "mcts.iterations must be >= 1".into(),
            ));
        }
        if !self.mcts.exploration.is_finite() || self.mcts.exploration < 0.0 {
            return Err(ConfigError::Validation(
                "mcts.exploration must be a finite number >= 0".into(),
            ));
        }

        if self.arena.games == 0 {
            return Err(ConfigError::Validation("arena.games must be >= 1".into()));
        }
        if self.arena.move_limit == 0 {
            return Err(ConfigError::Validation(
                "arena.move_limit must be >= 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&AppConfig::default())?)
    }
}
