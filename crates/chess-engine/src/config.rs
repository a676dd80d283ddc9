//! Rule thresholds, loadable from TOML.
//!
//! The defaults are the standard rules: a draw after 100 half-moves without
//! a pawn move or capture, and after the third occurrence of a position.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or validating a rules configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read rules config: {0}")]
    Read(#[from] std::io::Error),
    /// The file is not valid TOML or has fields of the wrong type.
    #[error("failed to parse rules config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid rules config: {0}")]
    Invalid(String),
}

/// Draw thresholds used when recomputing game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Half-moves without a pawn move or capture before the game is drawn.
    pub fifty_move_limit: u32,
    /// Occurrences of the same position before the game is drawn.
    pub repetition_limit: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            fifty_move_limit: 100,
            repetition_limit: 3,
        }
    }
}

impl RulesConfig {
    /// Parses and validates a configuration. Missing fields take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when a limit is zero.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks that both limits are at least 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fifty_move_limit == 0 {
            return Err(ConfigError::Invalid(
                "fifty_move_limit must be at least 1".to_string(),
            ));
        }
        if self.repetition_limit == 0 {
            return Err(ConfigError::Invalid(
                "repetition_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
