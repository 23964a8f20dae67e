//! Factory configuration.
//!
//! [`FactoryConfig`] controls how movetext is folded into games. It can be
//! built in code or loaded from TOML.

use chess_core::{Fen, FenError};
use chess_pgn::TokenizerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The configured initial position is not valid FEN.
    #[error("Invalid initial_fen: {0}")]
    InvalidFen(#[from] FenError),
}

/// Settings for [`crate::GameFactory`].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Deepest allowed nesting of variations. Defaults to 32.
    #[serde(default = "default_max_variation_depth")]
    pub max_variation_depth: usize,
    /// Starting position used when PGN text carries no `FEN` tag.
    /// Defaults to the standard starting position.
    #[serde(default)]
    pub initial_fen: Option<String>,
}

fn default_max_variation_depth() -> usize {
    32
}

impl Default for FactoryConfig {
    fn default() -> Self {
        FactoryConfig {
            max_variation_depth: default_max_variation_depth(),
            initial_fen: None,
        }
    }
}

impl FactoryConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for invalid TOML and
    /// [`ConfigError::InvalidFen`] if `initial_fen` does not parse.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FactoryConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks that the configured initial position parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(fen) = &self.initial_fen {
            Fen::parse(fen)?;
        }
        Ok(())
    }

    /// Tokenizer settings matching this configuration.
    pub fn tokenizer_config(&self) -> TokenizerConfig {
        TokenizerConfig {
            max_depth: self.max_variation_depth,
        }
    }
}
