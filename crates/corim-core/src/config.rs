use crate::error::ErrorKind;
use serde::Deserialize;
use thiserror::Error as ThisError;

/// Default bound on any document handed to a decoder.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid codec config: {0}")]
    Parse(String),

    #[error("invalid codec config: max_input_bytes must be greater than zero")]
    ZeroInputLimit,
}

impl ConfigError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Config
    }
}

///
/// CodecConfig
///
/// Caller policy applied to every encode and decode a session performs.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Inputs longer than this are rejected before any parsing.
    pub max_input_bytes: usize,
    /// Emit indented text output.
    pub pretty_json: bool,
}

impl CodecConfig {
    /// Parse a config from TOML text. Absent keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.max_input_bytes == 0 {
            return Err(ConfigError::ZeroInputLimit);
        }

        Ok(config)
    }

    #[must_use]
    pub const fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    #[must_use]
    pub const fn with_pretty_json(mut self, pretty_json: bool) -> Self {
        self.pretty_json = pretty_json;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            pretty_json: false,
        }
    }
}
