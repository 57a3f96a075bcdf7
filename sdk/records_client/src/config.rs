//! Client configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [session]
//! finalization_timeout_secs = 60
//!
//! [sandbox]
//! ledger_close_secs = 5
//! genesis_timestamp = 1700000000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value is out of range.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.session.finalization_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "session.finalization_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.sandbox.ledger_close_secs == 0 {
            return Err(ConfigError::Validation(
                "sandbox.ledger_close_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Session controller settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on waiting for a transaction to finalize.
    #[serde(default = "default_finalization_timeout_secs")]
    pub finalization_timeout_secs: u64,
}

impl SessionConfig {
    pub fn finalization_timeout(&self) -> Duration {
        Duration::from_secs(self.finalization_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            finalization_timeout_secs: default_finalization_timeout_secs(),
        }
    }
}

fn default_finalization_timeout_secs() -> u64 {
    60
}

/// In-process ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Seconds the ledger clock advances per finalized transaction.
    #[serde(default = "default_ledger_close_secs")]
    pub ledger_close_secs: u64,
    /// Ledger timestamp at start-up.
    #[serde(default = "default_genesis_timestamp")]
    pub genesis_timestamp: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            ledger_close_secs: default_ledger_close_secs(),
            genesis_timestamp: default_genesis_timestamp(),
        }
    }
}

fn default_ledger_close_secs() -> u64 {
    5
}

fn default_genesis_timestamp() -> u64 {
    1_700_000_000
}
