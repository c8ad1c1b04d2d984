//! # Configuration
//!
//! Limits consumed by the store. Values are supplied by the caller; the store never
//! reads the environment or files on its own.

use crate::error::{StoreError, StoreResult};
use crate::{DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_SYMBOLS, DEFAULT_MAX_SYMBOL_LENGTH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Capacity and validation limits for a [`crate::SymbolStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of values in a single batch
    pub max_batch_size: usize,

    /// Maximum number of distinct symbols held at the same time
    pub max_symbols: usize,

    /// Maximum symbol length in characters
    pub max_symbol_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_symbols: DEFAULT_MAX_SYMBOLS,
            max_symbol_length: DEFAULT_MAX_SYMBOL_LENGTH,
        }
    }
}

impl StoreConfig {
    /// Reject limits that would make every request fail
    pub fn validate(&self) -> StoreResult<()> {
        if self.max_batch_size == 0 {
            return Err(StoreError::Config("max_batch_size must be > 0".to_string()));
        }
        if self.max_symbols == 0 {
            return Err(StoreError::Config("max_symbols must be > 0".to_string()));
        }
        if self.max_symbol_length == 0 {
            return Err(StoreError::Config("max_symbol_length must be > 0".to_string()));
        }
        if u32::try_from(self.max_symbols).is_err() {
            return Err(StoreError::Config(format!(
                "max_symbols must fit in 32 bits, got {}",
                self.max_symbols
            )));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), anyhow::Error> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
