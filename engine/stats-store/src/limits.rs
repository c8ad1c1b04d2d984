//! # Limit Policy
//!
//! Stateless checks of symbols, batch contents and the symbol budget.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Read access to the set of symbols a store currently holds
pub trait SymbolCatalog {
    fn symbol_count(&self) -> usize;
    fn contains_symbol(&self, symbol: &str) -> bool;
}

/// Validation of requests against the configured limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    max_batch_size: usize,
    max_symbols: usize,
    max_symbol_length: usize,
}

impl LimitPolicy {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            max_batch_size: config.max_batch_size,
            max_symbols: config.max_symbols,
            max_symbol_length: config.max_symbol_length,
        }
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    pub fn max_symbols(&self) -> usize {
        self.max_symbols
    }

    pub fn max_symbol_length(&self) -> usize {
        self.max_symbol_length
    }

    /// Check batch length, then every element in submission order.
    ///
    /// NaN and infinities count as invalid numbers; zero is not positive.
    pub fn validate_batch(&self, values: &[f64]) -> StoreResult<()> {
        if values.is_empty() || values.len() > self.max_batch_size {
            return Err(StoreError::InvalidBatchSize {
                len: values.len(),
                max: self.max_batch_size,
            });
        }

        if let Some((index, &value)) =
            values.iter().enumerate().find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(StoreError::InvalidValue { index, value });
        }

        Ok(())
    }

    /// Symbol length is counted in characters, not bytes
    pub fn validate_symbol(&self, symbol: &str) -> StoreResult<()> {
        let len = symbol.chars().count();
        if len > self.max_symbol_length {
            return Err(StoreError::SymbolTooLong {
                symbol: symbol.to_string(),
                len,
                max: self.max_symbol_length,
            });
        }
        Ok(())
    }

    /// Fails only when `symbol` is new and the catalog is already full
    pub fn validate_symbol_capacity<C: SymbolCatalog + ?Sized>(
        &self,
        catalog: &C,
        symbol: &str,
    ) -> StoreResult<()> {
        if catalog.contains_symbol(symbol) {
            return Ok(());
        }
        if catalog.symbol_count() >= self.max_symbols {
            return Err(StoreError::SymbolLimitReached { max: self.max_symbols });
        }
        Ok(())
    }
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}
