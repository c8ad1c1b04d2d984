//! Error types for the StatsStore

use thiserror::Error;

/// Errors returned by store operations.
///
/// Every failure is a deterministic validation or policy outcome. None of them is
/// transient, so retrying the same request yields the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Batch must contain between 1 and {max} values, got {len}")]
    InvalidBatchSize { len: usize, max: usize },

    #[error("Value {value} at position {index} is not a positive number")]
    InvalidValue { index: usize, value: f64 },

    #[error("Symbol '{symbol}' is {len} characters long, the limit is {max}")]
    SymbolTooLong { symbol: String, len: usize, max: usize },

    #[error("Symbols limit reached ({max})")]
    SymbolLimitReached { max: usize },

    #[error("Symbol {symbol} not found")]
    SymbolNotFound { symbol: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Machine-distinguishable category of a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidBatchSize,
    InvalidValue,
    SymbolTooLong,
    SymbolLimitReached,
    SymbolNotFound,
    Config,
}

impl ErrorKind {
    /// Stable wire code for the error kind
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidBatchSize => "INVALID_BATCH_SIZE",
            ErrorKind::InvalidValue => "INVALID_VALUE",
            ErrorKind::SymbolTooLong => "SYMBOL_TOO_LONG",
            ErrorKind::SymbolLimitReached => "SYMBOL_LIMIT_REACHED",
            ErrorKind::SymbolNotFound => "SYMBOL_NOT_FOUND",
            ErrorKind::Config => "CONFIG_ERROR",
        }
    }
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::InvalidBatchSize { .. } => ErrorKind::InvalidBatchSize,
            StoreError::InvalidValue { .. } => ErrorKind::InvalidValue,
            StoreError::SymbolTooLong { .. } => ErrorKind::SymbolTooLong,
            StoreError::SymbolLimitReached { .. } => ErrorKind::SymbolLimitReached,
            StoreError::SymbolNotFound { .. } => ErrorKind::SymbolNotFound,
            StoreError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn not_found(symbol: &str) -> Self {
        StoreError::SymbolNotFound { symbol: symbol.to_string() }
    }
}

/// Result type for StatsStore operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_are_distinct() {
        let kinds = [
            ErrorKind::InvalidBatchSize,
            ErrorKind::InvalidValue,
            ErrorKind::SymbolTooLong,
            ErrorKind::SymbolLimitReached,
            ErrorKind::SymbolNotFound,
            ErrorKind::Config,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_messages() {
        let err = StoreError::SymbolLimitReached { max: 10 };
        assert_eq!(err.to_string(), "Symbols limit reached (10)");
        assert_eq!(err.kind(), ErrorKind::SymbolLimitReached);

        let err = StoreError::not_found("XYZ");
        assert_eq!(err.to_string(), "Symbol XYZ not found");
        assert_eq!(err.kind().code(), "SYMBOL_NOT_FOUND");
    }
}
