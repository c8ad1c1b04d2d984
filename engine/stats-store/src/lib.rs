//! # StatsStore
//!
//! In-memory store of per-symbol price observations with online aggregate statistics.
//!
//! Batches of strictly positive prices are appended per symbol and folded into a
//! [`SeriesAggregator`] that keeps only running state (count, min, max, last, mean and
//! sum of squared deviations). Statistics are therefore answered in constant time no
//! matter how many values a symbol has accumulated, and raw history is never retained.
//!
//! Control flow:
//! - [`LimitPolicy`] validates the symbol, the batch contents and the symbol budget.
//! - [`SymbolStore`] owns the bounded symbol -> aggregator mapping and folds batches.
//! - [`StatsEngine`] renders an aggregator's state into [`SymbolStats`].

pub mod aggregator;
pub mod config;
pub mod error;
pub mod limits;
pub mod stats;
pub mod store;

mod arena;

#[cfg(test)]
mod tests;

pub use aggregator::{SeriesAggregator, SeriesSnapshot};
pub use config::StoreConfig;
pub use error::{ErrorKind, StoreError, StoreResult};
pub use limits::{LimitPolicy, SymbolCatalog};
pub use stats::{StatsEngine, SymbolStats};
pub use store::{AddBatchReceipt, SeriesView, SymbolStore};

/// Symbol identifier for a financial instrument
pub type Symbol = String;

/// Current version of the StatsStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default maximum number of values accepted in one batch
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10_000;

/// Default maximum number of distinct symbols held at once
pub const DEFAULT_MAX_SYMBOLS: usize = 10;

/// Default maximum symbol length in characters
pub const DEFAULT_MAX_SYMBOL_LENGTH: usize = 4;
