//! # Symbol Store
//!
//! Bounded mapping from symbol to its [`SeriesAggregator`].
//!
//! Locking is two-level:
//! - the symbol index (`RwLock<SymbolIndex>`) guards creation, deletion and listing, so the
//!   symbol budget stays exact under concurrent requests;
//! - every series has its own `RwLock`, so a fold is atomic relative to other folds and
//!   snapshots of the same symbol while unrelated symbols proceed in parallel.
//!
//! The index lock is never held while waiting on a series lock, except when a new series
//! is inserted, in which case the series is not yet reachable by anyone else.

use crate::aggregator::{SeriesAggregator, SeriesSnapshot};
use crate::arena::{SeriesArena, SeriesHandle, SlotId};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::limits::{LimitPolicy, SymbolCatalog};
use crate::Symbol;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Success marker for [`SymbolStore::add_batch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBatchReceipt {
    pub symbol: Symbol,
    /// Number of values folded
    pub accepted: usize,
    /// Whether this batch created the symbol
    pub created: bool,
}

/// Read handle to one symbol's series
#[derive(Debug, Clone)]
pub struct SeriesView {
    symbol: Symbol,
    series: SeriesHandle,
}

impl SeriesView {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Consistent snapshot; never observes a partially applied fold
    pub fn snapshot(&self) -> SeriesSnapshot {
        self.series.read().snapshot()
    }
}

struct SymbolIndex {
    arena: SeriesArena,
    by_symbol: HashMap<Symbol, SlotId>,
    /// Creation order of live symbols
    order: Vec<SlotId>,
}

impl SymbolIndex {
    fn handle(&self, symbol: &str) -> Option<SeriesHandle> {
        let id = self.by_symbol.get(symbol)?;
        self.arena.get(*id).map(|slot| slot.series.clone())
    }
}

impl SymbolCatalog for SymbolIndex {
    fn symbol_count(&self) -> usize {
        self.arena.len()
    }

    fn contains_symbol(&self, symbol: &str) -> bool {
        self.by_symbol.contains_key(symbol)
    }
}

/// Main store. Owned by the caller and shared by reference or `Arc`.
pub struct SymbolStore {
    config: StoreConfig,
    limits: LimitPolicy,
    index: RwLock<SymbolIndex>,
}

impl SymbolStore {
    /// Create a store with the given limits
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let capacity = u32::try_from(config.max_symbols)
            .map_err(|_| StoreError::Config("max_symbols must fit in 32 bits".to_string()))?;
        Ok(Self::with_capacity(config, capacity))
    }

    fn with_capacity(config: StoreConfig, capacity: u32) -> Self {
        let arena = SeriesArena::with_capacity(capacity);
        debug!(
            "Created symbol store: {} symbol slots, batches up to {} values, symbols up to {} chars",
            arena.capacity(),
            config.max_batch_size,
            config.max_symbol_length
        );

        Self {
            config,
            limits: LimitPolicy::new(&config),
            index: RwLock::new(SymbolIndex {
                arena,
                by_symbol: HashMap::with_capacity(config.max_symbols),
                order: Vec::with_capacity(config.max_symbols),
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn limits(&self) -> &LimitPolicy {
        &self.limits
    }

    /// Append a batch to `symbol`, creating the symbol on first use.
    ///
    /// Checks run in a fixed order: symbol length, batch contents, symbol budget. The
    /// first failure is returned and the store is left untouched.
    pub fn add_batch(&self, symbol: &str, values: &[f64]) -> StoreResult<AddBatchReceipt> {
        self.limits.validate_symbol(symbol)?;
        self.limits.validate_batch(values)?;

        let existing = self.index.read().handle(symbol);
        if let Some(series) = existing {
            series.write().fold(values);
            return Ok(self.receipt(symbol, values, false));
        }

        let mut index = self.index.write();
        // Another writer may have created the symbol between the two locks
        if let Some(series) = index.handle(symbol) {
            drop(index);
            series.write().fold(values);
            return Ok(self.receipt(symbol, values, false));
        }

        self.limits.validate_symbol_capacity(&*index, symbol)?;

        let series = SeriesAggregator::from_batch(values)
            .ok_or(StoreError::InvalidBatchSize { len: 0, max: self.limits.max_batch_size() })?;
        let id = index
            .arena
            .alloc(symbol.to_string(), series)
            .ok_or(StoreError::SymbolLimitReached { max: self.limits.max_symbols() })?;
        index.by_symbol.insert(symbol.to_string(), id);
        index.order.push(id);

        debug!(
            "Created symbol {} ({} of {} slots used)",
            symbol,
            index.arena.len(),
            self.limits.max_symbols()
        );
        Ok(self.receipt(symbol, values, true))
    }

    /// Currently held symbols in creation order
    pub fn get_symbols(&self) -> Vec<Symbol> {
        let index = self.index.read();
        index
            .order
            .iter()
            .filter_map(|id| index.arena.get(*id).map(|slot| slot.symbol.clone()))
            .collect()
    }

    /// Remove a symbol and free its slot
    pub fn delete_symbol(&self, symbol: &str) -> StoreResult<()> {
        let mut index = self.index.write();
        let id = index.by_symbol.remove(symbol).ok_or_else(|| StoreError::not_found(symbol))?;
        index.order.retain(|live| *live != id);
        index.arena.free(id);

        debug!(
            "Deleted symbol {} ({} of {} slots used)",
            symbol,
            index.arena.len(),
            self.limits.max_symbols()
        );
        Ok(())
    }

    /// Read access to a symbol's aggregator
    pub fn get_aggregator(&self, symbol: &str) -> StoreResult<SeriesView> {
        let series =
            self.index.read().handle(symbol).ok_or_else(|| StoreError::not_found(symbol))?;
        Ok(SeriesView { symbol: symbol.to_string(), series })
    }

    /// Remove every symbol. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut index = self.index.write();
        index.by_symbol.clear();
        index.order.clear();
        let removed = index.arena.clear();

        debug!("Cleared symbol store, removed {} symbols", removed);
        removed
    }

    pub fn len(&self) -> usize {
        self.index.read().symbol_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.read().contains_symbol(symbol)
    }

    fn receipt(&self, symbol: &str, values: &[f64], created: bool) -> AddBatchReceipt {
        AddBatchReceipt { symbol: symbol.to_string(), accepted: values.len(), created }
    }
}

impl SymbolCatalog for SymbolStore {
    fn symbol_count(&self) -> usize {
        self.len()
    }

    fn contains_symbol(&self, symbol: &str) -> bool {
        self.contains(symbol)
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        let config = StoreConfig::default();
        Self::with_capacity(config, config.max_symbols as u32)
    }
}

impl std::fmt::Debug for SymbolStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolStore")
            .field("config", &self.config)
            .field("symbols", &self.get_symbols())
            .finish()
    }
}
