//! # Stats Engine
//!
//! Read-only rendering of a symbol's accumulated state into the reported statistics.

use crate::aggregator::SeriesSnapshot;
use crate::error::StoreResult;
use crate::store::SymbolStore;
use crate::Symbol;
use serde::{Deserialize, Serialize};

/// Statistics reported for one symbol over its full history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolStats {
    pub symbol: Symbol,
    /// Number of values folded
    pub size: u64,
    pub min: f64,
    pub max: f64,
    /// Most recently submitted value
    pub last: f64,
    pub avg: f64,
    /// Population variance
    pub variance: f64,
}

impl SymbolStats {
    pub fn from_snapshot(symbol: impl Into<Symbol>, snapshot: SeriesSnapshot) -> Self {
        Self {
            symbol: symbol.into(),
            size: snapshot.count,
            min: snapshot.minimum,
            max: snapshot.maximum,
            last: snapshot.last,
            avg: snapshot.mean,
            variance: snapshot.variance,
        }
    }
}

/// Façade over a [`SymbolStore`] answering stats queries
#[derive(Debug, Clone, Copy)]
pub struct StatsEngine<'a> {
    store: &'a SymbolStore,
}

impl<'a> StatsEngine<'a> {
    pub fn new(store: &'a SymbolStore) -> Self {
        Self { store }
    }

    /// Fails with `SymbolNotFound` for symbols never added or already deleted
    pub fn compute_stats(&self, symbol: &str) -> StoreResult<SymbolStats> {
        let view = self.store.get_aggregator(symbol)?;
        Ok(SymbolStats::from_snapshot(view.symbol(), view.snapshot()))
    }
}
