//! Seedable test-data generators.
//!
//! Everything here is deterministic for a given seed so failing tests and load runs can
//! be replayed exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Characters a generated symbol is drawn from
pub const SYMBOL_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Lowest generated price
pub const MIN_PRICE: f64 = 0.01;

/// Highest generated price
pub const MAX_PRICE: f64 = 1000.0;

/// Yields unique symbols of a fixed length. Ends once every combination has been used.
#[derive(Debug)]
pub struct SymbolGenerator {
    length: usize,
    rng: StdRng,
    generated: HashSet<String>,
    limit: usize,
}

impl SymbolGenerator {
    pub fn new(length: usize, seed: u64) -> Self {
        assert!(length > 0, "symbol length must be > 0");
        let limit = SYMBOL_ALPHABET
            .len()
            .checked_pow(length as u32)
            .unwrap_or(usize::MAX);
        Self { length, rng: StdRng::seed_from_u64(seed), generated: HashSet::new(), limit }
    }

    fn random_symbol(&mut self) -> String {
        (0..self.length)
            .map(|_| SYMBOL_ALPHABET[self.rng.gen_range(0..SYMBOL_ALPHABET.len())] as char)
            .collect()
    }
}

impl Iterator for SymbolGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.generated.len() >= self.limit {
            return None;
        }
        loop {
            let symbol = self.random_symbol();
            if self.generated.insert(symbol.clone()) {
                return Some(symbol);
            }
        }
    }
}

/// Prices uniformly drawn from `[MIN_PRICE, MAX_PRICE]`, rounded to cents
#[derive(Debug)]
pub struct ValueStream {
    rng: StdRng,
    remaining: usize,
}

impl Iterator for ValueStream {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let raw: f64 = self.rng.gen_range(MIN_PRICE..=MAX_PRICE);
        Some(((raw * 100.0).round() / 100.0).max(MIN_PRICE))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ValueStream {}

/// Lazily generate `count` prices. Nothing is materialized until consumed.
pub fn generate_values(seed: u64, count: usize) -> ValueStream {
    ValueStream { rng: StdRng::seed_from_u64(seed), remaining: count }
}

/// Split a value stream into batches of at most `chunk_size`
#[derive(Debug)]
pub struct Chunks<I> {
    inner: I,
    chunk_size: usize,
}

impl<I: Iterator<Item = f64>> Iterator for Chunks<I> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Vec<f64>> {
        let chunk: Vec<f64> = self.inner.by_ref().take(self.chunk_size).collect();
        if chunk.is_empty() { None } else { Some(chunk) }
    }
}

pub fn chunk_values<I>(values: I, chunk_size: usize) -> Chunks<I::IntoIter>
where
    I: IntoIterator<Item = f64>,
{
    assert!(chunk_size > 0, "chunk size must be > 0");
    Chunks { inner: values.into_iter(), chunk_size }
}

/// Statistics recomputed directly from a fully retained history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub last: f64,
    pub mean: f64,
    /// Population variance, two-pass
    pub variance: f64,
}

/// Two-pass recomputation used as the oracle for incremental results.
/// Returns `None` for an empty history.
pub fn recompute(values: &[f64]) -> Option<ReferenceStats> {
    let last = *values.last()?;
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Some(ReferenceStats {
        count: values.len(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        last,
        mean,
        variance,
    })
}
