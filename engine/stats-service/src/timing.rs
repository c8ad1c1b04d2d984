//! Scope timing for request handlers

use std::time::{Duration, Instant};
use tracing::info;

/// Logs the operation name and elapsed time when dropped, on every exit path
#[derive(Debug)]
pub struct OperationTimer {
    operation: &'static str,
    started: Instant,
}

impl OperationTimer {
    pub fn start(operation: &'static str) -> Self {
        Self { operation, started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        info!(operation = self.operation, elapsed_ms, "{} took {:.3} ms", self.operation, elapsed_ms);
    }
}
