//! Nullable random — deterministic salts and counters.

use hashcash_work::NonceSource;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A deterministic nonce source for testing.
///
/// Returns pre-configured values in order, cycling when exhausted.
pub struct NullRandom {
    outputs: Vec<u64>,
    index: AtomicUsize,
}

impl NullRandom {
    /// Create with a sequence of values. An empty sequence yields zeros.
    pub fn new(outputs: Vec<u64>) -> Self {
        Self {
            outputs,
            index: AtomicUsize::new(0),
        }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: u64) -> Self {
        Self::new(vec![value])
    }

    /// How many values have been drawn.
    pub fn draws(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }
}

impl NonceSource for NullRandom {
    fn next_u64(&self) -> u64 {
        if self.outputs.is_empty() {
            return 0;
        }
        let idx = self.index.fetch_add(1, Ordering::Relaxed);
        self.outputs[idx % self.outputs.len()]
    }
}
