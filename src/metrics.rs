//! Cache metrics (thread-safe counters).

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Literal found in the identity cache
    identity_hits: AtomicU64,
    /// Literal built from a host type view
    identity_misses: AtomicU64,
    /// Type ids handed to the parser
    parses: AtomicU64,
    /// Method or field resolutions run
    resolutions: AtomicU64,
}

impl CacheMetrics {
    pub fn record_identity_hit(&self) {
        self.identity_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_identity_miss(&self) {
        self.identity_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse(&self) {
        self.parses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            identity_hits: self.identity_hits.load(Ordering::Relaxed),
            identity_misses: self.identity_misses.load(Ordering::Relaxed),
            parses: self.parses.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.identity_hits.store(0, Ordering::Relaxed);
        self.identity_misses.store(0, Ordering::Relaxed);
        self.parses.store(0, Ordering::Relaxed);
        self.resolutions.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of metrics (for reporting).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub identity_hits: u64,
    pub identity_misses: u64,
    pub parses: u64,
    pub resolutions: u64,
}

impl MetricsSnapshot {
    /// Identity cache hit rate.
    pub fn identity_hit_rate(&self) -> f64 {
        let total = self.identity_hits + self.identity_misses;
        if total == 0 {
            return 0.0;
        }
        self.identity_hits as f64 / total as f64
    }
}
