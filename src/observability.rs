//! Observability stubs (metrics, tracing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    refreshes_completed: AtomicU64,
    refreshes_failed: AtomicU64,
    empty_results: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    rows_dropped: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_completed(&self) {
        self.refreshes_completed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "refreshes_completed", "Metric incremented");
    }

    pub fn refresh_failed(&self) {
        self.refreshes_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "refreshes_failed", "Metric incremented");
    }

    pub fn empty_result(&self) {
        self.empty_results.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "empty_results", "Metric incremented");
    }

    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "cache_hits", "Metric incremented");
    }

    pub fn cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "cache_misses", "Metric incremented");
    }

    pub fn rows_dropped(&self, count: u64) {
        self.rows_dropped.fetch_add(count, Ordering::Relaxed);
        tracing::debug!(counter = "rows_dropped", count, "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            refreshes_completed: self.refreshes_completed.load(Ordering::Relaxed),
            refreshes_failed: self.refreshes_failed.load(Ordering::Relaxed),
            empty_results: self.empty_results.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            rows_dropped: self.rows_dropped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub refreshes_completed: u64,
    pub refreshes_failed: u64,
    pub empty_results: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub rows_dropped: u64,
}
