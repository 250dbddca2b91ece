// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Lightweight atomic-counter metrics for one `parallel_filtered_write`
//! call.
//!
//! This is deliberately not a `prometheus` exporter: the engine has no
//! long-lived process to scrape and no stable metric-naming surface to
//! commit to, only a single call whose counters are useful to report back
//! to the caller and to the tracing span that wraps it. A host embedding
//! this engine in a long-lived service can read `CallMetrics` after the
//! call and forward the numbers into whatever metrics system it already
//! runs.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters accumulated over the lifetime of one call, safe to update
/// concurrently from every worker thread.
#[derive(Default)]
pub struct CallMetrics {
    chunks_enqueued: AtomicU64,
    chunks_written: AtomicU64,
    filters_skipped: AtomicU64,
    queue_depth_high_water: AtomicU64,
}

impl CallMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_chunk_enqueued(&self) {
        self.chunks_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_chunk_written(&self) {
        self.chunks_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filter_skipped(&self) {
        self.filters_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Updates the high-water mark if `depth` exceeds it.
    pub fn observe_queue_depth(&self, depth: u64) {
        self.queue_depth_high_water.fetch_max(depth, Ordering::Relaxed);
    }

    pub fn chunks_enqueued(&self) -> u64 {
        self.chunks_enqueued.load(Ordering::Relaxed)
    }

    pub fn chunks_written(&self) -> u64 {
        self.chunks_written.load(Ordering::Relaxed)
    }

    pub fn filters_skipped(&self) -> u64 {
        self.filters_skipped.load(Ordering::Relaxed)
    }

    pub fn queue_depth_high_water(&self) -> u64 {
        self.queue_depth_high_water.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let metrics = CallMetrics::new();
        assert_eq!(metrics.chunks_enqueued(), 0);
        assert_eq!(metrics.chunks_written(), 0);
    }

    #[test]
    fn high_water_mark_keeps_the_maximum() {
        let metrics = CallMetrics::new();
        metrics.observe_queue_depth(4);
        metrics.observe_queue_depth(2);
        metrics.observe_queue_depth(9);
        assert_eq!(metrics.queue_depth_high_water(), 9);
    }
}
