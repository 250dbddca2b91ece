// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The shared "first fatal" slot from §7/§9.
//!
//! The source design's worker function never propagated per-chunk failures
//! back to the orchestrator (§9's open question). This fixes that: a
//! lock-protected slot that any worker can record into, but only the first
//! recorded error survives. Workers that hit a fatal error keep draining
//! the queue (so the producer never blocks on a full hand-off) instead of
//! exiting early.

use parking_lot::Mutex;

use pfw_domain::error::EngineError;

/// Records at most one error: whichever fatal condition is observed first
/// across all worker threads.
#[derive(Default)]
pub struct FatalSlot {
    error: Mutex<Option<EngineError>>,
}

impl FatalSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` if no error has been recorded yet. Later calls are
    /// no-ops: only the first fatal error survives.
    pub fn record(&self, error: EngineError) {
        let mut slot = self.error.lock();
        if slot.is_none() {
            *slot = Some(error);
        }
    }

    /// Returns a clone of the first recorded error, if any.
    pub fn get(&self) -> Option<EngineError> {
        self.error.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_error_is_kept() {
        let slot = FatalSlot::new();
        slot.record(EngineError::NullBuffer);
        slot.record(EngineError::ZeroElementSize);
        assert!(matches!(slot.get(), Some(EngineError::NullBuffer)));
    }

    #[test]
    fn empty_slot_reports_none() {
        let slot = FatalSlot::new();
        assert!(slot.get().is_none());
    }
}
