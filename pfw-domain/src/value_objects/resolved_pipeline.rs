// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The filter resolver's output: an ordered array of callable filter
//! classes, ready to be shared read-only across workers.

use std::sync::Arc;

use crate::services::filter_stage::FilterStage;
use crate::value_objects::filter_pipeline::FilterFlags;

/// One resolved pipeline position.
///
/// `Skip` records that resolution already determined this position can
/// never run (an optional filter with no available plugin): every chunk's
/// failure mask gets this position's bit set without ever touching the
/// filter callable.
#[derive(Clone)]
pub enum ResolvedSlot {
    Active {
        filter: Arc<dyn FilterStage>,
        flags: FilterFlags,
        cd_values: Vec<u32>,
    },
    Skip {
        filter_id: u32,
    },
}

/// Immutable, shareable result of resolving a filter pipeline descriptor.
///
/// Resolved once per call (data model invariant 4) and read-only from every
/// worker thread for the rest of the call.
#[derive(Clone, Default)]
pub struct ResolvedPipeline {
    slots: Vec<ResolvedSlot>,
}

impl ResolvedPipeline {
    pub fn new(slots: Vec<ResolvedSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[ResolvedSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
