// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Chunk Worker (component 5): dequeues a work item, runs the resolved
//! filter pipeline, and hands the result to the host write-through
//! primitive.
//!
//! Runs the resolved pipeline in order, tracking a `FailureMask` bit per
//! position. A failing *optional* filter masks that position and leaves
//! the buffer as the previous stage left it (§3's filter-failure mask:
//! "skipped or failed"). A failing *non-optional* filter masks its position
//! too and records the condition into the shared `FatalSlot`, but per §4.5
//! step 3 ("restore nbytes = capacity and continue") the worker keeps
//! running the remaining pipeline positions and still reaches step 4's
//! write-through call for this chunk — the fatal condition only surfaces
//! to the caller after every worker has joined (§7's revised "first fatal"
//! policy), it does not drop the chunk.

use pfw_domain::error::EngineError;
use pfw_domain::repositories::host_dataset::HostDataset;
use pfw_domain::value_objects::{FailureMask, ResolvedPipeline, ResolvedSlot, WorkItem};

use crate::metrics::CallMetrics;
use crate::queue::BlockingQueue;
use crate::runtime::FatalSlot;

/// Repeatedly dequeues work items and processes each one until the queue
/// yields a sentinel (`dequeue` returns `None`), at which point this
/// worker's run loop ends.
pub fn run(
    queue: &BlockingQueue<WorkItem>,
    pipeline: &ResolvedPipeline,
    dataset: &dyn HostDataset,
    fatal: &FatalSlot,
    metrics: &CallMetrics,
) {
    while let Some(item) = queue.dequeue() {
        process_one(item, pipeline, dataset, fatal, metrics);
    }
}

fn process_one(
    mut item: WorkItem,
    pipeline: &ResolvedPipeline,
    dataset: &dyn HostDataset,
    fatal: &FatalSlot,
    metrics: &CallMetrics,
) {
    let mut mask = FailureMask::new();

    for (position, slot) in pipeline.slots().iter().enumerate() {
        match slot {
            ResolvedSlot::Skip { .. } => {
                mask.set(position);
                metrics.record_filter_skipped();
            }
            ResolvedSlot::Active {
                filter,
                flags,
                cd_values,
            } => {
                let buffer = item.buffer_mut();
                if let Err(err) = filter.apply(*flags, cd_values, buffer) {
                    if flags.is_optional() {
                        tracing::warn!(
                            origin = %item.origin_key(),
                            filter_id = filter.filter_id(),
                            error = %err,
                            "optional filter failed at runtime, masking"
                        );
                        mask.set(position);
                        metrics.record_filter_skipped();
                    } else {
                        tracing::error!(
                            origin = %item.origin_key(),
                            filter_id = filter.filter_id(),
                            error = %err,
                            "non-optional filter failed"
                        );
                        fatal.record(EngineError::FilterFailed {
                            filter_id: filter.filter_id(),
                            origin: item.origin_key(),
                        });
                        mask.set(position);
                        metrics.record_filter_skipped();
                    }
                }
            }
        }
    }

    let origin = item.origin().to_vec();
    let origin_key = item.origin_key();
    let buffer = item.into_buffer();
    match dataset.write_chunk(&origin, &buffer, mask) {
        Ok(()) => metrics.record_chunk_written(),
        Err(err) => {
            tracing::error!(origin = %origin_key, error = %err, "write-through failed");
            fatal.record(EngineError::WriteThroughFailed {
                origin: origin_key,
                reason: err.to_string(),
            });
        }
    }
}
