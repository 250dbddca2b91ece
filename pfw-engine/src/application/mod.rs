// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Entry point / orchestration (§2's sixth row, §6's one API function).
//!
//! Validates arguments, resolves the filter pipeline once, constructs the
//! queue, spawns the worker pool, drives the chunk extractor on the
//! calling thread while workers run concurrently, joins the workers, and
//! reports the first fatal error if any.

use std::thread;

use pfw_domain::error::EngineError;
use pfw_domain::repositories::filter_registry::FilterRegistry;
use pfw_domain::repositories::host_dataset::HostDataset;
use pfw_domain::services::chunk_grid::ChunkGrid;
use pfw_domain::value_objects::WorkItem;

use crate::config;
use crate::extractor::{self, SourceArray};
use crate::filters;
use crate::metrics::CallMetrics;
use crate::queue::BlockingQueue;
use crate::runtime::{join_worker_pool, spawn_worker_pool, FatalSlot};
use crate::worker;

/// Outcome of a successful call: counters a caller can forward to its own
/// observability stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallReport {
    pub chunks_written: u64,
    pub chunks_enqueued: u64,
    pub filters_skipped: u64,
    pub queue_depth_high_water: u64,
}

/// Writes `source_buffer` into `dataset`'s chunked, filtered layout across
/// a pool of worker threads.
///
/// `nthreads == 0` resolves the worker count from `H5_NTHREADS` or the
/// compile-time default (§6). The call is synchronous: every worker is
/// joined before this function returns, whether it succeeded or not.
/// `source_dataspace_selector` is not modelled — only a full-extent
/// selection is supported, matching the "only 'all' is required" scope
/// note in §6.
#[tracing::instrument(skip(dataset, source_buffer), fields(rank = dataset.dataset().rank()))]
pub fn parallel_filtered_write(
    dataset: &dyn HostDataset,
    source_buffer: &[u8],
    nthreads: usize,
) -> Result<CallReport, EngineError> {
    parallel_filtered_write_with_registry(dataset, source_buffer, nthreads, filters::global_registry())
}

/// As [`parallel_filtered_write`], but resolves filters against an
/// explicit registry instead of the process-wide one, so tests can run
/// against a synthetic registry without touching global plugin-loading
/// state.
pub fn parallel_filtered_write_with_registry(
    dataset: &dyn HostDataset,
    source_buffer: &[u8],
    nthreads: usize,
    registry: &dyn FilterRegistry,
) -> Result<CallReport, EngineError> {
    validate_source_buffer(dataset, source_buffer)?;

    let workers = config::resolve_worker_count(if nthreads == 0 { None } else { Some(nthreads) });
    let resolved_pipeline = filters::resolve(dataset.filter_pipeline(), registry)?;
    let grid = ChunkGrid::new(dataset.dataset(), dataset.chunk_shape());

    let queue: BlockingQueue<WorkItem> = BlockingQueue::new();
    let fatal = FatalSlot::new();
    let metrics = CallMetrics::new();

    tracing::info!(
        chunk_count = grid.chunk_count(),
        workers = workers.count(),
        "starting parallel filtered write"
    );

    let task = |_index: usize| worker::run(&queue, &resolved_pipeline, dataset, &fatal, &metrics);

    let extract_result = thread::scope(|scope| {
        let handles = spawn_worker_pool(scope, workers, &task);

        let result = extractor::extract(
            dataset.dataset(),
            dataset.chunk_shape(),
            &grid,
            source_buffer as &dyn SourceArray,
            &queue,
            workers,
            &metrics,
        );

        join_worker_pool(handles, &fatal);
        result
    });
    extract_result?;

    metrics.observe_queue_depth(queue.elements_added());
    tracing::debug!(chunks_enqueued = queue.elements_added(), "extraction complete");

    match fatal.get() {
        Some(err) => Err(err),
        None => Ok(CallReport {
            chunks_written: metrics.chunks_written(),
            chunks_enqueued: metrics.chunks_enqueued(),
            filters_skipped: metrics.filters_skipped(),
            queue_depth_high_water: metrics.queue_depth_high_water(),
        }),
    }
}

fn validate_source_buffer(dataset: &dyn HostDataset, source_buffer: &[u8]) -> Result<(), EngineError> {
    if source_buffer.is_empty() {
        return Err(EngineError::NullBuffer);
    }
    let expected = dataset.dataset().element_count() as usize * dataset.dataset().element_size();
    if source_buffer.len() != expected {
        return Err(EngineError::SourceBufferSizeMismatch {
            expected,
            actual: source_buffer.len(),
        });
    }
    Ok(())
}

// Boundary-scenario coverage (S1, S2, S4, S5, S6, empty-buffer) lives in
// `tests/boundary_scenarios.rs` as an integration test against the public
// API, matching the teacher's convention of keeping whole-call scenarios
// out of unit-test modules. What's covered here is just the pre-start
// validation this module owns directly.
#[cfg(test)]
mod tests {
    use pfw_domain::value_objects::{ChunkShape, DatasetDescriptor};

    use super::*;

    struct StubDataset {
        dataset: DatasetDescriptor,
        chunk_shape: ChunkShape,
        filter_pipeline: pfw_domain::value_objects::FilterPipelineDescriptor,
    }

    impl HostDataset for StubDataset {
        fn dataset(&self) -> &DatasetDescriptor {
            &self.dataset
        }
        fn chunk_shape(&self) -> &ChunkShape {
            &self.chunk_shape
        }
        fn filter_pipeline(&self) -> &pfw_domain::value_objects::FilterPipelineDescriptor {
            &self.filter_pipeline
        }
        fn write_chunk(&self, _origin: &[u64], _buffer: &[u8], _mask: pfw_domain::value_objects::FailureMask) -> Result<(), EngineError> {
            unreachable!("validation rejects the call before any chunk is written")
        }
    }

    fn stub(extents: Vec<u64>, chunk: Vec<u64>) -> StubDataset {
        let dataset = DatasetDescriptor::new(extents, 1).unwrap();
        let chunk_shape = ChunkShape::new(chunk, &dataset).unwrap();
        StubDataset {
            dataset,
            chunk_shape,
            filter_pipeline: pfw_domain::value_objects::FilterPipelineDescriptor::empty(),
        }
    }

    #[test]
    fn empty_buffer_is_rejected_as_null_buffer() {
        let host = stub(vec![4, 4], vec![2, 2]);
        let err = validate_source_buffer(&host, &[]).unwrap_err();
        assert!(matches!(err, EngineError::NullBuffer));
    }

    #[test]
    fn mismatched_buffer_length_is_rejected() {
        let host = stub(vec![4, 4], vec![2, 2]);
        let source = vec![0u8; 10];
        let err = validate_source_buffer(&host, &source).unwrap_err();
        assert!(matches!(
            err,
            EngineError::SourceBufferSizeMismatch { expected: 16, actual: 10 }
        ));
    }

    #[test]
    fn correctly_sized_buffer_passes_validation() {
        let host = stub(vec![4, 4], vec![2, 2]);
        let source = vec![0u8; 16];
        assert!(validate_source_buffer(&host, &source).is_ok());
    }
}
