// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Chunk Extractor (component 4): walks the chunk grid, materialises each
//! chunk into a freshly owned buffer, and enqueues work items.
//!
//! Runs on the calling thread (§2's control-flow note: "the calling thread
//! is the producer and also the orchestrator"). After the last chunk is
//! enqueued it pushes one sentinel per worker so every worker's dequeue
//! loop exits symmetrically.

use pfw_domain::error::EngineError;
use pfw_domain::services::chunk_grid::ChunkGrid;
use pfw_domain::value_objects::{ChunkShape, DatasetDescriptor, WorkItem, WorkerCount};

use crate::metrics::CallMetrics;
use crate::queue::BlockingQueue;

/// A row-major source array the extractor reads chunks out of.
///
/// Implemented directly on `&[u8]` by the orchestration entry point; kept
/// as a trait so the extractor can be unit-tested against small synthetic
/// arrays without a `HostDataset`.
pub trait SourceArray {
    /// Row-major bytes of the whole logical array, length
    /// `element_count() * element_size`.
    fn bytes(&self) -> &[u8];
}

impl SourceArray for [u8] {
    fn bytes(&self) -> &[u8] {
        self
    }
}

/// Walks every chunk in `grid`, copies its in-extent bytes out of `source`
/// into a freshly allocated, zero-filled full-shape buffer, and enqueues
/// it. Enqueues `workers.count()` sentinels once every chunk has been
/// pushed — or as soon as enqueueing fails, so a mid-walk allocation
/// failure (§4.1's documented failure mode) still lets every waiting
/// worker's `dequeue` return rather than blocking forever.
pub fn extract(
    dataset: &DatasetDescriptor,
    chunk_shape: &ChunkShape,
    grid: &ChunkGrid,
    source: &dyn SourceArray,
    queue: &BlockingQueue<WorkItem>,
    workers: WorkerCount,
    metrics: &CallMetrics,
) -> Result<(), EngineError> {
    let element_size = dataset.element_size();
    let extents = dataset.extents();
    let chunk_dims = chunk_shape.dims();
    let rank = extents.len();

    let result = (|| {
        for index in grid.indices() {
            let origin = grid.origin(&index);
            let buffer = materialize_chunk(&origin, chunk_dims, extents, element_size, rank, source);
            queue.enqueue(WorkItem::new(origin, buffer))?;
            metrics.record_chunk_enqueued();
        }
        Ok(())
    })();

    for _ in 0..workers.count() {
        queue.enqueue_sentinel();
    }
    result
}

/// Copies one chunk's in-extent region out of `source` into a freshly
/// allocated, zero-filled buffer of the full chunk shape (§3's edge-chunk
/// policy: `buffer_size_before_pipeline == Braw` for every chunk).
fn materialize_chunk(
    origin: &[u64],
    chunk_dims: &[u64],
    extents: &[u64],
    element_size: usize,
    rank: usize,
    source: &dyn SourceArray,
) -> Vec<u8> {
    let chunk_elements: u64 = chunk_dims.iter().product();
    let raw_size = chunk_elements as usize * element_size;
    let mut buffer = vec![0u8; raw_size];

    let in_extent_len: Vec<u64> = (0..rank)
        .map(|axis| {
            let end = (origin[axis] + chunk_dims[axis]).min(extents[axis]);
            end.saturating_sub(origin[axis])
        })
        .collect();
    if in_extent_len.iter().any(|&len| len == 0) {
        // Degenerate: origin lies entirely outside the extent along some
        // axis. Not reachable from a `ChunkGrid` built from a matching
        // dataset/chunk-shape pair, but handled defensively.
        return buffer;
    }

    copy_run(
        origin,
        chunk_dims,
        extents,
        &in_extent_len,
        element_size,
        rank,
        0,
        &mut Vec::with_capacity(rank),
        source.bytes(),
        &mut buffer,
    );
    buffer
}

/// Recursively walks every axis but the last, copying one contiguous
/// run of in-extent elements along the last axis per recursive leaf —
/// the row-run memcpy pattern for row-major arrays.
#[allow(clippy::too_many_arguments)]
fn copy_run(
    origin: &[u64],
    chunk_dims: &[u64],
    extents: &[u64],
    in_extent_len: &[u64],
    element_size: usize,
    rank: usize,
    axis: usize,
    index: &mut Vec<u64>,
    source: &[u8],
    dest: &mut [u8],
) {
    if axis == rank - 1 {
        let local = index.clone();
        let run_elements = in_extent_len[axis];
        if run_elements == 0 {
            return;
        }
        let source_offset = flat_offset(&local, origin, extents, rank) * element_size as u64;
        let dest_offset = flat_local_offset(&local, chunk_dims, rank) * element_size as u64;
        let run_bytes = run_elements as usize * element_size;
        let source_start = source_offset as usize;
        let dest_start = dest_offset as usize;
        dest[dest_start..dest_start + run_bytes].copy_from_slice(&source[source_start..source_start + run_bytes]);
        return;
    }

    for local_i in 0..in_extent_len[axis] {
        index.push(local_i);
        copy_run(
            origin,
            chunk_dims,
            extents,
            in_extent_len,
            element_size,
            rank,
            axis + 1,
            index,
            source,
            dest,
        );
        index.pop();
    }
}

/// Flattened row-major element offset into the full dataset, for the
/// element at `origin + local` (with `local`'s last axis always `0`, since
/// the caller appends the run's starting element separately).
fn flat_offset(local: &[u64], origin: &[u64], extents: &[u64], rank: usize) -> u64 {
    let mut offset = 0u64;
    for axis in 0..rank {
        let coord = origin[axis] + local.get(axis).copied().unwrap_or(0);
        offset = offset * extents[axis] + coord;
    }
    offset
}

/// Flattened row-major element offset into the chunk-local buffer.
fn flat_local_offset(local: &[u64], chunk_dims: &[u64], rank: usize) -> u64 {
    let mut offset = 0u64;
    for axis in 0..rank {
        let coord = local.get(axis).copied().unwrap_or(0);
        offset = offset * chunk_dims[axis] + coord;
    }
    offset
}
