// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Port onto the host library's object model.
//!
//! Everything this trait exposes is deliberately out of scope for this
//! engine (§1): the file/dataset/dataspace/property-list object model,
//! on-disk B-tree chunk indexing, and the single-threaded write path all
//! live on the other side of this boundary. The engine only ever reads
//! the dataset's chunking/filter configuration through it and calls its
//! one write-through primitive.

use crate::error::EngineError;
use crate::value_objects::chunk_shape::ChunkShape;
use crate::value_objects::dataset_descriptor::DatasetDescriptor;
use crate::value_objects::failure_mask::FailureMask;
use crate::value_objects::filter_pipeline::FilterPipelineDescriptor;

/// A handle to a chunked, filtered dataset in the host library.
///
/// Implementations must allow concurrent calls to `write_chunk` from
/// multiple threads for distinct chunk origins within the same dataset
/// (§4.5's concurrency requirement on the write primitive); the engine
/// calls it unlocked.
pub trait HostDataset: Send + Sync {
    /// The logical shape of the array this dataset holds.
    fn dataset(&self) -> &DatasetDescriptor;

    /// The dataset's chunked-layout property, `C[0..r)`.
    fn chunk_shape(&self) -> &ChunkShape;

    /// The dataset's configured filter pipeline.
    fn filter_pipeline(&self) -> &FilterPipelineDescriptor;

    /// Writes one already-encoded chunk at `origin`, tagged with the
    /// filter-failure mask accumulated while running the pipeline.
    ///
    /// Safe to call concurrently for distinct `origin`s; the host library
    /// serialises its own chunk-index-table updates internally.
    fn write_chunk(&self, origin: &[u64], buffer: &[u8], mask: FailureMask) -> Result<(), EngineError>;
}
