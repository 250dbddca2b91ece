// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! In-memory `HostDataset` so the engine can be exercised end to end
//! without a real host library.
//!
//! Everything this demonstration dataset does — storing encoded chunks in a
//! map keyed by origin, serialising its own writes behind a lock — stands in
//! for the host library's B-tree chunk index (explicitly out of scope, §1).
//! It exists only so `pfw-bootstrap`'s demo binary has something to write
//! into.

use std::collections::HashMap;
use std::sync::Mutex;

use pfw_domain::error::EngineError;
use pfw_domain::repositories::HostDataset;
use pfw_domain::value_objects::{ChunkShape, DatasetDescriptor, FailureMask, FilterPipelineDescriptor};

/// One written chunk, as the demonstration dataset recorded it.
#[derive(Debug, Clone)]
pub struct RecordedChunk {
    pub origin: Vec<u64>,
    pub encoded_len: usize,
    pub mask: FailureMask,
}

/// A toy chunked dataset held entirely in memory.
///
/// `write_chunk` is safe to call concurrently for distinct origins (the
/// `HostDataset` contract the engine relies on, §4.5): the lock only ever
/// guards the map insert itself, not any per-chunk work.
pub struct InMemoryHostDataset {
    dataset: DatasetDescriptor,
    chunk_shape: ChunkShape,
    filter_pipeline: FilterPipelineDescriptor,
    chunks: Mutex<HashMap<Vec<u64>, RecordedChunk>>,
}

impl InMemoryHostDataset {
    pub fn new(dataset: DatasetDescriptor, chunk_shape: ChunkShape, filter_pipeline: FilterPipelineDescriptor) -> Self {
        Self {
            dataset,
            chunk_shape,
            filter_pipeline,
            chunks: Mutex::new(HashMap::new()),
        }
    }

    /// Total encoded bytes written so far, across every chunk.
    pub fn total_encoded_bytes(&self) -> usize {
        self.chunks.lock().unwrap().values().map(|c| c.encoded_len).sum()
    }

    /// Number of chunks written so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.lock().unwrap().len()
    }

    /// Number of chunks with at least one masked filter position.
    pub fn masked_chunk_count(&self) -> usize {
        self.chunks.lock().unwrap().values().filter(|c| c.mask.any()).count()
    }
}

impl HostDataset for InMemoryHostDataset {
    fn dataset(&self) -> &DatasetDescriptor {
        &self.dataset
    }

    fn chunk_shape(&self) -> &ChunkShape {
        &self.chunk_shape
    }

    fn filter_pipeline(&self) -> &FilterPipelineDescriptor {
        &self.filter_pipeline
    }

    fn write_chunk(&self, origin: &[u64], buffer: &[u8], mask: FailureMask) -> Result<(), EngineError> {
        let recorded = RecordedChunk {
            origin: origin.to_vec(),
            encoded_len: buffer.len(),
            mask,
        };
        self.chunks.lock().unwrap().insert(origin.to_vec(), recorded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> InMemoryHostDataset {
        let d = DatasetDescriptor::new(vec![4, 4], 4).unwrap();
        let c = ChunkShape::new(vec![2, 2], &d).unwrap();
        InMemoryHostDataset::new(d, c, FilterPipelineDescriptor::empty())
    }

    #[test]
    fn tracks_written_chunks_and_bytes() {
        let host = dataset();
        host.write_chunk(&[0, 0], &[1, 2, 3, 4], FailureMask::new()).unwrap();
        host.write_chunk(&[0, 2], &[5, 6, 7, 8, 9], FailureMask::new()).unwrap();
        assert_eq!(host.chunk_count(), 2);
        assert_eq!(host.total_encoded_bytes(), 9);
        assert_eq!(host.masked_chunk_count(), 0);
    }

    #[test]
    fn counts_masked_chunks() {
        let host = dataset();
        let mut mask = FailureMask::new();
        mask.set(0);
        host.write_chunk(&[0, 0], &[1, 2, 3, 4], mask).unwrap();
        host.write_chunk(&[0, 2], &[5, 6, 7, 8], FailureMask::new()).unwrap();
        assert_eq!(host.masked_chunk_count(), 1);
    }
}
