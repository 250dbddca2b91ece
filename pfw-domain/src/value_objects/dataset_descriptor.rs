// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Dataset descriptor value object.
//!
//! Captures the logical shape of the in-memory array the caller wants
//! written, independent of how it will be chunked or filtered.

use crate::error::EngineError;

/// Maximum supported dataset rank, per the data model's chunk index bound.
pub const MAX_RANK: usize = 32;

/// Logical shape of an N-dimensional dataset being written.
///
/// `rank` and `extents` describe the full logical array; `element_size` is
/// the size in bytes of one element. The element type itself is opaque to
/// the engine — only filters interpret element contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    extents: Vec<u64>,
    element_size: usize,
}

impl DatasetDescriptor {
    /// Builds a dataset descriptor, validating rank, extents, and element
    /// size per the data model's invariants.
    pub fn new(extents: Vec<u64>, element_size: usize) -> Result<Self, EngineError> {
        let rank = extents.len();
        if rank == 0 || rank > MAX_RANK {
            return Err(EngineError::InvalidRank(rank));
        }
        if extents.iter().any(|&d| d == 0) {
            return Err(EngineError::InvalidChunkShape(
                "dataset extents must all be non-zero".to_string(),
            ));
        }
        if element_size == 0 {
            return Err(EngineError::ZeroElementSize);
        }
        Ok(Self { extents, element_size })
    }

    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    pub fn extents(&self) -> &[u64] {
        &self.extents
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Total number of elements in the logical dataset.
    pub fn element_count(&self) -> u64 {
        self.extents.iter().product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_rank() {
        assert!(matches!(
            DatasetDescriptor::new(vec![], 4),
            Err(EngineError::InvalidRank(0))
        ));
    }

    #[test]
    fn rejects_rank_above_max() {
        let extents = vec![1u64; MAX_RANK + 1];
        assert!(matches!(
            DatasetDescriptor::new(extents, 4),
            Err(EngineError::InvalidRank(33))
        ));
    }

    #[test]
    fn rejects_zero_element_size() {
        assert!(matches!(
            DatasetDescriptor::new(vec![4, 4], 0),
            Err(EngineError::ZeroElementSize)
        ));
    }

    #[test]
    fn accepts_valid_descriptor() {
        let d = DatasetDescriptor::new(vec![5, 3], 4).unwrap();
        assert_eq!(d.rank(), 2);
        assert_eq!(d.element_count(), 15);
    }
}
