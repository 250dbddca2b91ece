// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Chunk shape value object, as read from the host's chunked-layout
//! property list.

use crate::error::EngineError;
use crate::value_objects::dataset_descriptor::DatasetDescriptor;

/// Fixed shape `C[0..r)` a dataset is divided into.
///
/// Every chunk is allocated at this full shape, including edge chunks whose
/// logical region only partially overlaps the dataset extent (§3's
/// edge-chunk policy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkShape {
    dims: Vec<u64>,
}

impl ChunkShape {
    /// Validates that `dims` has one non-zero entry per dataset dimension.
    pub fn new(dims: Vec<u64>, dataset: &DatasetDescriptor) -> Result<Self, EngineError> {
        if dims.len() != dataset.rank() {
            return Err(EngineError::InvalidChunkShape(format!(
                "chunk shape rank {} does not match dataset rank {}",
                dims.len(),
                dataset.rank()
            )));
        }
        if dims.iter().any(|&c| c == 0) {
            return Err(EngineError::InvalidChunkShape(
                "chunk dimensions must all be non-zero".to_string(),
            ));
        }
        Ok(Self { dims })
    }

    pub fn dims(&self) -> &[u64] {
        &self.dims
    }

    /// Chunk element count `K = ∏ C[i]`.
    pub fn element_count(&self) -> u64 {
        self.dims.iter().product()
    }

    /// Raw chunk size in bytes, `Braw = K · e`, before any filter runs.
    pub fn raw_size(&self, element_size: usize) -> usize {
        (self.element_count() as usize) * element_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_rank_mismatch() {
        let dataset = DatasetDescriptor::new(vec![4, 4], 4).unwrap();
        assert!(ChunkShape::new(vec![2], &dataset).is_err());
    }

    #[test]
    fn rejects_zero_dimension() {
        let dataset = DatasetDescriptor::new(vec![4, 4], 4).unwrap();
        assert!(ChunkShape::new(vec![2, 0], &dataset).is_err());
    }

    #[test]
    fn computes_raw_size() {
        let dataset = DatasetDescriptor::new(vec![4, 4], 4).unwrap();
        let shape = ChunkShape::new(vec![2, 2], &dataset).unwrap();
        assert_eq!(shape.element_count(), 4);
        assert_eq!(shape.raw_size(4), 16);
    }
}
