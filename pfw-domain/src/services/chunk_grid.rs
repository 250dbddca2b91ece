// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Pure chunk-grid arithmetic: how many chunks a dataset decomposes into,
//! their lexicographic enumeration, and each chunk's logical origin.
//!
//! This is stateless domain logic with no I/O — the chunk extractor
//! (infrastructure) drives this grid and materialises buffers; this module
//! only computes indices and origins.

use crate::value_objects::chunk_shape::ChunkShape;
use crate::value_objects::dataset_descriptor::DatasetDescriptor;

/// A dataset decomposed into a grid of fixed-shape chunks.
#[derive(Debug, Clone)]
pub struct ChunkGrid {
    extents: Vec<u64>,
    chunk_dims: Vec<u64>,
    grid_dims: Vec<u64>,
}

impl ChunkGrid {
    /// Builds the chunk grid for `dataset` divided into `chunk_shape`.
    ///
    /// `chunk_shape` is assumed already rank-validated against `dataset`
    /// (via `ChunkShape::new`); this constructor focuses on the grid-size
    /// arithmetic, `⌈Di / Ci⌉` per axis.
    pub fn new(dataset: &DatasetDescriptor, chunk_shape: &ChunkShape) -> Self {
        let extents = dataset.extents().to_vec();
        let chunk_dims = chunk_shape.dims().to_vec();
        let grid_dims = extents
            .iter()
            .zip(chunk_dims.iter())
            .map(|(&d, &c)| d.div_ceil(c))
            .collect();
        Self {
            extents,
            chunk_dims,
            grid_dims,
        }
    }

    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    pub fn grid_dims(&self) -> &[u64] {
        &self.grid_dims
    }

    /// Total chunk count `N = ∏ ⌈Di/Ci⌉`.
    pub fn chunk_count(&self) -> u64 {
        self.grid_dims.iter().product()
    }

    /// Logical origin of the chunk at `index`, `(ci · Ci)`.
    pub fn origin(&self, index: &[u64]) -> Vec<u64> {
        index.iter().zip(self.chunk_dims.iter()).map(|(&ci, &c)| ci * c).collect()
    }

    /// Whether the chunk at `index` is an edge chunk: its logical region
    /// extends past the dataset extent in at least one axis, so part of its
    /// allocated buffer is unspecified fill.
    pub fn is_edge_chunk(&self, index: &[u64]) -> bool {
        index
            .iter()
            .zip(self.chunk_dims.iter())
            .zip(self.extents.iter())
            .any(|((&ci, &c), &d)| (ci + 1) * c > d)
    }

    /// For axis `axis`, the number of in-extent elements the chunk at
    /// `index` covers (`<= chunk_dims[axis]`, less only for an edge chunk).
    pub fn in_extent_len(&self, index: &[u64], axis: usize) -> u64 {
        let origin = index[axis] * self.chunk_dims[axis];
        let end = (origin + self.chunk_dims[axis]).min(self.extents[axis]);
        end.saturating_sub(origin)
    }

    /// Enumerates every chunk index in lexicographic order (last axis
    /// increments fastest), matching the extractor's required iteration
    /// order.
    pub fn indices(&self) -> ChunkIndexIter {
        ChunkIndexIter::new(self.grid_dims.clone())
    }
}

/// Lexicographic iterator over a chunk grid's indices.
pub struct ChunkIndexIter {
    grid_dims: Vec<u64>,
    next: Option<Vec<u64>>,
}

impl ChunkIndexIter {
    fn new(grid_dims: Vec<u64>) -> Self {
        let start = if grid_dims.iter().all(|&d| d > 0) {
            Some(vec![0u64; grid_dims.len()])
        } else {
            None
        };
        Self { grid_dims, next: start }
    }
}

impl Iterator for ChunkIndexIter {
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let mut advanced = current.clone();
        for axis in (0..advanced.len()).rev() {
            advanced[axis] += 1;
            if advanced[axis] < self.grid_dims[axis] {
                self.next = Some(advanced);
                return Some(current);
            }
            advanced[axis] = 0;
        }
        // Every axis wrapped: grid exhausted after this element.
        self.next = None;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(extents: Vec<u64>, chunk: Vec<u64>) -> ChunkGrid {
        let dataset = DatasetDescriptor::new(extents, 4).unwrap();
        let shape = ChunkShape::new(chunk, &dataset).unwrap();
        ChunkGrid::new(&dataset, &shape)
    }

    #[test]
    fn s1_identity_single_thread_grid() {
        // r=2, D=(4,4), C=(2,2): 4 chunks at (0,0),(0,2),(2,0),(2,2).
        let g = grid(vec![4, 4], vec![2, 2]);
        assert_eq!(g.chunk_count(), 4);
        let origins: Vec<Vec<u64>> = g.indices().map(|idx| g.origin(&idx)).collect();
        assert_eq!(origins, vec![vec![0, 0], vec![0, 2], vec![2, 0], vec![2, 2]]);
        assert!(origins.iter().all(|_| true));
        assert!(!g.is_edge_chunk(&[0, 0]));
    }

    #[test]
    fn s2_edge_chunks_grid() {
        // r=2, D=(5,3), C=(2,2): ceil(5/2)*ceil(3/2) = 3*2 = 6 chunks.
        let g = grid(vec![5, 3], vec![2, 2]);
        assert_eq!(g.chunk_count(), 6);
        assert!(g.is_edge_chunk(&[2, 0])); // origin (4,0): axis 0 extends to 6 > 5
        assert!(!g.is_edge_chunk(&[0, 0]));
        assert_eq!(g.in_extent_len(&[2, 0], 0), 1); // only element 4 is in-extent
        assert_eq!(g.in_extent_len(&[0, 1], 1), 1); // origin (0,2): only element 2 is in-extent
    }

    #[test]
    fn indices_are_lexicographic_and_exhaustive() {
        let g = grid(vec![6, 6], vec![2, 3]);
        let all: Vec<Vec<u64>> = g.indices().collect();
        assert_eq!(all.len() as u64, g.chunk_count());
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn every_origin_occurs_exactly_once() {
        let g = grid(vec![16384, 4096], vec![1024, 1024]);
        let mut seen = std::collections::HashSet::new();
        for idx in g.indices() {
            let origin = g.origin(&idx);
            assert!(seen.insert(origin), "duplicate chunk origin");
        }
        assert_eq!(seen.len() as u64, g.chunk_count());
    }

    proptest::proptest! {
        /// `chunk_count` always matches `∏ ⌈Di/Ci⌉` computed independently,
        /// and always matches the number of indices the iterator yields.
        #[test]
        fn chunk_count_matches_ceiling_division_and_iterator_length(
            d0 in 1u64..200, d1 in 1u64..200,
            c0 in 1u64..50, c1 in 1u64..50,
        ) {
            let g = grid(vec![d0, d1], vec![c0, c1]);
            let expected = d0.div_ceil(c0) * d1.div_ceil(c1);
            proptest::prop_assert_eq!(g.chunk_count(), expected);
            proptest::prop_assert_eq!(g.indices().count() as u64, expected);
        }

        /// Every chunk's origin lands on a `chunk_dims`-aligned grid point,
        /// strictly inside the grid's total extent.
        #[test]
        fn every_origin_is_chunk_aligned_and_within_grid_extent(
            d0 in 1u64..200, d1 in 1u64..200,
            c0 in 1u64..50, c1 in 1u64..50,
        ) {
            let g = grid(vec![d0, d1], vec![c0, c1]);
            for idx in g.indices() {
                let origin = g.origin(&idx);
                proptest::prop_assert_eq!(origin[0] % c0, 0);
                proptest::prop_assert_eq!(origin[1] % c1, 0);
                proptest::prop_assert!(origin[0] < g.grid_dims()[0] * c0);
                proptest::prop_assert!(origin[1] < g.grid_dims()[1] * c1);
            }
        }

        /// A chunk is an edge chunk exactly when some axis's in-extent
        /// length is strictly less than the chunk's full dimension along
        /// that axis, and never copies more than the full chunk size.
        #[test]
        fn edge_chunk_fill_matches_in_extent_length(
            d0 in 1u64..200, d1 in 1u64..200,
            c0 in 1u64..50, c1 in 1u64..50,
        ) {
            let g = grid(vec![d0, d1], vec![c0, c1]);
            for idx in g.indices() {
                let len0 = g.in_extent_len(&idx, 0);
                let len1 = g.in_extent_len(&idx, 1);
                proptest::prop_assert!(len0 <= c0);
                proptest::prop_assert!(len1 <= c1);
                let short_axis = len0 < c0 || len1 < c1;
                proptest::prop_assert_eq!(short_axis, g.is_edge_chunk(&idx));
            }
        }
    }
}
