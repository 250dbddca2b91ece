// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Stateless domain services: pure chunk-grid arithmetic, and the filter
//! callable contract that both built-in and plugin filters implement.

pub mod chunk_grid;
pub mod filter_stage;

pub use chunk_grid::ChunkGrid;
pub use filter_stage::FilterStage;
