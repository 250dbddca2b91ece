// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Immutable value objects describing datasets, chunk grids, filter
//! pipelines, and the work items that flow between the extractor and
//! workers.

pub mod chunk_shape;
pub mod dataset_descriptor;
pub mod failure_mask;
pub mod filter_pipeline;
pub mod resolved_pipeline;
pub mod work_item;
pub mod worker_count;

pub use chunk_shape::ChunkShape;
pub use dataset_descriptor::DatasetDescriptor;
pub use failure_mask::{FailureMask, MAX_PIPELINE_LEN};
pub use filter_pipeline::{FilterFlags, FilterPipelineDescriptor, FilterPipelineEntry};
pub use resolved_pipeline::{ResolvedPipeline, ResolvedSlot};
pub use work_item::WorkItem;
pub use worker_count::WorkerCount;
