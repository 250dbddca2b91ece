// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Parallel Filtered Chunk Write — Domain
//!
//! Pure, I/O-free data model for the parallel filtered chunk write engine:
//! dataset and chunk shape descriptors, chunk-grid arithmetic, the filter
//! pipeline descriptor and failure mask, work items, and the two ports
//! (`HostDataset`, `FilterRegistry`) the engine is built against.
//!
//! Nothing in this crate spawns a thread, touches the filesystem, or loads a
//! shared object — that's `pfw-engine`. This crate only describes the shape
//! of the problem and the contracts its collaborators must satisfy.

pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::{EngineError, ErrorKind};
pub use repositories::{FilterRegistry, HostDataset};
pub use services::{ChunkGrid, FilterStage};
pub use value_objects::{
    ChunkShape, DatasetDescriptor, FailureMask, FilterFlags, FilterPipelineDescriptor, FilterPipelineEntry,
    ResolvedPipeline, ResolvedSlot, WorkItem, WorkerCount, MAX_PIPELINE_LEN,
};
