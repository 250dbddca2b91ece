// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Ports onto the host library's object model and process-wide filter
//! registry — the boundary this engine is deliberately built against
//! rather than absorbing.

pub mod filter_registry;
pub mod host_dataset;

pub use filter_registry::FilterRegistry;
pub use host_dataset::HostDataset;
