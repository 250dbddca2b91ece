// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Filter Resolver (component 3): built-in filters, dynamic plugin
//! loading, the process-wide registry, and pipeline-descriptor resolution.

mod builtin;
pub mod deflate;
mod plugin;
mod registry;
mod resolver;

pub use plugin::PLUGIN_PATH_ENV;
pub use registry::{global as global_registry, ProcessFilterRegistry};
pub use resolver::resolve;
