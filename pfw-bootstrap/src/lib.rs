// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap
//!
//! The composition root for the parallel filtered chunk write engine's
//! demonstration binary: CLI argument parsing, an optional on-disk defaults
//! file, logging initialization, and an in-memory `HostDataset` so the
//! engine in `pfw-engine` can be exercised end to end without a real
//! host library.
//!
//! Nothing here is part of the specified API surface (`pfw_engine::parallel_filtered_write`
//! is); this crate only wires the engine up to something runnable.

pub mod cli;
pub mod config;
pub mod demo_dataset;
pub mod exit_code;
pub mod logger;

pub use cli::{parse_filter_spec, Cli, FilterSpecError};
pub use config::DemoDefaults;
pub use demo_dataset::InMemoryHostDataset;
pub use exit_code::ExitCode;
