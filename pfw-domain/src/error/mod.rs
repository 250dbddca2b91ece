// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Domain-specific errors for the parallel filtered chunk write engine.
//!
//! Every variant belongs to exactly one of the five error kinds the engine's
//! propagation policy cares about: `Argument`, `Resolution`, `Resource`,
//! `Pipeline`, and `WriteThrough`. Argument and Resolution errors abort a call
//! before any worker starts; Resource, Pipeline, and WriteThrough errors are
//! discovered by a worker mid-call and recorded into the shared "first fatal"
//! slot instead of unwinding.

use thiserror::Error;

/// The five error kinds from the engine's propagation policy.
///
/// Used to decide whether an error can only surface before workers start
/// (`Argument`, `Resolution`) or may also surface from a worker mid-call
/// (`Resource`, `Pipeline`, `WriteThrough`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Argument,
    Resolution,
    Resource,
    Pipeline,
    WriteThrough,
}

/// Errors that can occur while validating, resolving, or executing a
/// parallel filtered chunk write.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    // ---- Argument: detected before any worker starts ----
    #[error("rank {0} out of range (must be 1..=32)")]
    InvalidRank(usize),

    #[error("source buffer is empty or null")]
    NullBuffer,

    #[error("source buffer has {actual} bytes, expected {expected}")]
    SourceBufferSizeMismatch { expected: usize, actual: usize },

    #[error("element size must be non-zero")]
    ZeroElementSize,

    #[error("chunk shape is invalid: {0}")]
    InvalidChunkShape(String),

    #[error("filter pipeline has {len} stages, exceeding the failure-mask width of {max}")]
    PipelineTooLong { len: usize, max: usize },

    #[error("requested {requested} threads exceeds ceiling of {max}")]
    ThreadCountExceedsCeiling { requested: usize, max: usize },

    // ---- Resolution: detected before any worker starts ----
    #[error("required filter {filter_id} could not be resolved: {reason}")]
    RequiredFilterMissing { filter_id: u32, reason: String },

    #[error("plugin file not found on HDF5_PLUGIN_PATH: {0}")]
    PluginNotFound(String),

    #[error("symbol `{symbol}` not found in plugin {plugin}")]
    SymbolNotFound { plugin: String, symbol: String },

    // ---- Resource: discovered by a worker ----
    #[error("allocation failed: {0}")]
    AllocationFailed(String),

    // ---- Pipeline: discovered by a worker ----
    #[error("filter {filter_id} reported an error: {reason}")]
    FilterIoError { filter_id: u32, reason: String },

    #[error("non-optional filter {filter_id} failed on chunk at {origin}")]
    FilterFailed { filter_id: u32, origin: String },

    // ---- Write-through: discovered by a worker ----
    #[error("host write-through primitive failed for chunk at {origin}: {reason}")]
    WriteThroughFailed { origin: String, reason: String },

    // ---- Resource: a worker thread itself died ----
    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),
}

impl EngineError {
    /// Classifies this error into one of the five propagation-policy kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidRank(_)
            | EngineError::NullBuffer
            | EngineError::SourceBufferSizeMismatch { .. }
            | EngineError::ZeroElementSize
            | EngineError::InvalidChunkShape(_)
            | EngineError::PipelineTooLong { .. }
            | EngineError::ThreadCountExceedsCeiling { .. } => ErrorKind::Argument,

            EngineError::RequiredFilterMissing { .. }
            | EngineError::PluginNotFound(_)
            | EngineError::SymbolNotFound { .. } => ErrorKind::Resolution,

            EngineError::AllocationFailed(_) | EngineError::WorkerPanicked(_) => ErrorKind::Resource,

            EngineError::FilterIoError { .. } | EngineError::FilterFailed { .. } => ErrorKind::Pipeline,

            EngineError::WriteThroughFailed { .. } => ErrorKind::WriteThrough,
        }
    }

    /// Errors detected before any worker is spawned must leave file state
    /// untouched; this distinguishes them from errors a worker can raise
    /// mid-call once some chunks may already be written.
    pub fn is_pre_start(&self) -> bool {
        matches!(self.kind(), ErrorKind::Argument | ErrorKind::Resolution)
    }
}
