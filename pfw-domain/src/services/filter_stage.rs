// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The filter callable contract.
//!
//! A loaded shared object (or a built-in) exports a value implementing this
//! trait. The pipeline iterates a heterogeneous, ordered sequence of such
//! values — no inheritance hierarchy, just dynamic dispatch over a flat
//! capability.

use crate::error::EngineError;
use crate::value_objects::filter_pipeline::FilterFlags;

/// One filter stage in a pipeline.
///
/// `apply` is the in-out transform from §3's filter callable: it receives
/// the chunk's current bytes and may replace them in place (compress,
/// encrypt, checksum-and-pass-through, …). Returning `Err` is the Rust
/// equivalent of the source contract's "return of zero indicates failure".
///
/// Implementations must be safe to call concurrently from multiple worker
/// threads on distinct buffers: the engine calls `apply` unlocked, the same
/// way it calls the host write-through primitive unlocked.
pub trait FilterStage: Send + Sync {
    /// The filter id this stage implements, for diagnostics and mask
    /// attribution.
    fn filter_id(&self) -> u32;

    /// Applies this filter to `buffer` in place.
    ///
    /// `flags` carries the pipeline entry's flags combined with any
    /// write-direction flags the caller applies; `cd_values` are the
    /// filter's client-data parameters from the pipeline descriptor.
    fn apply(&self, flags: FilterFlags, cd_values: &[u32], buffer: &mut Vec<u8>) -> Result<(), EngineError>;
}
