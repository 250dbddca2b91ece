// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Port onto the process-wide filter registry.
//!
//! §9 asks a reimplementation to expose the host's filter registry as an
//! explicit, lock-protected object rather than leaving it as ambient global
//! state. This trait is that explicit seam: `pfw-engine` provides the
//! concrete registry (built-ins plus `libloading`-backed plugins);
//! `pfw-domain` only names the capability so the resolver (component 3) can
//! be described and tested against a port, not a concrete loader.

use std::sync::Arc;

use crate::error::EngineError;
use crate::services::filter_stage::FilterStage;

/// Looks up a filter implementation by id, loading a plugin on demand if
/// the id is not a built-in.
pub trait FilterRegistry: Send + Sync {
    /// Resolves `filter_id` to a callable filter stage.
    ///
    /// Returns `Err` if the id is neither a known built-in nor resolvable
    /// through the plugin search path — the caller decides whether that is
    /// fatal (non-optional pipeline entry) or tolerable (optional entry).
    fn resolve(&self, filter_id: u32) -> Result<Arc<dyn FilterStage>, EngineError>;
}
