// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Process-wide filter registry (§9's explicit-object resolution of the
//! "ambient global registry" open question).
//!
//! `ProcessFilterRegistry` is the concrete `FilterRegistry` port: built-ins
//! first, then the plugin search path, caching plugin loads for the life
//! of the process behind a lock. `global()` hands out one shared instance
//! per process via `OnceLock`, matching the singleton pattern used
//! elsewhere for process-wide infrastructure.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use pfw_domain::error::EngineError;
use pfw_domain::repositories::filter_registry::FilterRegistry;
use pfw_domain::services::filter_stage::FilterStage;

use crate::filters::{builtin, plugin};

/// Built-ins first, plugin search path second, with plugin loads cached
/// for the lifetime of the registry.
#[derive(Default)]
pub struct ProcessFilterRegistry {
    plugin_cache: Mutex<HashMap<u32, Arc<dyn FilterStage>>>,
}

impl ProcessFilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FilterRegistry for ProcessFilterRegistry {
    fn resolve(&self, filter_id: u32) -> Result<Arc<dyn FilterStage>, EngineError> {
        if let Some(filter) = builtin::lookup(filter_id) {
            return Ok(filter);
        }

        if let Some(cached) = self.plugin_cache.lock().get(&filter_id) {
            return Ok(Arc::clone(cached));
        }

        let loaded = plugin::load(filter_id)?;
        self.plugin_cache.lock().insert(filter_id, Arc::clone(&loaded));
        Ok(loaded)
    }
}

static GLOBAL_REGISTRY: OnceLock<ProcessFilterRegistry> = OnceLock::new();

/// The process-wide registry instance, initialised on first use.
///
/// Plugin `Library` handles loaded through it are intentionally never
/// unloaded: the decided policy is to leak them for the process lifetime
/// rather than risk unmapping code a worker thread might still be
/// executing.
pub fn global() -> &'static ProcessFilterRegistry {
    GLOBAL_REGISTRY.get_or_init(ProcessFilterRegistry::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::deflate::FILTER_ID_DEFLATE;

    #[test]
    fn resolves_builtin_without_touching_plugin_path() {
        let registry = ProcessFilterRegistry::new();
        let filter = registry.resolve(FILTER_ID_DEFLATE).unwrap();
        assert_eq!(filter.filter_id(), FILTER_ID_DEFLATE);
    }

    #[test]
    fn unresolvable_id_is_a_resolution_error() {
        let registry = ProcessFilterRegistry::new();
        let err = registry.resolve(0xDEAD_u32).unwrap_err();
        assert_eq!(err.kind(), pfw_domain::error::ErrorKind::Resolution);
    }
}
