// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Dynamic shared-object plugin loading (§4.3, step 3).
//!
//! The plugin ABI is a C boundary: a loaded shared object exports one named
//! symbol per filter id, pointing at a filter-class descriptor whose
//! callable follows the host library's `(flags, cd_values, &mut buffer) ->
//! new_nbytes` contract. This is the one place in the engine where the
//! buffer ownership crosses an FFI edge, so it is handled with raw parts
//! instead of the `&mut Vec<u8>` the rest of the engine uses — the callee
//! is responsible for leaving `*buf`/`*capacity` in a state `Vec::from_raw_parts`
//! can safely reclaim.

use std::env;
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;

use pfw_domain::error::EngineError;
use pfw_domain::services::filter_stage::FilterStage;
use pfw_domain::value_objects::FilterFlags;

/// Environment variable carrying the plugin search directory.
pub const PLUGIN_PATH_ENV: &str = "HDF5_PLUGIN_PATH";

/// Compile-time fallback search directory when `HDF5_PLUGIN_PATH` is unset.
pub const DEFAULT_PLUGIN_DIR: &str = "/usr/local/hdf5/lib/plugin";

/// Maps a `filter_id` to the shared-object file name and exported symbol
/// name the resolver looks for (§4.3, step 3).
///
/// This table only needs entries for filters the engine does not carry as
/// built-ins; it is intentionally small and can grow without touching the
/// resolver itself.
fn plugin_location(filter_id: u32) -> Option<(&'static str, &'static str)> {
    match filter_id {
        // LZ4, filter id 32004 in the host library's public filter registry.
        32004 => Some(("libh5lz4.so", "H5Z_LZ4")),
        _ => None,
    }
}

/// The C ABI a loaded filter-class descriptor's callable must satisfy.
///
/// Returns the new payload length, or `0` on failure. On success the
/// callee may have replaced `*buf` with a larger allocation, updating
/// `*capacity` to match and leaving the old allocation already freed.
type FilterApplyFn = unsafe extern "C" fn(
    flags: u32,
    cd_nelmts: usize,
    cd_values: *const u32,
    nbytes: usize,
    capacity: *mut usize,
    buf: *mut *mut u8,
) -> usize;

#[repr(C)]
struct FilterClassDescriptor {
    filter_id: u32,
    apply: FilterApplyFn,
}

/// A filter resolved from a dynamically loaded shared object.
///
/// Holds the `Library` handle alive for the process lifetime (per the
/// "leak for process lifetime" policy decided for plugin handles): once a
/// plugin is loaded, it is never unloaded mid-process, so any thread still
/// holding an `Arc<PluginFilter>` after a hypothetical registry reset would
/// otherwise call into unmapped memory.
struct PluginFilter {
    _library: Arc<Library>,
    filter_id: u32,
    apply: FilterApplyFn,
}

impl FilterStage for PluginFilter {
    fn filter_id(&self) -> u32 {
        self.filter_id
    }

    fn apply(&self, flags: FilterFlags, cd_values: &[u32], buffer: &mut Vec<u8>) -> Result<(), EngineError> {
        let nbytes = buffer.len();
        let mut capacity = buffer.capacity();
        let mut ptr = buffer.as_mut_ptr();

        // The callee takes ownership of the allocation for the duration of
        // the call via raw parts; forget the Rust-side handle so its
        // destructor does not free memory the plugin is about to touch.
        std::mem::forget(std::mem::take(buffer));

        // SAFETY: `ptr`/`capacity`/`nbytes` describe the buffer this
        // `PluginFilter` was resolved to operate on; the plugin ABI
        // contract requires the callee to either leave them unchanged or
        // replace them with a single consistent allocation obtained from
        // the same global allocator.
        let new_len = unsafe {
            (self.apply)(
                flags.bits(),
                cd_values.len(),
                cd_values.as_ptr(),
                nbytes,
                &mut capacity,
                &mut ptr,
            )
        };

        if new_len == 0 {
            return Err(EngineError::FilterIoError {
                filter_id: self.filter_id,
                reason: "plugin filter returned zero-length result".to_string(),
            });
        }

        // SAFETY: `ptr` now points at an allocation of `capacity` bytes,
        // `new_len` of which are initialised, per the ABI contract above.
        *buffer = unsafe { Vec::from_raw_parts(ptr, new_len, capacity) };
        Ok(())
    }
}

/// Loads the shared object for `filter_id` from the plugin search path and
/// resolves its exported filter-class descriptor.
///
/// The search path is `HDF5_PLUGIN_PATH` if set, else [`DEFAULT_PLUGIN_DIR`].
/// One load per `filter_id` per call is sufficient; the caller
/// (`FilterRegistry`) may cache the result across calls.
pub fn load(filter_id: u32) -> Result<Arc<dyn FilterStage>, EngineError> {
    let (file_name, symbol_name) = plugin_location(filter_id).ok_or_else(|| EngineError::RequiredFilterMissing {
        filter_id,
        reason: "no plugin location registered for this filter id".to_string(),
    })?;

    let dir = search_dir();
    let path = dir.join(file_name);
    if !path.is_file() {
        return Err(EngineError::PluginNotFound(path.display().to_string()));
    }

    // SAFETY: loading an arbitrary shared object is inherently unsafe;
    // the plugin search path is an explicit, operator-controlled input
    // (§4.3), not untrusted data.
    let library = unsafe { Library::new(&path) }.map_err(|_| EngineError::PluginNotFound(path.display().to_string()))?;

    let symbol_cstr = CString::new(symbol_name).expect("plugin symbol names are static ASCII literals");
    // SAFETY: `descriptor` is only dereferenced immediately below, while
    // `library` is kept alive inside the returned `PluginFilter` for as
    // long as the function pointer it contains might be called.
    let descriptor: *const FilterClassDescriptor = unsafe {
        match library.get::<*const FilterClassDescriptor>(symbol_cstr.as_bytes_with_nul()) {
            Ok(sym) => *sym,
            Err(_) => {
                return Err(EngineError::SymbolNotFound {
                    plugin: file_name.to_string(),
                    symbol: symbol_name.to_string(),
                })
            }
        }
    };

    if descriptor.is_null() {
        return Err(EngineError::SymbolNotFound {
            plugin: file_name.to_string(),
            symbol: symbol_name.to_string(),
        });
    }

    // SAFETY: non-null, per the ABI contract the plugin author upholds.
    let apply = unsafe { (*descriptor).apply };

    Ok(Arc::new(PluginFilter {
        _library: Arc::new(library),
        filter_id,
        apply,
    }))
}

fn search_dir() -> PathBuf {
    env::var_os(PLUGIN_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(DEFAULT_PLUGIN_DIR).to_path_buf())
}
