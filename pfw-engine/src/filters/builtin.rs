// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The built-in filter table: ids the resolver can satisfy without going to
//! the plugin search path.

use std::sync::Arc;

use pfw_domain::services::filter_stage::FilterStage;

use crate::filters::deflate::{DeflateFilter, FILTER_ID_DEFLATE};

/// Looks up a built-in filter by id. `None` means the id must be resolved
/// through the plugin search path instead.
pub fn lookup(filter_id: u32) -> Option<Arc<dyn FilterStage>> {
    match filter_id {
        FILTER_ID_DEFLATE => Some(Arc::new(DeflateFilter)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deflate_is_builtin() {
        assert!(lookup(FILTER_ID_DEFLATE).is_some());
    }

    #[test]
    fn unknown_id_is_not_builtin() {
        assert!(lookup(9999).is_none());
    }
}
