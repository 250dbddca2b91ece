// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Filter Resolver (component 3): turns a pipeline descriptor into a
//! `ResolvedPipeline`, once per call, before any worker starts (§4.3).

use pfw_domain::error::EngineError;
use pfw_domain::repositories::filter_registry::FilterRegistry;
use pfw_domain::value_objects::{FilterPipelineDescriptor, ResolvedPipeline, ResolvedSlot, MAX_PIPELINE_LEN};

/// Resolves every entry in `pipeline` against `registry`.
///
/// A missing non-optional filter fails the whole call with
/// `EngineError::RequiredFilterMissing` (§4.3, step 2 and scenario S5). A
/// missing optional filter becomes `ResolvedSlot::Skip`, so every chunk's
/// failure mask gets that position's bit set without ever invoking a
/// filter callable (scenario S4). A pipeline longer than `FailureMask` can
/// represent is rejected here, before any worker starts, rather than
/// silently truncating per-position failure bits.
pub fn resolve(
    pipeline: &FilterPipelineDescriptor,
    registry: &dyn FilterRegistry,
) -> Result<ResolvedPipeline, EngineError> {
    if pipeline.len() > MAX_PIPELINE_LEN {
        return Err(EngineError::PipelineTooLong {
            len: pipeline.len(),
            max: MAX_PIPELINE_LEN,
        });
    }

    let mut slots = Vec::with_capacity(pipeline.len());
    for entry in pipeline.entries() {
        match registry.resolve(entry.filter_id()) {
            Ok(filter) => slots.push(ResolvedSlot::Active {
                filter,
                flags: entry.flags(),
                cd_values: entry.cd_values().to_vec(),
            }),
            Err(err) if entry.flags().is_optional() => {
                tracing::warn!(
                    filter_id = entry.filter_id(),
                    error = %err,
                    "optional filter unavailable, chunks will be masked"
                );
                slots.push(ResolvedSlot::Skip {
                    filter_id: entry.filter_id(),
                });
            }
            Err(err) => {
                return Err(EngineError::RequiredFilterMissing {
                    filter_id: entry.filter_id(),
                    reason: err.to_string(),
                })
            }
        }
    }
    Ok(ResolvedPipeline::new(slots))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pfw_domain::services::filter_stage::FilterStage;
    use pfw_domain::value_objects::{FilterFlags, FilterPipelineEntry};

    use super::*;
    use crate::filters::deflate::{DeflateFilter, FILTER_ID_DEFLATE};

    struct AlwaysFails;

    impl FilterRegistry for AlwaysFails {
        fn resolve(&self, filter_id: u32) -> Result<Arc<dyn FilterStage>, EngineError> {
            Err(EngineError::PluginNotFound(format!("no plugin for {filter_id}")))
        }
    }

    struct OnlyDeflate;

    impl FilterRegistry for OnlyDeflate {
        fn resolve(&self, filter_id: u32) -> Result<Arc<dyn FilterStage>, EngineError> {
            if filter_id == FILTER_ID_DEFLATE {
                Ok(Arc::new(DeflateFilter))
            } else {
                Err(EngineError::PluginNotFound(format!("no plugin for {filter_id}")))
            }
        }
    }

    #[test]
    fn s4_optional_missing_filter_resolves_to_skip() {
        let pipeline = FilterPipelineDescriptor::new(vec![FilterPipelineEntry::new(
            32004,
            FilterFlags::new(FilterFlags::OPTIONAL),
            vec![],
        )]);
        let resolved = resolve(&pipeline, &AlwaysFails).unwrap();
        assert_eq!(resolved.len(), 1);
        assert!(matches!(resolved.slots()[0], ResolvedSlot::Skip { filter_id: 32004 }));
    }

    #[test]
    fn s5_required_missing_filter_fails_resolution() {
        let pipeline = FilterPipelineDescriptor::new(vec![FilterPipelineEntry::new(
            32004,
            FilterFlags::default(),
            vec![],
        )]);
        let err = resolve(&pipeline, &AlwaysFails).unwrap_err();
        assert_eq!(err.kind(), pfw_domain::error::ErrorKind::Resolution);
    }

    #[test]
    fn pipeline_longer_than_failure_mask_width_is_rejected_before_any_resolve() {
        let entries = (0..=MAX_PIPELINE_LEN)
            .map(|id| FilterPipelineEntry::new(id as u32, FilterFlags::default(), vec![]))
            .collect();
        let pipeline = FilterPipelineDescriptor::new(entries);
        let err = resolve(&pipeline, &AlwaysFails).unwrap_err();
        assert!(matches!(
            err,
            EngineError::PipelineTooLong { len, max } if len == MAX_PIPELINE_LEN + 1 && max == MAX_PIPELINE_LEN
        ));
    }

    #[test]
    fn mixed_pipeline_resolves_available_entries_active() {
        let pipeline = FilterPipelineDescriptor::new(vec![
            FilterPipelineEntry::new(FILTER_ID_DEFLATE, FilterFlags::default(), vec![6]),
            FilterPipelineEntry::new(32004, FilterFlags::new(FilterFlags::OPTIONAL), vec![]),
        ]);
        let resolved = resolve(&pipeline, &OnlyDeflate).unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(matches!(resolved.slots()[0], ResolvedSlot::Active { .. }));
        assert!(matches!(resolved.slots()[1], ResolvedSlot::Skip { filter_id: 32004 }));
    }
}
