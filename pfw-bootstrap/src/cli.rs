// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Command-line surface for the demonstration binary.
//!
//! This is demonstration tooling only (§6, `SPEC_FULL.md`): it drives the
//! engine against [`crate::demo_dataset::InMemoryHostDataset`], not any
//! on-disk format, and is not part of the specified API surface.

use std::path::PathBuf;

use clap::Parser;

use pfw_domain::value_objects::{FilterFlags, FilterPipelineDescriptor, FilterPipelineEntry};
use pfw_engine::filters::deflate::FILTER_ID_DEFLATE;

/// Drive the parallel filtered chunk write engine against an in-memory
/// demonstration dataset.
#[derive(Debug, Parser)]
#[command(name = "pfw-demo", version, about)]
pub struct Cli {
    /// Dataset extents, one per axis (e.g. `--extents 16,16`).
    #[arg(long, value_delimiter = ',', default_values_t = [16u64, 16u64])]
    pub extents: Vec<u64>,

    /// Chunk shape, one per axis; rank must match `--extents`.
    #[arg(long, value_delimiter = ',', default_values_t = [4u64, 4u64])]
    pub chunk: Vec<u64>,

    /// Element size in bytes.
    #[arg(long, default_value_t = 4)]
    pub element_size: usize,

    /// Filter pipeline: `identity`, or `deflate[:level][,optional]`.
    #[arg(long, default_value = "identity")]
    pub filter: String,

    /// Worker thread count; `0` resolves from `H5_NTHREADS`/default.
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Optional TOML file carrying default plugin path / thread count.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity; repeatable (`-v`, `-vv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Error parsing the `--filter` argument.
#[derive(Debug, thiserror::Error)]
pub enum FilterSpecError {
    #[error("unknown filter `{0}`; expected `identity` or `deflate[:level][,optional]`")]
    Unknown(String),
    #[error("invalid deflate level `{0}`: must be 0-9")]
    InvalidLevel(String),
}

/// Parses the `--filter` CLI argument into a one-entry (or empty) pipeline.
///
/// `identity` yields the empty pipeline (no filters, chunks written raw).
/// `deflate`, `deflate:LEVEL`, `deflate,optional`, or
/// `deflate:LEVEL,optional` configure the built-in deflate filter, optionally
/// tagged `OPTIONAL` so a hypothetically-missing codec would be masked
/// rather than fail the call.
pub fn parse_filter_spec(spec: &str) -> Result<FilterPipelineDescriptor, FilterSpecError> {
    let mut parts = spec.split(',');
    let head = parts.next().unwrap_or("");
    let optional = parts.any(|tag| tag.trim() == "optional");

    if head == "identity" {
        return Ok(FilterPipelineDescriptor::empty());
    }

    let mut head_parts = head.splitn(2, ':');
    let name = head_parts.next().unwrap_or("");
    if name != "deflate" {
        return Err(FilterSpecError::Unknown(spec.to_string()));
    }

    let cd_values = match head_parts.next() {
        Some(level_str) => {
            let level: u32 = level_str
                .parse()
                .map_err(|_| FilterSpecError::InvalidLevel(level_str.to_string()))?;
            if level > 9 {
                return Err(FilterSpecError::InvalidLevel(level_str.to_string()));
            }
            vec![level]
        }
        None => vec![],
    };

    let flags = if optional {
        FilterFlags::new(FilterFlags::OPTIONAL)
    } else {
        FilterFlags::default()
    };

    Ok(FilterPipelineDescriptor::new(vec![FilterPipelineEntry::new(
        FILTER_ID_DEFLATE,
        flags,
        cd_values,
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_yields_empty_pipeline() {
        let pipeline = parse_filter_spec("identity").unwrap();
        assert!(pipeline.is_empty());
    }

    #[test]
    fn bare_deflate_uses_default_level() {
        let pipeline = parse_filter_spec("deflate").unwrap();
        assert_eq!(pipeline.len(), 1);
        assert!(pipeline.entries()[0].cd_values().is_empty());
        assert!(!pipeline.entries()[0].flags().is_optional());
    }

    #[test]
    fn deflate_with_level_and_optional() {
        let pipeline = parse_filter_spec("deflate:3,optional").unwrap();
        assert_eq!(pipeline.entries()[0].cd_values(), &[3]);
        assert!(pipeline.entries()[0].flags().is_optional());
    }

    #[test]
    fn rejects_unknown_filter_name() {
        assert!(matches!(parse_filter_spec("lz4"), Err(FilterSpecError::Unknown(_))));
    }

    #[test]
    fn rejects_out_of_range_level() {
        assert!(matches!(
            parse_filter_spec("deflate:42"),
            Err(FilterSpecError::InvalidLevel(_))
        ));
    }
}
