// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Built-in deflate filter, filter id 1 (mirrors the host library's
//! reserved id for its own deflate filter).

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;

use pfw_domain::error::EngineError;
use pfw_domain::services::filter_stage::FilterStage;
use pfw_domain::value_objects::FilterFlags;

/// Reserved id for the built-in deflate filter.
pub const FILTER_ID_DEFLATE: u32 = 1;

/// In-place deflate compression. `cd_values[0]`, if present, is the
/// compression level (0-9); otherwise the default level is used.
pub struct DeflateFilter;

impl FilterStage for DeflateFilter {
    fn filter_id(&self) -> u32 {
        FILTER_ID_DEFLATE
    }

    fn apply(&self, _flags: FilterFlags, cd_values: &[u32], buffer: &mut Vec<u8>) -> Result<(), EngineError> {
        let level = cd_values
            .first()
            .map(|&l| l.min(9))
            .map(Compression::new)
            .unwrap_or_default();
        let mut encoder = DeflateEncoder::new(Vec::with_capacity(buffer.len()), level);
        encoder
            .write_all(buffer)
            .map_err(|e| EngineError::FilterIoError {
                filter_id: FILTER_ID_DEFLATE,
                reason: e.to_string(),
            })?;
        let encoded = encoder.finish().map_err(|e| EngineError::FilterIoError {
            filter_id: FILTER_ID_DEFLATE,
            reason: e.to_string(),
        })?;
        *buffer = encoded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_inflate() {
        use std::io::Read;

        let mut buffer = b"hello hello hello hello hello".to_vec();
        let original = buffer.clone();
        DeflateFilter.apply(FilterFlags::default(), &[], &mut buffer).unwrap();
        assert_ne!(buffer, original);

        let mut decoder = flate2::read::DeflateDecoder::new(buffer.as_slice());
        let mut restored = Vec::new();
        decoder.read_to_end(&mut restored).unwrap();
        assert_eq!(restored, original);
    }
}
