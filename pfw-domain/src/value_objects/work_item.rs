// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The unit of hand-off between the chunk extractor and chunk workers.

/// One chunk's logical origin and owned raw (pre-pipeline) or encoded
/// (post-pipeline) bytes.
///
/// `buffer.len()` plays the role of the source design's `nbytes`;
/// `buffer.capacity()` plays the role of `capacity`. A filter that grows the
/// buffer in place is simply a filter that resizes or replaces this `Vec` —
/// Rust's ownership model makes the "free the old buffer exactly once"
/// contract automatic, where the source design required each filter
/// implementation to do it by hand.
///
/// Invariant: between dequeue and the corresponding write-through call, the
/// buffer contents may be replaced but `origin` is immutable (data model
/// invariant 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    origin: Vec<u64>,
    buffer: Vec<u8>,
}

impl WorkItem {
    pub fn new(origin: Vec<u64>, buffer: Vec<u8>) -> Self {
        Self { origin, buffer }
    }

    pub fn origin(&self) -> &[u64] {
        &self.origin
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    /// A stable, human-readable rendering of the chunk origin, used in
    /// diagnostics and in fatal-error messages.
    pub fn origin_key(&self) -> String {
        let parts: Vec<String> = self.origin.iter().map(u64::to_string).collect();
        format!("({})", parts.join(", "))
    }
}
