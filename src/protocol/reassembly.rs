//! Reassembly buffer
//!
//! Collects the frames of one logical response and joins them in sequence
//! order. A buffer lives for exactly one request; any violation discards it.
//!
//! ## Checks, in order, per frame
//! 1. `total` agrees with the first frame seen
//! 2. `request_id` matches the id that was sent
//! 3. `total > 0` and `0 <= sequence < total`
//! 4. `sequence` not already buffered

use std::collections::BTreeMap;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProbeError, Result};
use super::Frame;

/// Ordered chunks of one response, keyed by sequence number
#[derive(Debug)]
pub struct ReassemblyBuffer {
    request_id: i16,
    total: Option<i16>,
    chunks: BTreeMap<i16, Bytes>,
}

impl ReassemblyBuffer {
    /// Fresh buffer for the exchange tagged `request_id`
    pub fn new(request_id: i16) -> Self {
        Self {
            request_id,
            total: None,
            chunks: BTreeMap::new(),
        }
    }

    /// Accept one frame. Returns `true` once every frame has arrived.
    pub fn push(&mut self, frame: Frame) -> Result<bool> {
        let header = frame.header;

        if let Some(expected) = self.total {
            if expected != header.total {
                return Err(ProbeError::InconsistentTotal {
                    expected,
                    actual: header.total,
                });
            }
        }
        self.total = Some(header.total);

        if header.request_id != self.request_id {
            return Err(ProbeError::RequestIdMismatch {
                expected: self.request_id,
                actual: header.request_id,
            });
        }

        if header.total <= 0 {
            return Err(ProbeError::MalformedFrame(format!(
                "non-positive total frame count {}",
                header.total
            )));
        }
        if header.sequence < 0 || header.sequence >= header.total {
            return Err(ProbeError::MalformedFrame(format!(
                "sequence {} outside 0..{}",
                header.sequence, header.total
            )));
        }

        if self.chunks.contains_key(&header.sequence) {
            return Err(ProbeError::DuplicateSequence(header.sequence));
        }

        tracing::trace!(
            "frame {}/{} for request {}: {} bytes",
            header.sequence,
            header.total,
            header.request_id,
            frame.content.len()
        );
        self.chunks.insert(header.sequence, frame.content);

        Ok(self.is_complete())
    }

    pub fn is_complete(&self) -> bool {
        match self.total {
            Some(total) => self.chunks.len() == total as usize,
            None => false,
        }
    }

    /// Number of distinct frames buffered so far
    pub fn received(&self) -> usize {
        self.chunks.len()
    }

    /// Declared total, once the first frame has been seen
    pub fn expected_total(&self) -> Option<i16> {
        self.total
    }

    /// Concatenate the chunks in ascending sequence order.
    ///
    /// Fails if frames are still missing; never returns a partial response.
    pub fn finish(self) -> Result<Bytes> {
        if !self.is_complete() {
            return Err(ProbeError::MalformedFrame(format!(
                "response incomplete: {} of {} frames",
                self.chunks.len(),
                self.total.unwrap_or(0)
            )));
        }

        let size = self.chunks.values().map(Bytes::len).sum();
        let mut out = BytesMut::with_capacity(size);
        for chunk in self.chunks.values() {
            out.put_slice(chunk);
        }
        Ok(out.freeze())
    }
}
