//! Datagram frame codec
//!
//! Every UDP datagram, in either direction, starts with an 8-byte header:
//!
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬──────────────┐
//! │ ReqId (2)    │ Seq (2)      │ Total (2)    │ Reserved (2) │
//! └──────────────┴──────────────┴──────────────┴──────────────┘
//! ```
//!
//! No I/O happens here.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProbeError, Result};

/// Header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Fixed-size frame header, fields in host order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Correlates all frames of one exchange
    pub request_id: i16,

    /// 0-based position of this frame within the response
    pub sequence: i16,

    /// Number of frames making up the response
    pub total: i16,

    pub reserved: i16,
}

impl FrameHeader {
    /// Header of an unfragmented request: `(id, 0, 1, 0)`
    pub fn request(request_id: i16) -> Self {
        Self {
            request_id,
            sequence: 0,
            total: 1,
            reserved: 0,
        }
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..2].copy_from_slice(&self.request_id.to_be_bytes());
        out[2..4].copy_from_slice(&self.sequence.to_be_bytes());
        out[4..6].copy_from_slice(&self.total.to_be_bytes());
        out[6..8].copy_from_slice(&self.reserved.to_be_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ProbeError::MalformedFrame(format!(
                "incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let field = |at: usize| i16::from_be_bytes([bytes[at], bytes[at + 1]]);
        Ok(Self {
            request_id: field(0),
            sequence: field(2),
            total: field(4),
            reserved: field(6),
        })
    }
}

/// A header plus the content chunk that follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: FrameHeader,
    pub content: Bytes,
}

impl Frame {
    pub fn new(header: FrameHeader, content: impl Into<Bytes>) -> Self {
        Self {
            header,
            content: content.into(),
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.content.len());
        buf.put_slice(&self.header.encode());
        buf.put_slice(&self.content);
        buf.freeze()
    }

    /// Split a received datagram into header and content without copying
    pub fn decode(datagram: Bytes) -> Result<Self> {
        let header = FrameHeader::decode(&datagram)?;
        Ok(Self {
            header,
            content: datagram.slice(HEADER_SIZE..),
        })
    }
}
