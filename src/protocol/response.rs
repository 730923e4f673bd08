//! Response definitions
//!
//! Exact response markers and a builder for expected retrieval replies.

use bytes::{BufMut, Bytes, BytesMut};

use super::TERMINATOR;

pub const END: &[u8] = b"END\r\n";
pub const STORED: &[u8] = b"STORED\r\n";
pub const DELETED: &[u8] = b"DELETED\r\n";
pub const NOT_FOUND: &[u8] = b"NOT_FOUND\r\n";
pub const ERROR: &[u8] = b"ERROR\r\n";

/// Expected reply to a `get`: zero or more value blocks and one `END`
#[derive(Debug, Default)]
pub struct Retrieval {
    buf: BytesMut,
}

impl Retrieval {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `VALUE <key> <flags> <bytelen>\r\n<payload>\r\n`
    pub fn value(mut self, key: &str, flags: u32, payload: &[u8]) -> Self {
        let line = format!("VALUE {} {} {}", key, flags, payload.len());
        self.buf.put_slice(line.as_bytes());
        self.buf.put_slice(TERMINATOR);
        self.buf.put_slice(payload);
        self.buf.put_slice(TERMINATOR);
        self
    }

    /// Terminate with `END\r\n`
    pub fn end(mut self) -> Bytes {
        self.buf.put_slice(END);
        self.buf.freeze()
    }
}
