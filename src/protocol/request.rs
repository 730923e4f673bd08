//! Request encoding
//!
//! Builds command text for the client. Arguments are never validated:
//! malformed requests are sent on purpose to provoke server errors.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{BufMut, Bytes, BytesMut};

/// Line terminator used by every command and response line
pub const TERMINATOR: &[u8] = b"\r\n";

/// Expiry field of a store command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// 0: the item never expires
    Never,

    /// Seconds from now
    Relative(u32),

    /// Absolute unix timestamp in seconds
    Absolute(u64),
}

impl Expiry {
    /// Absolute expiry `seconds` after the current wall-clock time,
    /// truncated to whole seconds
    pub fn epoch_in(seconds: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Expiry::Absolute(now + seconds)
    }

    /// The numeric value written on the wire
    pub fn as_field(&self) -> u64 {
        match *self {
            Expiry::Never => 0,
            Expiry::Relative(secs) => u64::from(secs),
            Expiry::Absolute(epoch) => epoch,
        }
    }
}

/// An encoded, immutable request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    bytes: Bytes,
}

impl Request {
    /// `get <key> <key> ...\r\n`
    ///
    /// An empty key list yields `get\r\n`, which servers reject.
    pub fn get<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut buf = BytesMut::from(&b"get"[..]);
        for key in keys {
            buf.put_u8(b' ');
            buf.put_slice(key.as_ref().as_bytes());
        }
        buf.put_slice(TERMINATOR);
        Self { bytes: buf.freeze() }
    }

    /// `set <key> <flags> <expiry> <bytelen>\r\n<payload>\r\n`
    pub fn set(key: &str, flags: u32, expiry: Expiry, payload: &[u8]) -> Self {
        let line = format!(
            "set {} {} {} {}",
            key,
            flags,
            expiry.as_field(),
            payload.len()
        );

        let mut buf = BytesMut::with_capacity(line.len() + payload.len() + 2 * TERMINATOR.len());
        buf.put_slice(line.as_bytes());
        buf.put_slice(TERMINATOR);
        buf.put_slice(payload);
        buf.put_slice(TERMINATOR);
        Self { bytes: buf.freeze() }
    }

    /// `delete <key>\r\n`
    pub fn delete(key: &str) -> Self {
        let mut buf = BytesMut::with_capacity(key.len() + 9);
        buf.put_slice(b"delete ");
        buf.put_slice(key.as_bytes());
        buf.put_slice(TERMINATOR);
        Self { bytes: buf.freeze() }
    }

    /// Arbitrary bytes sent verbatim, including unterminated fragments
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Self { bytes: bytes.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap shared handle to the encoded bytes
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First line only; payloads can be large
        let line = self
            .bytes
            .split(|&b| b == b'\n')
            .next()
            .unwrap_or_default();
        write!(f, "{}", String::from_utf8_lossy(line).trim_end())
    }
}
