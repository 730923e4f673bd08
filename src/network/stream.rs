//! Stream Transport
//!
//! TCP client. A call opens its own connection, writes the request,
//! half-closes and reads until the server closes.

use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::{Config, TransportKind};
use crate::error::{ProbeError, Result};
use crate::protocol::{Request, TERMINATOR};
use super::{is_timeout, Transport};

const READ_CHUNK: usize = 1024;

/// Connection-per-call TCP client
#[derive(Debug, Clone)]
pub struct StreamClient {
    addr: SocketAddr,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl StreamClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            addr: config.resolve()?,
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        })
    }

    /// Open a connection with the configured timeouts
    fn open(&self) -> Result<TcpStream> {
        let stream = TcpStream::connect(self.addr)?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;
        stream.set_read_timeout(self.read_timeout)?;
        stream.set_write_timeout(self.write_timeout)?;

        Ok(stream)
    }

    /// Open a connection for several exchanges without half-closing
    pub fn session(&self) -> Result<StreamSession> {
        let stream = self.open()?;
        tracing::debug!("Session opened to {}", self.addr);
        Ok(StreamSession { stream })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Transport for StreamClient {
    fn call(&self, request: &Request) -> Result<Bytes> {
        let mut stream = self.open()?;
        tracing::debug!("tcp -> {}: {}", self.addr, request);

        stream.write_all(request.as_bytes())?;
        stream.flush()?;

        // The server sees EOF and knows the command stream is over
        stream.shutdown(Shutdown::Write)?;

        let response = read_until_close(&mut stream)?;
        tracing::trace!("tcp <- {}: {:?}", self.addr, response);
        Ok(response)
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Stream
    }
}

/// Accumulate everything the peer sends until it closes
fn read_until_close(stream: &mut TcpStream) -> Result<Bytes> {
    let mut response = BytesMut::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => return Ok(response.freeze()),
            Ok(n) => response.put_slice(&chunk[..n]),
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(ref e) if is_timeout(e) => {
                return Err(ProbeError::StreamTimeout {
                    received: response.len(),
                })
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// One TCP connection carrying several request/response exchanges
///
/// Dropping the session closes the connection.
pub struct StreamSession {
    stream: TcpStream,
}

impl StreamSession {
    /// Write `request` and read until the reply ends in a line terminator
    /// or the server closes.
    ///
    /// Reading stops at the first read that ends in CR LF, so a multi-line
    /// reply split at a line boundary comes back short. Use it for
    /// single-line replies.
    pub fn exchange(&mut self, request: &Request) -> Result<Bytes> {
        self.stream.write_all(request.as_bytes())?;
        self.stream.flush()?;

        let mut response = BytesMut::new();
        let mut chunk = [0u8; READ_CHUNK];

        while !response.ends_with(TERMINATOR) {
            match self.stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => response.put_slice(&chunk[..n]),
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(ref e) if is_timeout(e) => {
                    return Err(ProbeError::StreamTimeout {
                        received: response.len(),
                    })
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(response.freeze())
    }
}
