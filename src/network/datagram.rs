//! Datagram Transport
//!
//! UDP client. The request travels in a single frame `(id, 0, 1, 0)`; the
//! reply may span many frames, arriving in any order, which are collected
//! in a [`ReassemblyBuffer`] until the declared total is reached.
//!
//! The wait for each frame is bounded by the configured read timeout. A
//! frame that never arrives fails the call with
//! [`ProbeError::DatagramTimeout`]; nothing is retried.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use bytes::Bytes;
use rand::Rng;

use crate::config::{Config, TransportKind};
use crate::error::{ProbeError, Result};
use crate::protocol::{Frame, FrameHeader, ReassemblyBuffer, Request};
use super::{is_timeout, Transport};

/// Default receive buffer for one reply datagram
pub const MAX_DATAGRAM_SIZE: usize = 1500;

/// Socket-per-call UDP client
#[derive(Debug, Clone)]
pub struct DatagramClient {
    addr: SocketAddr,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    max_datagram_size: usize,
}

impl DatagramClient {
    pub fn new(config: &Config) -> Result<Self> {
        if config.max_datagram_size == 0 {
            return Err(ProbeError::Config(
                "max_datagram_size must be positive".to_string(),
            ));
        }

        Ok(Self {
            addr: config.resolve()?,
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
            max_datagram_size: config.max_datagram_size,
        })
    }

    /// Bind an ephemeral local socket of the server's address family
    fn open(&self) -> Result<UdpSocket> {
        let local: SocketAddr = match self.addr {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        let socket = UdpSocket::bind(local)?;
        socket.set_read_timeout(self.read_timeout)?;
        socket.set_write_timeout(self.write_timeout)?;
        Ok(socket)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Transport for DatagramClient {
    fn call(&self, request: &Request) -> Result<Bytes> {
        let socket = self.open()?;
        let request_id: i16 = rand::rng().random();

        let outbound = Frame::new(FrameHeader::request(request_id), request.to_bytes());
        socket.send_to(&outbound.encode(), self.addr)?;
        tracing::debug!("udp -> {} [id={}]: {}", self.addr, request_id, request);

        let mut buffer = ReassemblyBuffer::new(request_id);
        // One spare byte: a datagram that fills it was cut off by the kernel
        let mut datagram = vec![0u8; self.max_datagram_size + 1];

        loop {
            let (len, from) = match socket.recv_from(&mut datagram) {
                Ok(received) => received,
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(ref e) if is_timeout(e) => {
                    tracing::warn!(
                        "udp request {} timed out with {} frames buffered",
                        request_id,
                        buffer.received()
                    );
                    return Err(ProbeError::DatagramTimeout {
                        received: buffer.received(),
                        expected: buffer.expected_total().unwrap_or(0),
                    });
                }
                Err(e) => return Err(e.into()),
            };

            tracing::trace!("udp <- {}: {} bytes", from, len);
            if len > self.max_datagram_size {
                return Err(ProbeError::MalformedFrame(format!(
                    "datagram exceeds {} bytes",
                    self.max_datagram_size
                )));
            }
            let frame = Frame::decode(Bytes::copy_from_slice(&datagram[..len]))?;
            if buffer.push(frame)? {
                break;
            }
        }

        let response = buffer.finish()?;
        tracing::trace!("udp <- {} [id={}]: {:?}", self.addr, request_id, response);
        Ok(response)
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Datagram
    }
}
