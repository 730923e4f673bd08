//! Configuration for mcprobe
//!
//! Centralized configuration with sensible defaults. Passed explicitly to
//! the runner and the transport constructors.

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use crate::error::{ProbeError, Result};
use crate::network::MAX_DATAGRAM_SIZE;

/// Which transport the suite drives the server over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// TCP, one connection per call, framed by connection close
    Stream,

    /// UDP, one request datagram, fragmented replies
    Datagram,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Stream => write!(f, "tcp"),
            TransportKind::Datagram => write!(f, "udp"),
        }
    }
}

/// Main configuration for a conformance run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Target
    // -------------------------------------------------------------------------
    /// Server address in `host:port` form
    pub server_addr: String,

    /// Transport used for every universal scenario
    pub transport: TransportKind,

    // -------------------------------------------------------------------------
    // Timeouts
    // -------------------------------------------------------------------------
    /// Socket read timeout (milliseconds). Bounds the wait for a stream
    /// close and for each missing datagram frame.
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Datagram
    // -------------------------------------------------------------------------
    /// Receive buffer size for a single reply datagram
    pub max_datagram_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "localhost:11211".to_string(),
            transport: TransportKind::Stream,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            max_datagram_size: MAX_DATAGRAM_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve `server_addr` to the first socket address it names
    pub fn resolve(&self) -> Result<SocketAddr> {
        self.server_addr
            .to_socket_addrs()
            .map_err(|e| ProbeError::Config(format!("cannot resolve {}: {}", self.server_addr, e)))?
            .next()
            .ok_or_else(|| ProbeError::Config(format!("no address for {}", self.server_addr)))
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

/// Zero disables the timeout
fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address (`host:port`)
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Select the transport
    pub fn transport(mut self, kind: TransportKind) -> Self {
        self.config.transport = kind;
        self
    }

    /// Set the read timeout (in milliseconds, 0 waits forever)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds, 0 waits forever)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the receive buffer size for reply datagrams
    pub fn max_datagram_size(mut self, size: usize) -> Self {
        self.config.max_datagram_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
