//! Network Module
//!
//! Transport clients that carry one request to the server and hand back the
//! full logical response.
//!
//! ## Architecture
//! - [`Transport`] is the single `call` contract scenarios run against
//! - [`StreamClient`]: one TCP connection per call, framed by close
//! - [`DatagramClient`]: one UDP request datagram, fragmented replies
//! - Every socket is owned by the call that opened it and dropped on return

mod stream;
mod datagram;

pub use stream::{StreamClient, StreamSession};
pub use datagram::{DatagramClient, MAX_DATAGRAM_SIZE};

use bytes::Bytes;

use crate::config::{Config, TransportKind};
use crate::error::Result;
use crate::protocol::Request;

/// Send one request, receive one complete response
pub trait Transport {
    fn call(&self, request: &Request) -> Result<Bytes>;

    fn kind(&self) -> TransportKind;
}

/// Build the transport selected by `config`
pub fn connect(config: &Config) -> Result<Box<dyn Transport>> {
    let transport: Box<dyn Transport> = match config.transport {
        TransportKind::Stream => Box::new(StreamClient::new(config)?),
        TransportKind::Datagram => Box::new(DatagramClient::new(config)?),
    };
    Ok(transport)
}

/// Read timeouts surface as `WouldBlock` on Unix and `TimedOut` on Windows
pub(crate) fn is_timeout(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
