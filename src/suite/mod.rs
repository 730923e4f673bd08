//! Conformance Suite
//!
//! Named scenarios that drive the server through a [`Transport`] and
//! compare every reply byte for byte.
//!
//! - [`universal`]: valid over any transport
//! - [`stream_only`]: half-close and same-connection behaviour, TCP only
//!
//! Each scenario deletes the keys it touches before it starts, so a
//! failure half way through one scenario cannot leak into the next.

mod commands;
mod stream;

use crate::error::{ProbeError, Result};
use crate::network::{StreamClient, Transport};
use crate::protocol::Request;

/// What a scenario needs to run
#[derive(Clone, Copy)]
pub enum Body {
    Universal(fn(&dyn Transport) -> Result<()>),
    StreamOnly(fn(&StreamClient) -> Result<()>),
}

/// One self-contained test case
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub body: Body,
}

impl Scenario {
    pub fn is_stream_only(&self) -> bool {
        matches!(self.body, Body::StreamOnly(_))
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("stream_only", &self.is_stream_only())
            .finish()
    }
}

/// Scenarios that hold for both transports
pub fn universal() -> Vec<Scenario> {
    commands::SCENARIOS.to_vec()
}

/// Scenarios that only make sense on a stream connection
pub fn stream_only() -> Vec<Scenario> {
    stream::SCENARIOS.to_vec()
}

/// Issue `request` and require the reply to equal `expected` exactly
pub fn expect(transport: &dyn Transport, request: &Request, expected: &[u8]) -> Result<()> {
    let actual = transport.call(request)?;
    check(request, &actual, expected)
}

/// Compare a reply already in hand
pub fn check(request: &Request, actual: &[u8], expected: &[u8]) -> Result<()> {
    if actual == expected {
        return Ok(());
    }

    Err(ProbeError::Mismatch {
        request: request.to_string(),
        expected: String::from_utf8_lossy(expected).into_owned(),
        actual: String::from_utf8_lossy(actual).into_owned(),
    })
}

/// Delete `keys`, accepting either `DELETED` or `NOT_FOUND`
pub fn forget(transport: &dyn Transport, keys: &[&str]) -> Result<()> {
    for key in keys {
        transport.call(&Request::delete(key))?;
    }
    Ok(())
}
