//! Stream-only scenarios
//!
//! These depend on half-close and on several commands sharing one
//! connection, neither of which exists over UDP.

use bytes::Bytes;

use crate::error::Result;
use crate::network::StreamClient;
use crate::protocol::{Request, END, ERROR};
use super::{check, expect, forget, Body, Scenario};

pub(super) const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "recovers_from_errors_in_the_stream",
        body: Body::StreamOnly(recovers_from_errors_in_the_stream),
    },
    Scenario {
        name: "incomplete_command_results_in_error",
        body: Body::StreamOnly(incomplete_command_results_in_error),
    },
    Scenario {
        name: "stream_closed_results_in_empty_response",
        body: Body::StreamOnly(stream_closed_results_in_empty_response),
    },
];

/// A parse error must not desynchronize the rest of the connection
fn recovers_from_errors_in_the_stream(client: &StreamClient) -> Result<()> {
    forget(client, &["key"])?;

    let mut session = client.session()?;

    let malformed = Request::raw(&b"get\r\n"[..]);
    let reply = session.exchange(&malformed)?;
    check(&malformed, &reply, ERROR)?;

    let valid = Request::get(["key"]);
    let reply = session.exchange(&valid)?;
    check(&valid, &reply, END)
}

/// `get` with no terminator, then EOF
fn incomplete_command_results_in_error(client: &StreamClient) -> Result<()> {
    expect(client, &Request::raw(&b"get"[..]), ERROR)
}

/// Half-close before sending anything
fn stream_closed_results_in_empty_response(client: &StreamClient) -> Result<()> {
    expect(client, &Request::raw(Bytes::new()), b"")
}
