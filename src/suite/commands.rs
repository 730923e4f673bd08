//! Transport-independent command scenarios

use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::network::Transport;
use crate::protocol::{Expiry, Request, Retrieval, DELETED, END, ERROR, NOT_FOUND, STORED};
use super::{expect, forget, Body, Scenario};

pub(super) const SCENARIOS: &[Scenario] = &[
    Scenario { name: "get_missing_key", body: Body::Universal(get_missing_key) },
    Scenario { name: "basic_commands", body: Body::Universal(basic_commands) },
    Scenario { name: "error_handling", body: Body::Universal(error_handling) },
    Scenario { name: "delete_missing_key", body: Body::Universal(delete_missing_key) },
    Scenario { name: "set_preserves_flags", body: Body::Universal(set_preserves_flags) },
    Scenario { name: "expiry", body: Body::Universal(expiry) },
    Scenario { name: "expiry_at_epoch_time", body: Body::Universal(expiry_at_epoch_time) },
    Scenario { name: "multiple_keys_in_get", body: Body::Universal(multiple_keys_in_get) },
    Scenario {
        name: "response_spanning_many_datagrams",
        body: Body::Universal(response_spanning_many_datagrams),
    },
];

fn store(t: &dyn Transport, key: &str, flags: u32, payload: &[u8]) -> Result<()> {
    expect(t, &Request::set(key, flags, Expiry::Never, payload), STORED)
}

fn get_missing_key(t: &dyn Transport) -> Result<()> {
    forget(t, &["key"])?;
    expect(t, &Request::get(["key"]), END)
}

fn basic_commands(t: &dyn Transport) -> Result<()> {
    forget(t, &["key"])?;

    expect(t, &Request::get(["key"]), END)?;
    expect(t, &Request::set("key", 0, Expiry::Never, b"hello"), STORED)?;
    expect(
        t,
        &Request::get(["key"]),
        &Retrieval::new().value("key", 0, b"hello").end(),
    )?;
    expect(t, &Request::delete("key"), DELETED)?;
    expect(t, &Request::delete("key"), NOT_FOUND)?;
    expect(t, &Request::get(["key"]), END)
}

fn error_handling(t: &dyn Transport) -> Result<()> {
    expect(t, &Request::raw(&b"get\r\n"[..]), ERROR)
}

fn delete_missing_key(t: &dyn Transport) -> Result<()> {
    forget(t, &["missing"])?;

    // Absence is idempotent
    expect(t, &Request::delete("missing"), NOT_FOUND)?;
    expect(t, &Request::delete("missing"), NOT_FOUND)
}

fn set_preserves_flags(t: &dyn Transport) -> Result<()> {
    forget(t, &["flagged"])?;

    store(t, "flagged", 42, b"payload")?;
    expect(
        t,
        &Request::get(["flagged"]),
        &Retrieval::new().value("flagged", 42, b"payload").end(),
    )?;
    expect(t, &Request::delete("flagged"), DELETED)
}

fn expiry(t: &dyn Transport) -> Result<()> {
    forget(t, &["key"])?;

    expect(t, &Request::set("key", 0, Expiry::Relative(1), b"hello"), STORED)?;
    expect(
        t,
        &Request::get(["key"]),
        &Retrieval::new().value("key", 0, b"hello").end(),
    )?;

    thread::sleep(Duration::from_secs(1));
    expect(t, &Request::get(["key"]), END)
}

fn expiry_at_epoch_time(t: &dyn Transport) -> Result<()> {
    forget(t, &["key"])?;

    expect(t, &Request::set("key", 0, Expiry::epoch_in(1), b"hello"), STORED)?;
    expect(
        t,
        &Request::get(["key"]),
        &Retrieval::new().value("key", 0, b"hello").end(),
    )?;

    // Epoch is truncated to whole seconds, so wait past the next boundary
    thread::sleep(Duration::from_secs(2));
    expect(t, &Request::get(["key"]), END)
}

fn multiple_keys_in_get(t: &dyn Transport) -> Result<()> {
    forget(t, &["key1", "key"])?;

    store(t, "key1", 0, b"v1")?;
    store(t, "key", 0, b"v2")?;
    expect(
        t,
        &Request::get(["key1", "key"]),
        &Retrieval::new()
            .value("key1", 0, b"v1")
            .value("key", 0, b"v2")
            .end(),
    )?;

    expect(t, &Request::delete("key"), DELETED)?;
    expect(t, &Request::delete("key1"), DELETED)
}

fn response_spanning_many_datagrams(t: &dyn Transport) -> Result<()> {
    const KEYS: [&str; 3] = ["key1", "key2", "key3"];
    forget(t, &KEYS)?;

    let values: Vec<Vec<u8>> = [b'1', b'2', b'3']
        .iter()
        .map(|&digit| vec![digit; 1000])
        .collect();

    for (key, value) in KEYS.iter().zip(&values) {
        store(t, key, 0, value)?;
    }

    let expected = KEYS
        .iter()
        .zip(&values)
        .fold(Retrieval::new(), |reply, (key, value)| reply.value(key, 0, value))
        .end();
    expect(t, &Request::get(KEYS), &expected)?;

    for key in KEYS {
        expect(t, &Request::delete(key), DELETED)?;
    }
    Ok(())
}
