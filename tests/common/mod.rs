//! Test support: an in-process memcache-style server
//!
//! Speaks the text protocol over TCP and UDP on the same loopback port.
//! UDP replies are cut into `UDP_CHUNK`-byte frames and sent in reverse
//! sequence order so the client has to reorder them.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, UdpSocket};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use mcprobe::protocol::{Frame, FrameHeader};
use mcprobe::{Config, TransportKind};

/// Content bytes per reply datagram
pub const UDP_CHUNK: usize = 1400;

/// Expiry values above this are absolute unix timestamps
const RELATIVE_EXPIRY_LIMIT: u64 = 60 * 60 * 24 * 30;

struct Item {
    flags: u32,
    data: Vec<u8>,
    expires: Option<SystemTime>,
}

impl Item {
    fn is_live(&self) -> bool {
        self.expires.map_or(true, |at| SystemTime::now() < at)
    }
}

type Store = Arc<Mutex<HashMap<String, Item>>>;

/// Handle to a running mock server; threads are detached
pub struct MockServer {
    addr: SocketAddr,
}

impl MockServer {
    pub fn start() -> Self {
        let store: Store = Arc::default();

        // TCP and UDP must share a port; retry if the UDP side is taken
        let (listener, socket) = (0..16)
            .find_map(|_| {
                let listener = TcpListener::bind("127.0.0.1:0").ok()?;
                let port = listener.local_addr().ok()?.port();
                let socket = UdpSocket::bind(("127.0.0.1", port)).ok()?;
                Some((listener, socket))
            })
            .expect("bind mock server");

        let addr = listener.local_addr().unwrap();

        let tcp_store = Arc::clone(&store);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let store = Arc::clone(&tcp_store);
                thread::spawn(move || {
                    let _ = serve_connection(&store, stream);
                });
            }
        });

        thread::spawn(move || {
            let _ = serve_datagrams(&store, socket);
        });

        Self { addr }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self, transport: TransportKind) -> Config {
        Config::builder()
            .server_addr(self.addr.to_string())
            .transport(transport)
            .read_timeout_ms(2000)
            .write_timeout_ms(2000)
            .build()
    }
}

fn serve_connection(store: &Store, stream: TcpStream) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    serve(store, &mut reader, &mut writer)
}

fn serve_datagrams(store: &Store, socket: UdpSocket) -> io::Result<()> {
    let mut buf = [0u8; 65536];
    loop {
        let (len, peer) = socket.recv_from(&mut buf)?;
        let Ok(frame) = Frame::decode(bytes::Bytes::copy_from_slice(&buf[..len])) else {
            continue;
        };

        let mut reply = Vec::new();
        let mut content: &[u8] = &frame.content;
        serve(store, &mut content, &mut reply)?;

        let chunks: Vec<&[u8]> = if reply.is_empty() {
            vec![&reply[..]]
        } else {
            reply.chunks(UDP_CHUNK).collect()
        };
        let total = chunks.len() as i16;

        for (seq, chunk) in chunks.iter().enumerate().rev() {
            let header = FrameHeader {
                request_id: frame.header.request_id,
                sequence: seq as i16,
                total,
                reserved: 0,
            };
            socket.send_to(&Frame::new(header, chunk.to_vec()).encode(), peer)?;
        }
    }
}

/// Execute commands until EOF, replying to each as soon as it is parsed
fn serve<R: BufRead, W: Write>(store: &Store, reader: &mut R, writer: &mut W) -> io::Result<()> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }

        if !line.ends_with(b"\r\n") {
            // Stream ended mid-command
            writer.write_all(b"ERROR\r\n")?;
            return writer.flush();
        }

        let text = String::from_utf8_lossy(&line[..line.len() - 2]).into_owned();
        let words: Vec<&str> = text.split_whitespace().collect();

        let reply = match words.as_slice() {
            ["get", keys @ ..] if !keys.is_empty() => get(store, keys),
            ["delete", key] => delete(store, key),
            ["set", key, flags, expiry, len] => match (
                flags.parse::<u32>(),
                expiry.parse::<u64>(),
                len.parse::<usize>(),
            ) {
                (Ok(flags), Ok(expiry), Ok(len)) => {
                    let mut data = vec![0u8; len + 2];
                    if reader.read_exact(&mut data).is_err() || !data.ends_with(b"\r\n") {
                        writer.write_all(b"ERROR\r\n")?;
                        return writer.flush();
                    }
                    data.truncate(len);
                    set(store, key, flags, expiry, data)
                }
                _ => b"ERROR\r\n".to_vec(),
            },
            _ => b"ERROR\r\n".to_vec(),
        };

        writer.write_all(&reply)?;
        writer.flush()?;
    }
}

fn get(store: &Store, keys: &[&str]) -> Vec<u8> {
    let mut store = store.lock();
    let mut out = Vec::new();
    for key in keys {
        let live = store.get(*key).map(Item::is_live);
        if live == Some(false) {
            store.remove(*key);
            continue;
        }
        if let Some(item) = store.get(*key) {
            out.extend_from_slice(format!("VALUE {} {} {}\r\n", key, item.flags, item.data.len()).as_bytes());
            out.extend_from_slice(&item.data);
            out.extend_from_slice(b"\r\n");
        }
    }
    out.extend_from_slice(b"END\r\n");
    out
}

fn set(store: &Store, key: &str, flags: u32, expiry: u64, data: Vec<u8>) -> Vec<u8> {
    let expires = match expiry {
        0 => None,
        secs if secs > RELATIVE_EXPIRY_LIMIT => Some(UNIX_EPOCH + Duration::from_secs(secs)),
        secs => Some(SystemTime::now() + Duration::from_secs(secs)),
    };
    store.lock().insert(key.to_string(), Item { flags, data, expires });
    b"STORED\r\n".to_vec()
}

fn delete(store: &Store, key: &str) -> Vec<u8> {
    match store.lock().remove(key) {
        Some(item) if item.is_live() => b"DELETED\r\n".to_vec(),
        _ => b"NOT_FOUND\r\n".to_vec(),
    }
}

/// A TCP server that answers every connection with `reply` and closes
pub fn canned_tcp_server(reply: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut sink = Vec::new();
            let _ = stream.read_to_end(&mut sink);
            let _ = stream.write_all(reply);
        }
    });
    addr
}

/// A TCP server that answers every command line with `reply` as soon as
/// the line arrives, and closes on EOF
pub fn line_echo_server(reply: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            thread::spawn(move || {
                let Ok(read_half) = stream.try_clone() else { return };
                let mut reader = BufReader::new(read_half);
                let mut writer = stream;
                let mut line = Vec::new();
                while matches!(reader.read_until(b'\n', &mut line), Ok(n) if n > 0) {
                    if writer.write_all(reply).is_err() {
                        return;
                    }
                    line.clear();
                }
            });
        }
    });
    addr
}
