//! Protocol Module
//!
//! The memcache text protocol as seen from the client side, plus the
//! datagram framing used over UDP.
//!
//! ## Text Protocol
//! ```text
//! get <key>+\r\n
//! set <key> <flags> <expiry> <bytelen>\r\n<payload>\r\n
//! delete <key>\r\n
//! ```
//!
//! ### Responses
//! - `VALUE <key> <flags> <bytelen>\r\n<payload>\r\n` per hit, then `END\r\n`
//! - `STORED\r\n`
//! - `DELETED\r\n` / `NOT_FOUND\r\n`
//! - `ERROR\r\n` for any malformed command line
//!
//! ## Datagram Frame Format
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬──────────────┬─────────────┐
//! │ ReqId (2)    │ Seq (2)      │ Total (2)    │ Reserved (2) │   Content   │
//! └──────────────┴──────────────┴──────────────┴──────────────┴─────────────┘
//! ```
//! All header fields are big-endian `i16`.

mod request;
mod response;
mod frame;
mod reassembly;

pub use request::{Expiry, Request, TERMINATOR};
pub use response::{Retrieval, DELETED, END, ERROR, NOT_FOUND, STORED};
pub use frame::{Frame, FrameHeader, HEADER_SIZE};
pub use reassembly::ReassemblyBuffer;
